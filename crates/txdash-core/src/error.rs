//! Error types for txdash-core
//!
//! Error codes, severities and detail payloads for the dashboard view
//! model. Every failure here degrades to a visible, non-crashing state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Remote fetch failed (transport error or non-2xx status)
    FetchFailed,
    /// Records requested before the fetch completed
    NotLoaded,
    /// Export requested for an empty view
    EmptyExport,
    /// A view parameter could not be parsed
    InvalidParameter,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::EmptyExport => write!(f, "EMPTY_EXPORT"),
            ErrorCode::InvalidParameter => write!(f, "INVALID_PARAMETER"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for txdash-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Failed to fetch transactions: {message}")]
    FetchFailed { message: String },

    #[error("Transactions not loaded")]
    NotLoaded,

    #[error("No transactions to export")]
    EmptyExport,

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: String, value: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::EmptyExport => ErrorCode::EmptyExport,
            CoreError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::NotLoaded => ErrorSeverity::Info,
            CoreError::EmptyExport => ErrorSeverity::Warning,
            CoreError::InvalidParameter { .. } => ErrorSeverity::Warning,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::FetchFailed { message } => {
                details = details
                    .with_detail(serde_json::json!({ "fetch_message": message }))
                    .with_suggestion("Check that source.endpoint is reachable.".to_string())
                    .with_suggestion("Restart the server to fetch again.".to_string());
            }
            CoreError::NotLoaded => {
                details = details.with_suggestion("Wait for the initial fetch to complete.".to_string());
            }
            CoreError::EmptyExport => {
                details = details.with_suggestion("Widen the search or date range before exporting.".to_string());
            }
            CoreError::InvalidParameter { name, .. } => {
                details = details.with_detail(serde_json::json!({ "parameter": name }));
            }
            CoreError::InternalError { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Log an error at the level matching its severity
pub fn log_error(error: &CoreError, context: &ErrorContext) {
    match error.severity() {
        ErrorSeverity::Info => log::info!(
            target: "txdash::error",
            "[{}] {} - Operation: {} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.data
        ),
        ErrorSeverity::Warning => log::warn!(
            target: "txdash::error",
            "[{}] {} - Operation: {} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.data
        ),
        ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
            target: "txdash::error",
            "[{}] {} - Operation: {} - Data: {}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data
        ),
    }
}

// ==================== Tests ====================
