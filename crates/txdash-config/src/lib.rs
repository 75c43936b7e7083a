//! Configuration management for txdash
//!
//! This module handles loading, validation, and management of
//! txdash configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Remote data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint returning a JSON array of user records
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "https://jsonplaceholder.typicode.com/users".to_string()
}

/// Dashboard display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Rows per table page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Refresh period of the "Active Now" metric, in seconds
    #[serde(default = "default_live_metric_interval")]
    pub live_metric_interval_secs: u64,
    /// Column the table is sorted by on first render
    #[serde(default = "default_sort")]
    pub default_sort: SortKey,
    /// Direction of the initial sort
    #[serde(default = "default_direction")]
    pub default_direction: SortDirection,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            live_metric_interval_secs: default_live_metric_interval(),
            default_sort: default_sort(),
            default_direction: default_direction(),
        }
    }
}

fn default_page_size() -> usize {
    5
}

fn default_live_metric_interval() -> u64 {
    5
}

fn default_sort() -> SortKey {
    SortKey::Date
}

fn default_direction() -> SortDirection {
    SortDirection::Desc
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Transaction table column used as sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Email,
    Amount,
    Type,
    Date,
}

impl SortKey {
    /// All sortable columns in table order
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Email,
        SortKey::Amount,
        SortKey::Type,
        SortKey::Date,
    ];

    /// Column heading shown in the table and the CSV header
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Email => "Email",
            SortKey::Amount => "Amount",
            SortKey::Type => "Type",
            SortKey::Date => "Date",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "email" => Ok(SortKey::Email),
            "amount" => Ok(SortKey::Amount),
            "type" => Ok(SortKey::Type),
            "date" => Ok(SortKey::Date),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Email => write!(f, "email"),
            SortKey::Amount => write!(f, "amount"),
            SortKey::Type => write!(f, "type"),
            SortKey::Date => write!(f, "date"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote data source
    #[serde(default)]
    pub source: SourceConfig,
    /// Dashboard display settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.dashboard.page_size == 0 || self.dashboard.page_size > 100 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.page_size".to_string(),
                reason: "Page size must be between 1 and 100".to_string(),
            });
        }

        if self.dashboard.live_metric_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.live_metric_interval_secs".to_string(),
                reason: "Interval must be at least 1 second".to_string(),
            });
        }

        if !self.source.endpoint.starts_with("http://") && !self.source.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "source.endpoint".to_string(),
                reason: "Endpoint must be an http(s) URL".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dashboard.page_size, 5);
        assert_eq!(config.dashboard.live_metric_interval_secs, 5);
        assert_eq!(config.dashboard.default_sort, SortKey::Date);
        assert_eq!(config.dashboard.default_direction, SortDirection::Desc);
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.source.endpoint, "https://jsonplaceholder.typicode.com/users");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.dashboard.page_size, 5);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_page_size() {
        let err = Config::from_yaml("dashboard:\n  page_size: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "dashboard.page_size"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = Config::from_yaml("source:\n  endpoint: ftp://example.com\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/txdash/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!("EMAIL".parse::<SortKey>().unwrap(), SortKey::Email);
        assert_eq!("amount".parse::<SortKey>().unwrap(), SortKey::Amount);
        assert_eq!("type".parse::<SortKey>().unwrap(), SortKey::Type);
        assert_eq!("date".parse::<SortKey>().unwrap(), SortKey::Date);
        assert!("id".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("descending".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
