//! Error types for txdash-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use txdash_core::{CoreError, ErrorCode, ErrorDetails};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Query parameter that failed to parse
    pub fn invalid_parameter(name: &str, value: &str) -> Self {
        ApiError::Core(CoreError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => match error.code() {
                ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
                ErrorCode::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::FetchFailed => StatusCode::BAD_GATEWAY,
                ErrorCode::EmptyExport => StatusCode::NO_CONTENT,
                ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::Core(error) => error.to_details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 204 must not carry a body
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        (status, Json(self.to_details())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::invalid_parameter("page", "abc").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(CoreError::NotLoaded).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::from(CoreError::EmptyExport).status(), StatusCode::NO_CONTENT);
        assert_eq!(
            ApiError::from(CoreError::FetchFailed { message: "HTTP 404".to_string() }).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_details_carry_parameter() {
        let details = ApiError::invalid_parameter("sort", "color").to_details();
        assert_eq!(details.code, ErrorCode::InvalidParameter);
        assert_eq!(details.details, Some(serde_json::json!({ "parameter": "sort" })));
    }
}
