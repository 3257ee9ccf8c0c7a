//! Error types for the report service
//!
//! Every variant maps to one HTTP status. Store failures are reported to the
//! caller as a generic server error; the detail only goes to the log.

use hyper::StatusCode;

/// Main error type for report operations
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{0}")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token missing")]
    Unauthenticated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    /// Unrouted request; carries the request path
    #[error("Not Found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRange(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Server-side failures collapse to "Server error".
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = match &self {
            Self::NotFound(path) => serde_json::json!({
                "error": self.public_message(),
                "path": path,
            }),
            _ => serde_json::json!({ "error": self.public_message() }),
        };
        (status, body.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<mongodb::error::Error> for ReportError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ReportError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken
    }
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ReportError::MissingParameter("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ReportError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ReportError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ReportError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ReportError::Database("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_detail_not_leaked() {
        let err = ReportError::Database("connection refused at 10.0.0.5".into());
        let (status, body) = err.into_status_code_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"Server error"}"#);
    }

    #[test]
    fn test_not_found_carries_path() {
        let (status, body) = ReportError::NotFound("/nope".into()).into_status_code_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"error":"Not Found","path":"/nope"}"#);
    }

    #[test]
    fn test_missing_parameter_message_verbatim() {
        let err = ReportError::MissingParameter(
            r#"Missing "from" or "to" query parameters!"#.into(),
        );
        assert_eq!(err.public_message(), r#"Missing "from" or "to" query parameters!"#);
    }
}
