// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] crate::port::GatewayError),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timed out after {elapsed_ms}ms waiting for job {handle}")]
    Timeout { handle: String, elapsed_ms: i64 },

    #[error("Wait for job {0} was cancelled")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Raw response body attached to the failure, if any.
    ///
    /// Kickoff responses without a handle and unparseable bodies keep the
    /// raw text so the caller can show it for diagnosis.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            AppError::Domain(crate::domain::DomainError::MissingHandle { body }) => Some(body),
            AppError::Gateway(crate::port::GatewayError::MalformedResponse { body, .. })
            | AppError::Gateway(crate::port::GatewayError::Rejected { body, .. }) => Some(body),
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::port::GatewayError;

    #[test]
    fn test_missing_handle_keeps_body() {
        let err: AppError = DomainError::MissingHandle {
            body: r#"{"message":"queued"}"#.to_string(),
        }
        .into();

        assert_eq!(err.response_body(), Some(r#"{"message":"queued"}"#));
        assert!(err.to_string().contains("job handle"));
    }

    #[test]
    fn test_malformed_response_keeps_body() {
        let err: AppError = GatewayError::MalformedResponse {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        }
        .into();

        assert_eq!(err.response_body(), Some("<html>Bad Gateway</html>"));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_network_error_has_no_body() {
        let err: AppError = GatewayError::Network("connection refused".to_string()).into();
        assert!(err.response_body().is_none());
        assert_eq!(
            err.to_string(),
            "Gateway error: Network error: connection refused"
        );
    }
}
