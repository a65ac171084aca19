//! Error types for ProfitBricks Cloud API operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during Cloud API operations.
#[derive(Debug, Error)]
pub enum ProfitBricksError {
    /// Configuration is missing or incomplete.
    #[error("ProfitBricks configuration required: {0}")]
    ConfigMissing(String),

    /// The API answered with a status code other than the expected one.
    #[error("expected HTTP {expected}, got {status}: {message}")]
    UnexpectedStatus {
        expected: u16,
        status: u16,
        message: String,
    },

    /// An asynchronous operation reached the FAILED state.
    #[error("request {url} failed: {message}")]
    ProviderFailure { url: String, message: String },

    /// The deadline elapsed before the operation reached a terminal state.
    #[error("timed out after {timeout:?} waiting for request {url}")]
    Timeout { url: String, timeout: Duration },

    /// The wait was cancelled by the caller.
    #[error("wait for request {url} was cancelled")]
    Cancelled { url: String },

    /// An accepted response carried no `location` header.
    #[error("response to {0} has no location header")]
    MissingLocation(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl ProfitBricksError {
    /// HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for a 404 from the API.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for ProfitBricks operations.
pub type Result<T> = core::result::Result<T, ProfitBricksError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = ProfitBricksError::UnexpectedStatus {
            expected: 202,
            status: 422,
            message: "Invalid size".to_string(),
        };
        assert_eq!(err.to_string(), "expected HTTP 202, got 422: Invalid size");
        assert_eq!(err.status_code(), Some(422));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_wait_errors_are_distinct() {
        let timeout = ProfitBricksError::Timeout {
            url: "/requests/1/status".to_string(),
            timeout: Duration::from_millis(50),
        };
        let failure = ProfitBricksError::ProviderFailure {
            url: "/requests/1/status".to_string(),
            message: "quota exceeded".to_string(),
        };
        assert!(timeout.to_string().contains("timed out"));
        assert!(failure.to_string().contains("quota exceeded"));
        assert_eq!(timeout.status_code(), None);
    }
}
