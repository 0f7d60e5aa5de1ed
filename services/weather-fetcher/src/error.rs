//! Error types for the weather fetcher.

use thiserror::Error;

use city_common::CommonError;

/// Result type alias using FetchError.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failures of a weather snapshot run.
///
/// Everything except [`FetchError::Rejected`] is a hard failure; a rejection
/// is the portal answering normally with a non-success status.
#[derive(Debug, Error)]
pub enum FetchError {
    // === Transport ===
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    // === Payload ===
    #[error("Failed to decode portal response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API returned error: {failed_code}")]
    Rejected { failed_code: String },

    // === Local ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Output(#[from] CommonError),
}

impl FetchError {
    /// True for application-level rejections by the portal.
    pub fn is_soft(&self) -> bool {
        matches!(self, FetchError::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_carries_code() {
        let err = FetchError::Rejected {
            failed_code: "X".to_string(),
        };
        assert!(err.is_soft());
        assert_eq!(err.to_string(), "API returned error: X");
    }

    #[test]
    fn test_http_status_is_hard() {
        let err = FetchError::HttpStatus {
            url: "https://example.com".to_string(),
            status: 502,
        };
        assert!(!err.is_soft());
        assert!(err.to_string().contains("502"));
    }
}
