//! Error types for indicator operations.
//!
//! This module defines [`IndicatorError`] which covers all error cases that can
//! occur when validating queries, fetching or parsing indicator pages, or
//! calling text generation providers.

use thiserror::Error;

/// Errors that can occur during indicator and report operations.
#[derive(Error, Debug)]
pub enum IndicatorError {
    /// The caller supplied invalid query parameters. No request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The source answered with an unexpected status or payload shape.
    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing data or building a table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Pagination did not terminate within the configured page cap.
    #[error("Page limit exceeded: source still returned full pages after {max_pages} pages")]
    PageLimitExceeded {
        /// The configured maximum number of pages.
        max_pages: u32,
    },

    /// A text generation provider failed.
    #[error("{provider}: {message}")]
    Provider {
        /// The provider that failed.
        provider: String,
        /// What went wrong.
        message: String,
    },

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl IndicatorError {
    /// Returns true if this error was raised before any network access.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias using [`IndicatorError`].
pub type Result<T> = std::result::Result<T, IndicatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = IndicatorError::Provider {
            provider: "OpenAI".to_string(),
            message: "HTTP 401 Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "OpenAI: HTTP 401 Unauthorized");
    }

    #[test]
    fn test_page_limit_and_other_display() {
        let err = IndicatorError::PageLimitExceeded { max_pages: 3 };
        assert_eq!(
            err.to_string(),
            "Page limit exceeded: source still returned full pages after 3 pages"
        );
        assert_eq!(
            IndicatorError::Other("CSV export failed: disk full".into()).to_string(),
            "CSV export failed: disk full"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(IndicatorError::Validation("bad".into()).is_validation());
        assert!(!IndicatorError::Network("down".into()).is_validation());
    }
}
