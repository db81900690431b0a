//! Unified error types for sift.
//!
//! Both failure classes of a search end at the same boundary: the search
//! controller resets its results and raises a warning built from the
//! `Display` text of these variants.

/// Unified error types for a search round-trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (connect failure, reset, timeout).
    #[error("NETWORK_FAILURE: {0}")]
    NetworkFailure(String),

    /// The response body was not valid JSON.
    #[error("DECODE_FAILURE: {0}")]
    DecodeFailure(String),

    /// Invalid input parameters (e.g., an unknown search type).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NetworkFailure("connection refused".to_string());
        assert!(err.to_string().contains("NETWORK_FAILURE"));
        assert!(err.to_string().contains("connection refused"));

        let err = Error::DecodeFailure("expected value at line 1".to_string());
        assert!(err.to_string().starts_with("DECODE_FAILURE"));
    }
}
