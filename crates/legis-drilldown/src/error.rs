//! Error types for drill-down fetching

/// Failure of a single drill-down fetch
///
/// Stored in the cache, so it is `Clone` and carries messages rather than
/// source errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Data store rejected or failed the request
    #[error("data store error: {0}")]
    Store(String),

    /// Rows came back in an unexpected shape
    #[error("failed to decode rows: {0}")]
    Decode(String),

    /// Fetch was cancelled before it completed
    #[error("fetch cancelled")]
    Cancelled,

    /// Row source panicked
    #[error("fetch task panicked: {0}")]
    Panicked(String),

    /// No Tokio runtime to run the fetch on
    #[error("no async runtime available to run fetch")]
    NoRuntime,
}

impl FetchError {
    /// Create store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether retrying the same key may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Cancelled | Self::Panicked(_))
    }
}

/// Errors from drill-down key handling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrillDownError {
    /// Composite key could not be parsed
    #[error("invalid drill-down key '{key}': {reason}")]
    InvalidKey {
        /// Rejected key text
        key: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Underlying fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

impl DrillDownError {
    /// Create invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }
}

/// Result type alias for drill-down operations
pub type DrillDownResult<T> = Result<T, DrillDownError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        assert_eq!(
            FetchError::store("timeout").to_string(),
            "data store error: timeout"
        );
        assert_eq!(FetchError::Cancelled.to_string(), "fetch cancelled");
    }

    #[test]
    fn retryable_classification() {
        assert!(FetchError::store("503").is_retryable());
        assert!(!FetchError::decode("missing field").is_retryable());
        assert!(!FetchError::NoRuntime.is_retryable());
    }

    #[test]
    fn fetch_error_converts() {
        let err: DrillDownError = FetchError::Cancelled.into();
        assert!(matches!(err, DrillDownError::Fetch(FetchError::Cancelled)));
    }
}
