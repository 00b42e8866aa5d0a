//! Error types for the dashboard layer
//!
//! Provides error handling for:
//! - Data store calls (procedure lookup, transport, row decoding)
//! - Summary cache loads
//! - Configuration loading

use legis_drilldown::{DrillDownError, FetchError};
use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised by a [`DataStore`](crate::DataStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Procedure not exposed by the store
    #[error("unknown procedure: '{0}'")]
    UnknownProcedure(String),

    /// Request failed in transport or on the server
    #[error("request failed: {0}")]
    Request(String),

    /// Row did not match the expected shape
    #[error("failed to decode row from {procedure}: {source}")]
    Decode {
        /// Procedure that returned the row
        procedure: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Store document was malformed
    #[error("invalid store document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// IO error reading a store document
    #[error("io error reading {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create decode error for procedure
    pub fn decode(procedure: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            procedure: procedure.into(),
            source,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Decode { .. } | StoreError::InvalidDocument(_) => {
                FetchError::decode(err.to_string())
            }
            StoreError::UnknownProcedure(_) | StoreError::Request(_) | StoreError::Io { .. } => {
                FetchError::store(err.to_string())
            }
        }
    }
}

/// Errors loading dashboard configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// Combined dashboard error
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Store call or row decoding failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Summary load failed; shared by every caller that waited on it
    #[error("summary query failed: {0}")]
    Summary(Arc<StoreError>),

    /// Drill-down key rejected
    #[error("drill-down error: {0}")]
    DrillDown(#[from] DrillDownError),

    /// Drill-down fetch failed or was cancelled
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::UnknownProcedure("budget_totals".to_string());
        assert_eq!(err.to_string(), "unknown procedure: 'budget_totals'");
    }

    #[test]
    fn store_errors_map_to_fetch_errors() {
        let decode = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let fetch: FetchError = StoreError::decode("lobbyist_clients", decode).into();
        assert!(matches!(fetch, FetchError::Decode(_)));

        let fetch: FetchError = StoreError::Request("503".into()).into();
        assert_eq!(fetch, FetchError::store("request failed: 503"));
    }

    #[test]
    fn error_conversions() {
        let err: DashboardError = StoreError::Request("timeout".into()).into();
        assert!(matches!(err, DashboardError::Store(_)));
        let err: DashboardError = FetchError::Cancelled.into();
        assert!(matches!(err, DashboardError::Fetch(FetchError::Cancelled)));
    }
}
