//! Legis Drill-Down
//!
//! Cache-first access to secondary dashboard data ("contracts for this
//! vendor", "clients for this lobbyist") that is fetched lazily the first
//! time a summary row is expanded.
//!
//! # Guarantees
//!
//! - At most one fetch in flight per key
//! - A resolved key is never fetched again for the life of the cache
//! - Results of cancelled fetches never populate the cache
//!
//! # Example
//!
//! ```rust
//! use legis_drilldown::{DrillDownCache, FetchError, FnSource};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), FetchError> {
//! let cache = DrillDownCache::new(FnSource::new(|vendor: String| async move {
//!     Ok(vec![format!("{vendor} / contract #1")])
//! }));
//!
//! // First access starts the fetch and returns nothing yet
//! assert!(cache.get(&"ACME".to_string()).is_empty());
//!
//! // Wait for it, then read synchronously
//! cache.load(&"ACME".to_string()).await?;
//! assert_eq!(cache.get(&"ACME".to_string()).len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod source;

// Re-exports
pub use cache::{CacheStats, DrillDownCache, Lookup};
pub use config::{DrillDownConfig, FailurePolicy};
pub use error::{DrillDownError, DrillDownResult, FetchError};
pub use key::DrillKey;
pub use source::{FnSource, RowSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
