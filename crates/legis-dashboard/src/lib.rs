//! Legis Dashboard
//!
//! Contracts and lobbying dashboards over any backend that can run named,
//! row-returning procedures.
//!
//! # Architecture
//!
//! ```text
//! DataStore ──► SummaryCache (moka, per procedure + params) ──► summary table
//!     │
//!     └──────► DrillDownCache (per group, single flight) ──► expanded rows
//! ```
//!
//! Tables are filtered and sorted client-side with [`TableQuery`].
//!
//! # Example
//!
//! ```rust
//! use legis_dashboard::{ContractDimension, ContractsDashboard, DashboardConfig, JsonStore};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonStore::from_json_str(r#"{
//!     "contracts_by_vendor": [{ "group": "ACME", "total_amount": 1500.0, "contract_count": 2 }],
//!     "contract_drilldown": {
//!         "key": ["dimension", "group"],
//!         "rows": { "vendor:ACME": [{ "contract_number": "C1" }, { "contract_number": "C2" }] }
//!     }
//! }"#)?;
//! let dashboard = ContractsDashboard::new(Arc::new(store), &DashboardConfig::default());
//!
//! let groups = dashboard.summary(ContractDimension::Vendor).await?;
//! let contracts = dashboard.load_contracts(ContractDimension::Vendor, &groups[0].group).await?;
//! assert_eq!(contracts.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod contracts;
pub mod error;
pub mod lobbying;
pub mod store;
pub mod summary;
pub mod table;

// Re-exports
pub use config::{DashboardConfig, MAX_SUMMARY_TTL_SECS};
pub use contracts::{ContractDimension, ContractGroup, ContractRow, ContractsDashboard};
pub use error::{ConfigError, DashboardError, DashboardResult, StoreError};
pub use lobbying::{LobbyingDashboard, LobbyistClient, LobbyistSummary};
pub use store::{call_typed, DataStore, JsonStore, ProcedureSource};
pub use summary::SummaryCache;
pub use table::{Cell, SortDirection, SortSpec, TableQuery, TableRow};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building dashboards
    pub use crate::config::DashboardConfig;
    pub use crate::contracts::{ContractDimension, ContractsDashboard};
    pub use crate::error::{DashboardError, DashboardResult};
    pub use crate::lobbying::LobbyingDashboard;
    pub use crate::store::{DataStore, JsonStore};
    pub use crate::table::{SortSpec, TableQuery, TableRow};
    pub use legis_drilldown::{FailurePolicy, Lookup};
}
