//! State contracts dashboard
//!
//! A summary table of contract totals grouped by vendor, department or
//! contract type; expanding a group drills down into its contracts.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::store::{DataStore, ProcedureSource};
use crate::summary::SummaryCache;
use crate::table::{Cell, TableRow};
use chrono::NaiveDate;
use legis_drilldown::{DrillDownCache, DrillKey, Lookup};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Procedure answering contract drill-downs
pub const CONTRACT_DRILLDOWN: &str = "contract_drilldown";

/// Grouping of the contracts summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractDimension {
    /// By vendor name
    Vendor,
    /// By contracting department
    Department,
    /// By contract type
    #[serde(rename = "type")]
    ContractType,
}

impl ContractDimension {
    /// All dimensions
    pub const ALL: [Self; 3] = [Self::Vendor, Self::Department, Self::ContractType];

    /// Dimension name, also the drill-down key prefix
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Department => "department",
            Self::ContractType => "type",
        }
    }

    /// Summary procedure for this dimension
    #[must_use]
    pub const fn procedure(self) -> &'static str {
        match self {
            Self::Vendor => "contracts_by_vendor",
            Self::Department => "contracts_by_department",
            Self::ContractType => "contracts_by_type",
        }
    }
}

impl Display for ContractDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown contract dimension '{s}'"))
    }
}

/// One row of the contracts summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractGroup {
    /// Group value (vendor, department or type)
    pub group: String,
    /// Sum of contract amounts
    #[serde(default)]
    pub total_amount: f64,
    /// Number of contracts
    #[serde(default)]
    pub contract_count: u64,
}

impl TableRow for ContractGroup {
    fn columns() -> &'static [&'static str] {
        &["group", "total_amount", "contract_count"]
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "group" => self.group.as_str().into(),
            "total_amount" => self.total_amount.into(),
            "contract_count" => self.contract_count.into(),
            _ => Cell::Empty,
        }
    }

    fn search_text(&self) -> String {
        self.group.clone()
    }
}

/// One contract in a drill-down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRow {
    /// Contract identifier
    pub contract_number: String,
    /// Vendor name
    #[serde(default)]
    pub vendor: Option<String>,
    /// Contracting department
    #[serde(default)]
    pub department: Option<String>,
    /// Contract type
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Contract amount
    #[serde(default)]
    pub amount: Option<f64>,
    /// Start date
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// End date
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
}

impl TableRow for ContractRow {
    fn columns() -> &'static [&'static str] {
        &[
            "contract_number",
            "vendor",
            "department",
            "contract_type",
            "amount",
            "start_date",
            "end_date",
        ]
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "contract_number" => self.contract_number.as_str().into(),
            "vendor" => Cell::text(self.vendor.as_deref()),
            "department" => Cell::text(self.department.as_deref()),
            "contract_type" => Cell::text(self.contract_type.as_deref()),
            "amount" => self.amount.into(),
            // ISO dates order correctly as text
            "start_date" => date_cell(self.start_date),
            "end_date" => date_cell(self.end_date),
            _ => Cell::Empty,
        }
    }

    fn search_text(&self) -> String {
        [
            Some(self.contract_number.as_str()),
            self.vendor.as_deref(),
            self.department.as_deref(),
            self.contract_type.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

fn date_cell(date: Option<NaiveDate>) -> Cell {
    date.map_or(Cell::Empty, |d| Cell::Text(d.to_string()))
}

fn drilldown_params(key: &DrillKey) -> Value {
    json!({ "dimension": key.dimension(), "group": key.group() })
}

/// Contracts dashboard over a data store
#[derive(Debug, Clone)]
pub struct ContractsDashboard {
    summaries: SummaryCache,
    contracts: DrillDownCache<DrillKey, ContractRow>,
}

impl ContractsDashboard {
    /// Create dashboard
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, config: &DashboardConfig) -> Self {
        let source = ProcedureSource::<DrillKey, ContractRow>::new(
            Arc::clone(&store),
            CONTRACT_DRILLDOWN,
            drilldown_params,
        );
        Self {
            summaries: SummaryCache::new(store, config),
            contracts: DrillDownCache::with_config(source, config.drilldown),
        }
    }

    /// Summary rows for a dimension
    ///
    /// # Errors
    /// `DashboardError::Summary` if the query fails, `DashboardError::Store`
    /// if a row is malformed
    pub async fn summary(
        &self,
        dimension: ContractDimension,
    ) -> DashboardResult<Vec<ContractGroup>> {
        self.summaries.get(dimension.procedure(), &Value::Null).await
    }

    /// Drill-down key for a group
    ///
    /// # Errors
    /// `DashboardError::DrillDown` if the key is rejected
    pub fn drill_key(dimension: ContractDimension, group: &str) -> DashboardResult<DrillKey> {
        Ok(DrillKey::new(dimension.as_str(), group)?)
    }

    /// Contracts of a group, starting the fetch on first access
    ///
    /// # Errors
    /// As [`drill_key`](Self::drill_key)
    pub fn contracts(
        &self,
        dimension: ContractDimension,
        group: &str,
    ) -> DashboardResult<Lookup<ContractRow>> {
        let key = Self::drill_key(dimension, group)?;
        Ok(self.contracts.lookup(&key))
    }

    /// Contracts of a group, waiting for the fetch
    ///
    /// # Errors
    /// `DashboardError::Fetch` if the fetch fails or is cancelled
    pub async fn load_contracts(
        &self,
        dimension: ContractDimension,
        group: &str,
    ) -> DashboardResult<Arc<[ContractRow]>> {
        let key = Self::drill_key(dimension, group)?;
        self.contracts.load(&key).await.map_err(DashboardError::from)
    }

    /// Summary cache
    #[inline]
    #[must_use]
    pub fn summaries(&self) -> &SummaryCache {
        &self.summaries
    }

    /// Drill-down cache
    #[inline]
    #[must_use]
    pub fn drilldown(&self) -> &DrillDownCache<DrillKey, ContractRow> {
        &self.contracts
    }
}
