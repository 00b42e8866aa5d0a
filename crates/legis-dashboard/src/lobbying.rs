//! Lobbying dashboard
//!
//! Lobbyists ranked by reported compensation; expanding a lobbyist lists
//! the clients behind the total.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::store::{DataStore, ProcedureSource};
use crate::summary::SummaryCache;
use crate::table::{Cell, TableRow};
use legis_drilldown::{DrillDownCache, Lookup};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Procedure returning per-lobbyist totals
pub const LOBBYING_TOTALS: &str = "lobbying_totals";
/// Procedure returning one lobbyist's clients
pub const LOBBYIST_CLIENTS: &str = "lobbyist_clients";

/// One lobbyist in the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyistSummary {
    /// Registered lobbyist name
    pub lobbyist: String,
    /// Total reported compensation
    #[serde(default)]
    pub total_compensation: f64,
    /// Number of clients
    #[serde(default)]
    pub client_count: u64,
}

impl TableRow for LobbyistSummary {
    fn columns() -> &'static [&'static str] {
        &["lobbyist", "total_compensation", "client_count"]
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "lobbyist" => self.lobbyist.as_str().into(),
            "total_compensation" => self.total_compensation.into(),
            "client_count" => self.client_count.into(),
            _ => Cell::Empty,
        }
    }

    fn search_text(&self) -> String {
        self.lobbyist.clone()
    }
}

/// One client of a lobbyist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyistClient {
    /// Client name
    pub client: String,
    /// Compensation from this client
    #[serde(default)]
    pub compensation: Option<f64>,
    /// Reporting year
    #[serde(default)]
    pub year: Option<u64>,
}

impl TableRow for LobbyistClient {
    fn columns() -> &'static [&'static str] {
        &["client", "compensation", "year"]
    }

    fn cell(&self, column: &str) -> Cell {
        match column {
            "client" => self.client.as_str().into(),
            "compensation" => self.compensation.into(),
            "year" => self.year.map_or(Cell::Empty, Cell::from),
            _ => Cell::Empty,
        }
    }

    fn search_text(&self) -> String {
        self.client.clone()
    }
}

#[allow(clippy::ptr_arg)]
fn client_params(lobbyist: &String) -> Value {
    json!({ "lobbyist": lobbyist })
}

/// Lobbying dashboard over a data store
#[derive(Debug, Clone)]
pub struct LobbyingDashboard {
    summaries: SummaryCache,
    clients: DrillDownCache<String, LobbyistClient>,
}

impl LobbyingDashboard {
    /// Create dashboard
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, config: &DashboardConfig) -> Self {
        let source = ProcedureSource::<String, LobbyistClient>::new(
            Arc::clone(&store),
            LOBBYIST_CLIENTS,
            client_params,
        );
        Self {
            summaries: SummaryCache::new(store, config),
            clients: DrillDownCache::with_config(source, config.drilldown),
        }
    }

    /// Lobbyists with their totals, highest compensation first
    ///
    /// # Errors
    /// `DashboardError::Summary` if the query fails, `DashboardError::Store`
    /// if a row is malformed
    pub async fn lobbyists(&self) -> DashboardResult<Vec<LobbyistSummary>> {
        let mut rows: Vec<LobbyistSummary> =
            self.summaries.get(LOBBYING_TOTALS, &Value::Null).await?;
        rows.sort_by(|a, b| b.total_compensation.total_cmp(&a.total_compensation));
        Ok(rows)
    }

    /// Clients of a lobbyist, starting the fetch on first access
    #[must_use]
    pub fn clients(&self, lobbyist: &str) -> Lookup<LobbyistClient> {
        self.clients.lookup(&lobbyist.to_string())
    }

    /// Clients of a lobbyist, waiting for the fetch
    ///
    /// # Errors
    /// `DashboardError::Fetch` if the fetch fails or is cancelled
    pub async fn load_clients(&self, lobbyist: &str) -> DashboardResult<Arc<[LobbyistClient]>> {
        self.clients
            .load(&lobbyist.to_string())
            .await
            .map_err(DashboardError::from)
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
    pub fn drilldown(&self) -> &DrillDownCache<String, LobbyistClient> {
        &self.clients
    }
}
