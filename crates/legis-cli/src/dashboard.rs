//! `legis dashboard`

use crate::render::render_table;
use anyhow::{bail, Context, Result};
use legis_dashboard::{
    ContractDimension, ContractGroup, ContractsDashboard, DashboardConfig, DataStore, JsonStore,
    LobbyingDashboard, LobbyistSummary, SortSpec, TableQuery, TableRow,
};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Which dashboard to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    /// Contracts grouped by a dimension, optionally drilling into one group
    Contracts {
        /// Grouping
        by: ContractDimension,
        /// Group to expand
        drill: Option<String>,
    },
    /// Lobbyists, optionally drilling into one lobbyist's clients
    Lobbying {
        /// Lobbyist to expand
        drill: Option<String>,
    },
}

/// Arguments of the dashboard command
#[derive(Debug, Clone)]
pub struct DashboardArgs {
    /// Store document
    pub data: PathBuf,
    /// TOML configuration
    pub config: Option<PathBuf>,
    /// Summary search text
    pub search: Option<String>,
    /// Summary sort column
    pub sort: Option<String>,
    /// Sort descending
    pub desc: bool,
    /// View to render
    pub view: DashboardView,
}

impl DashboardArgs {
    fn query<T: TableRow>(&self) -> Result<TableQuery> {
        let mut query = TableQuery::new().with_search(self.search.clone().unwrap_or_default());
        if let Some(column) = &self.sort {
            if !T::columns().contains(&column.as_str()) {
                bail!(
                    "unknown sort column '{column}', expected one of: {}",
                    T::columns().join(", ")
                );
            }
            let sort = if self.desc {
                SortSpec::desc(column.as_str())
            } else {
                SortSpec::asc(column.as_str())
            };
            query = query.with_sort(sort);
        }
        Ok(query)
    }
}

/// Run the command, returning its output
///
/// # Errors
/// If the store or configuration can't be loaded, or a query fails
pub async fn run(args: &DashboardArgs) -> Result<String> {
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let store: Arc<dyn DataStore> = Arc::new(
        JsonStore::load(&args.data)
            .await
            .with_context(|| format!("loading store {}", args.data.display()))?,
    );

    let mut out = String::new();
    match &args.view {
        DashboardView::Contracts { by, drill } => {
            let dashboard = ContractsDashboard::new(store, &config);
            let groups = dashboard.summary(*by).await?;
            writeln!(out, "Contracts by {by}")?;
            out.push_str(&render_table(&args.query::<ContractGroup>()?.apply(&groups)));

            if let Some(group) = drill {
                let rows = dashboard.load_contracts(*by, group).await?;
                let refs: Vec<_> = rows.iter().collect();
                writeln!(out, "\nContracts for {by} '{group}'")?;
                out.push_str(&render_table(&refs));
            }
        }
        DashboardView::Lobbying { drill } => {
            let dashboard = LobbyingDashboard::new(store, &config);
            let lobbyists = dashboard.lobbyists().await?;
            writeln!(out, "Lobbyists by compensation")?;
            out.push_str(&render_table(&args.query::<LobbyistSummary>()?.apply(&lobbyists)));

            if let Some(lobbyist) = drill {
                let clients = dashboard.load_clients(lobbyist).await?;
                let refs: Vec<_> = clients.iter().collect();
                writeln!(out, "\nClients of {lobbyist}")?;
                out.push_str(&render_table(&refs));
            }
        }
    }
    Ok(out)
}
