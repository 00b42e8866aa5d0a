//! End-to-end dashboard behaviour over scripted and file-backed stores.

use legis_dashboard::prelude::*;
use legis_dashboard::{ConfigError, ContractGroup, StoreError};
use legis_drilldown::FetchError;
use legis_test_utils::{InMemoryStore, DASHBOARD_DOCUMENT};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn vendor_rows() -> Vec<serde_json::Value> {
    vec![
        json!({ "group": "ACME CORP", "total_amount": 250000.0, "contract_count": 2 }),
        json!({
            "group": "Hudson Valley Paving",
            "total_amount": 1200000.0,
            "contract_count": 1
        }),
    ]
}

#[tokio::test]
async fn test_summary_is_fetched_once() {
    let store = Arc::new(InMemoryStore::new().with_rows("contracts_by_vendor", vendor_rows()));
    let dashboard = ContractsDashboard::new(store.clone(), &DashboardConfig::default());

    let first = dashboard.summary(ContractDimension::Vendor).await.unwrap();
    let second = dashboard.summary(ContractDimension::Vendor).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(store.calls_to("contracts_by_vendor"), 1);
}

#[tokio::test]
async fn test_concurrent_summaries_share_one_call() {
    let store = Arc::new(
        InMemoryStore::new()
            .with_delay(Duration::from_millis(20))
            .with_rows("contracts_by_vendor", vendor_rows()),
    );
    let dashboard = ContractsDashboard::new(store.clone(), &DashboardConfig::default());

    let (a, b) = tokio::join!(
        dashboard.summary(ContractDimension::Vendor),
        dashboard.summary(ContractDimension::Vendor)
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(store.calls_to("contracts_by_vendor"), 1);
}

#[tokio::test]
async fn test_failed_summary_is_not_cached() {
    let store = Arc::new(
        InMemoryStore::new().with_failure("lobbying_totals", "503 Service Unavailable"),
    );
    let dashboard = LobbyingDashboard::new(store.clone(), &DashboardConfig::default());

    let err = dashboard.lobbyists().await.unwrap_err();
    match err {
        DashboardError::Summary(inner) => {
            assert!(matches!(&*inner, StoreError::Request(msg) if msg.contains("503")));
        }
        other => panic!("expected summary error, got {other:?}"),
    }
    assert!(dashboard.lobbyists().await.is_err());
    assert_eq!(store.calls_to("lobbying_totals"), 2);
}

#[tokio::test]
async fn test_malformed_summary_row_is_a_store_error() {
    let store = Arc::new(
        InMemoryStore::new().with_rows("contracts_by_type", vec![json!({ "total_amount": 1.0 })]),
    );
    let dashboard = ContractsDashboard::new(store, &DashboardConfig::default());

    let err = dashboard.summary(ContractDimension::ContractType).await.unwrap_err();
    assert!(matches!(err, DashboardError::Store(StoreError::Decode { .. })));
}

#[tokio::test]
async fn test_contract_drilldown_fetches_once_per_group() {
    let store = Arc::new(InMemoryStore::new().with_keyed_rows(
        "contract_drilldown",
        json!({ "dimension": "vendor", "group": "ACME CORP" }),
        vec![json!({ "contract_number": "C100001", "amount": 200000.0 })],
    ));
    let dashboard = ContractsDashboard::new(store.clone(), &DashboardConfig::default());

    let first = dashboard.contracts(ContractDimension::Vendor, "ACME CORP").unwrap();
    assert!(first.is_loading());
    assert!(first.rows().is_empty());
    assert!(dashboard
        .contracts(ContractDimension::Vendor, "ACME CORP")
        .unwrap()
        .is_loading());

    let rows = dashboard
        .load_contracts(ContractDimension::Vendor, "ACME CORP")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].contract_number, "C100001");
    assert_eq!(store.calls_to("contract_drilldown"), 1);

    let stats = dashboard.drilldown().stats();
    assert_eq!(stats.ready, 1);
    assert_eq!(stats.fetches_issued, 1);
}

#[tokio::test]
async fn test_drilldown_store_failure_surfaces_as_fetch_error() {
    let store = Arc::new(InMemoryStore::new());
    let dashboard = ContractsDashboard::new(store, &DashboardConfig::default());

    let err = dashboard
        .load_contracts(ContractDimension::Department, "HEALTH, DEPT OF")
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Fetch(FetchError::Store(_))));
    assert!(dashboard
        .contracts(ContractDimension::Department, "HEALTH, DEPT OF")
        .unwrap()
        .is_loading());
}

#[tokio::test]
async fn test_dashboards_from_store_document() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DASHBOARD_DOCUMENT.as_bytes()).unwrap();
    let store: Arc<dyn DataStore> = Arc::new(JsonStore::load(file.path()).await.unwrap());
    let config = DashboardConfig::default();

    let lobbying = LobbyingDashboard::new(Arc::clone(&store), &config);
    let lobbyists = lobbying.lobbyists().await.unwrap();
    assert_eq!(lobbyists[0].lobbyist, "Empire Strategies");
    let clients = lobbying.load_clients("Empire Strategies").await.unwrap();
    assert_eq!(clients[0].client, "Hospital Association");
    assert!(lobbying.load_clients("Capitol Partners").await.unwrap().is_empty());

    let contracts = ContractsDashboard::new(store, &config);
    let rows = contracts
        .load_contracts(ContractDimension::Vendor, "ACME CORP")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_missing_store_document() {
    let err = JsonStore::load("/nonexistent/legis/store.json").await.unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[tokio::test]
async fn test_summary_table_query() {
    let store = Arc::new(JsonStore::from_json_str(DASHBOARD_DOCUMENT).unwrap());
    let dashboard = ContractsDashboard::new(store, &DashboardConfig::default());
    let groups = dashboard.summary(ContractDimension::Vendor).await.unwrap();

    let query = TableQuery::new().with_sort(SortSpec::desc("total_amount"));
    let sorted_rows = query.apply(&groups);
    let sorted: Vec<&str> = sorted_rows.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(sorted, vec!["Hudson Valley Paving", "ACME CORP"]);

    let query = TableQuery::new().with_search("acme");
    let found: Vec<&ContractGroup> = query.apply(&groups);
    assert_eq!(found.len(), 1);
}

#[test]
fn test_config_file_loading() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "summary_capacity = 50\n\n[drilldown]\nfailure_policy = \"sticky\"").unwrap();

    let config = DashboardConfig::load(file.path()).unwrap();
    assert_eq!(config.summary_capacity, 50);
    assert_eq!(config.summary_ttl_secs, 300);
    assert_eq!(config.drilldown.failure_policy, FailurePolicy::Sticky);

    let err = DashboardConfig::load("/nonexistent/legis.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[tokio::test]
async fn test_loaded_ttl_never_breaks_dashboard_construction() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "summary_ttl_secs = 99999999999").unwrap();
    let err = DashboardConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "summary_ttl_secs", .. }));

    let config = DashboardConfig::from_toml_str(&format!(
        "summary_ttl_secs = {}",
        legis_dashboard::MAX_SUMMARY_TTL_SECS
    ))
    .unwrap();
    let store = Arc::new(InMemoryStore::new().with_rows("lobbying_totals", vec![]));
    let lobbying = LobbyingDashboard::new(store.clone(), &config);
    assert!(lobbying.lobbyists().await.unwrap().is_empty());
    let _contracts = ContractsDashboard::new(store, &config);
}
