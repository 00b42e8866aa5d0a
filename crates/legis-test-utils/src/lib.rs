//! Testing utilities for the legis workspace
//!
//! Shared test helpers, fixtures, and scripted backends.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::NaiveDate;
use legis_dashboard::{DataStore, StoreError};
use legis_drilldown::{FetchError, RowSource};
use legis_milestones::MilestoneEvent;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

// ---------------------------------------------------------------------------
// Milestone fixtures
// ---------------------------------------------------------------------------

/// Undated events for the given status codes
pub fn events(codes: &[&str]) -> Vec<MilestoneEvent> {
    codes.iter().copied().map(MilestoneEvent::new).collect()
}

/// Event on an ISO date
pub fn dated(code: &str, date: &str) -> MilestoneEvent {
    MilestoneEvent::new(code).on(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap())
}

/// History of a bill that passed both houses and was delivered to the governor
pub fn delivered_history() -> Vec<MilestoneEvent> {
    vec![
        dated("INTRODUCED", "2024-01-10"),
        dated("IN_ASSEMBLY_COMM", "2024-01-10"),
        dated("ASSEMBLY_FLOOR", "2024-03-04"),
        dated("PASSED_ASSEMBLY", "2024-03-12"),
        dated("PASSED_SENATE", "2024-05-20"),
        dated("DELIVERED_TO_GOV", "2024-11-02"),
    ]
}

// ---------------------------------------------------------------------------
// Scripted row source
// ---------------------------------------------------------------------------

type Response<R> = Result<Vec<R>, FetchError>;

struct Script<K, R> {
    responses: Mutex<HashMap<K, VecDeque<Response<R>>>>,
    panics: Mutex<HashSet<K>>,
    calls: Mutex<Vec<K>>,
    gate: Option<Semaphore>,
    completed: AtomicUsize,
    cancelled: AtomicUsize,
}

/// [`RowSource`] answering from a per-key script
///
/// Each fetch pops the next scripted response for its key, or returns no
/// rows when the script is exhausted. A gated source holds every fetch until
/// [`open`](Self::open) releases it, which makes in-flight states observable.
/// Fetches dropped before finishing (aborted tasks) are counted.
pub struct ScriptedSource<K, R> {
    script: Arc<Script<K, R>>,
}

impl<K, R> Clone for ScriptedSource<K, R> {
    fn clone(&self) -> Self {
        Self {
            script: Arc::clone(&self.script),
        }
    }
}

impl<K: Eq + Hash + Clone, R> ScriptedSource<K, R> {
    /// Source answering immediately
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Source holding every fetch until released
    pub fn gated() -> Self {
        Self::build(Some(Semaphore::new(0)))
    }

    fn build(gate: Option<Semaphore>) -> Self {
        Self {
            script: Arc::new(Script {
                responses: Mutex::new(HashMap::new()),
                panics: Mutex::new(HashSet::new()),
                calls: Mutex::new(Vec::new()),
                gate,
                completed: AtomicUsize::new(0),
                cancelled: AtomicUsize::new(0),
            }),
        }
    }

    /// Queue a response for key
    pub fn respond(&self, key: K, response: Response<R>) -> &Self {
        self.script
            .responses
            .lock()
            .entry(key)
            .or_default()
            .push_back(response);
        self
    }

    /// Queue rows for key
    pub fn rows(&self, key: K, rows: Vec<R>) -> &Self {
        self.respond(key, Ok(rows))
    }

    /// Queue a failure for key
    pub fn fail(&self, key: K, err: FetchError) -> &Self {
        self.respond(key, Err(err))
    }

    /// Panic when key is fetched
    pub fn panic_on(&self, key: K) -> &Self {
        self.script.panics.lock().insert(key);
        self
    }

    /// Release `n` gated fetches
    pub fn open(&self, n: usize) {
        if let Some(gate) = &self.script.gate {
            gate.add_permits(n);
        }
    }

    /// Fetches started
    pub fn calls(&self) -> usize {
        self.script.calls.lock().len()
    }

    /// Fetches started for key
    pub fn calls_for(&self, key: &K) -> usize {
        self.script.calls.lock().iter().filter(|k| *k == key).count()
    }

    /// Fetches that returned
    pub fn completed(&self) -> usize {
        self.script.completed.load(Ordering::SeqCst)
    }

    /// Fetches dropped before returning
    pub fn cancelled(&self) -> usize {
        self.script.cancelled.load(Ordering::SeqCst)
    }
}

impl<K: Eq + Hash + Clone, R> Default for ScriptedSource<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

struct FetchGuard<'a, K, R> {
    script: &'a Script<K, R>,
    done: bool,
}

impl<K, R> Drop for FetchGuard<'_, K, R> {
    fn drop(&mut self) {
        let counter = if self.done {
            &self.script.completed
        } else {
            &self.script.cancelled
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<K, R> RowSource<K, R> for ScriptedSource<K, R>
where
    K: Eq + Hash + Clone + Send + Sync,
    R: Send + Sync,
{
    async fn fetch(&self, key: &K) -> Result<Vec<R>, FetchError> {
        self.script.calls.lock().push(key.clone());
        let mut guard = FetchGuard {
            script: &self.script,
            done: false,
        };

        if let Some(gate) = &self.script.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if self.script.panics.lock().contains(key) {
            panic!("scripted panic");
        }

        let response = self
            .script
            .responses
            .lock()
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Vec::new()));
        guard.done = true;
        response
    }
}

// ---------------------------------------------------------------------------
// In-memory data store
// ---------------------------------------------------------------------------

/// [`DataStore`] answering from in-memory tables and recording every call
///
/// Responses are looked up by `(procedure, params)`, falling back to
/// `(procedure, null)`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<(String, String), Result<Vec<Value>, String>>>,
    calls: Mutex<Vec<(String, Value)>>,
    delay: Option<Duration>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Rows for a procedure regardless of params
    pub fn with_rows(self, procedure: &str, rows: Vec<Value>) -> Self {
        self.insert(procedure, Value::Null, Ok(rows));
        self
    }

    /// Rows for a procedure called with exactly `params`
    pub fn with_keyed_rows(self, procedure: &str, params: Value, rows: Vec<Value>) -> Self {
        self.insert(procedure, params, Ok(rows));
        self
    }

    /// Failure for a procedure regardless of params
    pub fn with_failure(self, procedure: &str, message: &str) -> Self {
        self.insert(procedure, Value::Null, Err(message.to_string()));
        self
    }

    pub fn insert(&self, procedure: &str, params: Value, response: Result<Vec<Value>, String>) {
        self.tables
            .lock()
            .insert((procedure.to_string(), params.to_string()), response);
    }

    /// Every call made, in order
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    /// Number of calls to a procedure
    pub fn calls_to(&self, procedure: &str) -> usize {
        self.calls.lock().iter().filter(|(p, _)| p == procedure).count()
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn call(&self, procedure: &str, params: &Value) -> Result<Vec<Value>, StoreError> {
        self.calls.lock().push((procedure.to_string(), params.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let tables = self.tables.lock();
        let response = tables
            .get(&(procedure.to_string(), params.to_string()))
            .or_else(|| tables.get(&(procedure.to_string(), Value::Null.to_string())))
            .cloned()
            .ok_or_else(|| StoreError::UnknownProcedure(procedure.to_string()))?;
        response.map_err(StoreError::Request)
    }
}

/// Store document with contracts and lobbying data
pub const DASHBOARD_DOCUMENT: &str = r#"{
    "contracts_by_vendor": [
        { "group": "ACME CORP", "total_amount": 250000.0, "contract_count": 2 },
        { "group": "Hudson Valley Paving", "total_amount": 1200000.0, "contract_count": 1 }
    ],
    "contracts_by_department": [
        { "group": "TRANSPORTATION, DEPT OF", "total_amount": 1450000.0, "contract_count": 3 }
    ],
    "contracts_by_type": [],
    "contract_drilldown": {
        "key": ["dimension", "group"],
        "rows": {
            "vendor:ACME CORP": [
                { "contract_number": "C100001", "vendor": "ACME CORP", "amount": 200000.0, "start_date": "2023-07-01" },
                { "contract_number": "C100002", "vendor": "ACME CORP", "amount": 50000.0 }
            ]
        }
    },
    "lobbying_totals": [
        { "lobbyist": "Capitol Partners", "total_compensation": 410000.0, "client_count": 12 },
        { "lobbyist": "Empire Strategies", "total_compensation": 980000.0, "client_count": 31 }
    ],
    "lobbyist_clients": {
        "key": ["lobbyist"],
        "rows": {
            "Empire Strategies": [
                { "client": "Hospital Association", "compensation": 120000.0, "year": 2024 }
            ]
        }
    }
}"#;

// ---------------------------------------------------------------------------
// Async helpers
// ---------------------------------------------------------------------------

/// Wait until `condition` holds, panicking after one second
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached within 1s"
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
