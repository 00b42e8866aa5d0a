//! Data store interface
//!
//! The only contract the dashboards have with the backend: given a named
//! procedure and its parameters, return an awaitable sequence of JSON rows.

use crate::error::StoreError;
use async_trait::async_trait;
use legis_drilldown::{FetchError, RowSource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Backend exposing named, row-returning procedures
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Run `procedure` with `params`
    async fn call(&self, procedure: &str, params: &Value) -> Result<Vec<Value>, StoreError>;
}

#[async_trait]
impl<S: DataStore + ?Sized> DataStore for Arc<S> {
    async fn call(&self, procedure: &str, params: &Value) -> Result<Vec<Value>, StoreError> {
        (**self).call(procedure, params).await
    }
}

/// Call a procedure and decode every row
///
/// # Errors
/// The store's error, or `StoreError::Decode` for the first row that fails
pub async fn call_typed<T: DeserializeOwned>(
    store: &dyn DataStore,
    procedure: &str,
    params: &Value,
) -> Result<Vec<T>, StoreError> {
    let rows = store.call(procedure, params).await?;
    decode_rows(procedure, rows)
}

/// Decode JSON rows
///
/// # Errors
/// `StoreError::Decode` for the first row that fails
pub fn decode_rows<T: DeserializeOwned>(
    procedure: &str,
    rows: Vec<Value>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::decode(procedure, e)))
        .collect()
}

/// [`RowSource`] that answers drill-down keys with a store procedure
pub struct ProcedureSource<K, R> {
    store: Arc<dyn DataStore>,
    procedure: &'static str,
    params: fn(&K) -> Value,
    _rows: PhantomData<fn() -> R>,
}

impl<K, R> ProcedureSource<K, R> {
    /// Create source calling `procedure` with parameters built from the key
    #[must_use]
    pub fn new(
        store: Arc<dyn DataStore>,
        procedure: &'static str,
        params: fn(&K) -> Value,
    ) -> Self {
        Self {
            store,
            procedure,
            params,
            _rows: PhantomData,
        }
    }
}

#[async_trait]
impl<K, R> RowSource<K, R> for ProcedureSource<K, R>
where
    K: Debug + Send + Sync,
    R: DeserializeOwned + Send,
{
    async fn fetch(&self, key: &K) -> Result<Vec<R>, FetchError> {
        let params = (self.params)(key);
        tracing::debug!(procedure = self.procedure, ?key, "drill-down query");
        call_typed(self.store.as_ref(), self.procedure, &params)
            .await
            .map_err(FetchError::from)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProcedureData {
    Rows(Vec<Value>),
    Keyed {
        key: Vec<String>,
        rows: HashMap<String, Vec<Value>>,
    },
}

/// Store that answers from a static JSON document
///
/// The document maps procedure names either to a row array (returned for
/// any parameters) or to a keyed table:
///
/// ```json
/// {
///   "lobbying_totals": [{ "lobbyist": "Ostroff Associates", "total_compensation": 1200000.0, "client_count": 41 }],
///   "lobbyist_clients": {
///     "key": ["lobbyist"],
///     "rows": { "Ostroff Associates": [{ "client": "NYSUT", "compensation": 90000.0 }] }
///   }
/// }
/// ```
///
/// Keyed lookups join the named parameters with `:`; a missing entry
/// yields no rows.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    procedures: HashMap<String, ProcedureData>,
}

impl JsonStore {
    /// Parse a store document
    ///
    /// # Errors
    /// `StoreError::InvalidDocument` if the document is malformed
    pub fn from_json_str(document: &str) -> Result<Self, StoreError> {
        let procedures = serde_json::from_str(document)?;
        Ok(Self { procedures })
    }

    /// Read and parse a store document
    ///
    /// # Errors
    /// `StoreError::Io` if the file can't be read, `StoreError::InvalidDocument`
    /// if it is malformed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let document = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::io_error(path, e))?;
        Self::from_json_str(&document)
    }

    /// Procedure names in the document
    pub fn procedures(&self) -> impl Iterator<Item = &str> + '_ {
        self.procedures.keys().map(String::as_str)
    }
}

#[async_trait]
impl DataStore for JsonStore {
    async fn call(&self, procedure: &str, params: &Value) -> Result<Vec<Value>, StoreError> {
        let data = self
            .procedures
            .get(procedure)
            .ok_or_else(|| StoreError::UnknownProcedure(procedure.to_string()))?;
        match data {
            ProcedureData::Rows(rows) => Ok(rows.clone()),
            ProcedureData::Keyed { key, rows } => {
                let lookup = key
                    .iter()
                    .map(|name| param_string(params.get(name)))
                    .collect::<Vec<_>>()
                    .join(":");
                Ok(rows.get(&lookup).cloned().unwrap_or_default())
            }
        }
    }
}

fn param_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
