//! Single-flight drill-down cache
//!
//! Synchronous, cache-first access to rows that are fetched asynchronously.
//! The first access to a key starts exactly one background fetch and returns
//! an empty result; later accesses return the cached rows once the fetch
//! lands. Subscribers to [`DrillDownCache::subscribe`] are told whenever an
//! entry changes so they can read again.
//!
//! Entries are never evicted. Each fetch carries a ticket; a result whose
//! ticket no longer matches the entry (after [`DrillDownCache::cancel_all`]
//! or [`DrillDownCache::reset`]) is discarded.

use crate::config::{DrillDownConfig, FailurePolicy};
use crate::error::FetchError;
use crate::source::RowSource;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::FutureExt;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Observable state of a key
#[derive(Debug, Clone)]
pub enum Lookup<R> {
    /// Fetch in flight
    Loading,
    /// Rows available
    Ready(Arc<[R]>),
    /// Last fetch failed
    Failed(FetchError),
}

impl<R> Lookup<R> {
    /// Rows if ready, empty otherwise
    #[must_use]
    pub fn rows(&self) -> Arc<[R]> {
        match self {
            Self::Ready(rows) => Arc::clone(rows),
            Self::Loading | Self::Failed(_) => empty_rows(),
        }
    }

    /// Whether a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether rows are available
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Failure, if the last fetch failed
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Keys with any state
    pub entries: usize,
    /// Keys with rows
    pub ready: usize,
    /// Keys with a fetch in flight
    pub loading: usize,
    /// Keys whose last fetch failed
    pub failed: usize,
    /// Fetches started over the cache lifetime
    pub fetches_issued: u64,
}

enum Slot<R> {
    Loading {
        ticket: u64,
        abort: Option<AbortHandle>,
    },
    Ready(Arc<[R]>),
    Failed(FetchError),
}

impl<R> Slot<R> {
    fn lookup(&self) -> Lookup<R> {
        match self {
            Self::Loading { .. } => Lookup::Loading,
            Self::Ready(rows) => Lookup::Ready(Arc::clone(rows)),
            Self::Failed(err) => Lookup::Failed(err.clone()),
        }
    }
}

struct Inner<K, R>
where
    K: Eq + Hash + Send + Sync,
    R: Send,
{
    source: Arc<dyn RowSource<K, R>>,
    slots: DashMap<K, Slot<R>>,
    tickets: AtomicU64,
    fetches: AtomicU64,
    changes: watch::Sender<u64>,
    config: DrillDownConfig,
}

impl<K, R> Inner<K, R>
where
    K: Eq + Hash + Debug + Send + Sync,
    R: Send,
{
    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    fn complete(&self, key: &K, ticket: u64, result: Result<Vec<R>, FetchError>) {
        let Some(mut slot) = self.slots.get_mut(key) else {
            tracing::debug!(?key, ticket, "discarding result for removed key");
            return;
        };
        if !matches!(&*slot, Slot::Loading { ticket: t, .. } if *t == ticket) {
            tracing::debug!(?key, ticket, "discarding stale drill-down result");
            return;
        }
        *slot = match result {
            Ok(rows) => {
                tracing::info!(?key, rows = rows.len(), "drill-down fetch complete");
                Slot::Ready(Arc::from(rows))
            }
            Err(err) => {
                tracing::warn!(?key, error = %err, "drill-down fetch failed");
                Slot::Failed(err)
            }
        };
        drop(slot);
        self.notify();
    }
}

impl<K, R> Drop for Inner<K, R>
where
    K: Eq + Hash + Send + Sync,
    R: Send,
{
    fn drop(&mut self) {
        for mut slot in self.slots.iter_mut() {
            if let Slot::Loading { abort, .. } = slot.value_mut() {
                if let Some(handle) = abort.take() {
                    handle.abort();
                }
            }
        }
    }
}

/// Memoizing, single-flight fetcher keyed by `K` yielding rows of `R`
///
/// Clones share the same entries. In-flight fetches are aborted when the
/// last clone is dropped.
pub struct DrillDownCache<K, R>
where
    K: Eq + Hash + Send + Sync,
    R: Send,
{
    inner: Arc<Inner<K, R>>,
}

impl<K, R> Clone for DrillDownCache<K, R>
where
    K: Eq + Hash + Send + Sync,
    R: Send,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, R> DrillDownCache<K, R>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Create cache over a row source with default configuration
    #[must_use]
    pub fn new(source: impl RowSource<K, R> + 'static) -> Self {
        Self::with_config(source, DrillDownConfig::default())
    }

    /// Create cache with explicit configuration
    #[must_use]
    pub fn with_config(source: impl RowSource<K, R> + 'static, config: DrillDownConfig) -> Self {
        Self::from_shared(Arc::new(source), config)
    }

    /// Create cache over an already shared source
    #[must_use]
    pub fn from_shared(source: Arc<dyn RowSource<K, R>>, config: DrillDownConfig) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                source,
                slots: DashMap::new(),
                tickets: AtomicU64::new(0),
                fetches: AtomicU64::new(0),
                changes,
                config,
            }),
        }
    }

    /// Rows for `key`, empty until its fetch resolves
    ///
    /// Starts the fetch on first access. Never starts a second fetch while
    /// one is in flight.
    #[must_use]
    pub fn get(&self, key: &K) -> Arc<[R]> {
        self.lookup(key).rows()
    }

    /// State for `key`, starting a fetch when needed
    pub fn lookup(&self, key: &K) -> Lookup<R> {
        let ticket = match self.inner.slots.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                match entry.get() {
                    Slot::Ready(rows) => return Lookup::Ready(Arc::clone(rows)),
                    Slot::Loading { .. } => return Lookup::Loading,
                    Slot::Failed(err)
                        if self.inner.config.failure_policy == FailurePolicy::Sticky =>
                    {
                        return Lookup::Failed(err.clone());
                    }
                    Slot::Failed(_) => {}
                }
                let ticket = self.inner.next_ticket();
                entry.insert(Slot::Loading {
                    ticket,
                    abort: None,
                });
                ticket
            }
            Entry::Vacant(entry) => {
                let ticket = self.inner.next_ticket();
                entry.insert(Slot::Loading {
                    ticket,
                    abort: None,
                });
                ticket
            }
        };
        self.spawn_fetch(key.clone(), ticket);
        Lookup::Loading
    }

    /// State for `key` without starting a fetch
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<Lookup<R>> {
        self.inner.slots.get(key).map(|slot| slot.lookup())
    }

    /// Wait for rows for `key`, starting or joining its fetch
    ///
    /// # Errors
    /// The fetch's error, or `FetchError::Cancelled` if the entry was
    /// cancelled while waiting
    pub async fn load(&self, key: &K) -> Result<Arc<[R]>, FetchError> {
        let mut changes = self.inner.changes.subscribe();
        let mut state = self.lookup(key);
        loop {
            match state {
                Lookup::Ready(rows) => return Ok(rows),
                Lookup::Failed(err) => return Err(err),
                Lookup::Loading => {
                    if changes.changed().await.is_err() {
                        return Err(FetchError::Cancelled);
                    }
                    state = self.peek(key).ok_or(FetchError::Cancelled)?;
                }
            }
        }
    }

    /// Clear a failed entry and fetch it again
    ///
    /// Ready and loading entries are left alone.
    pub fn retry(&self, key: &K) -> Lookup<R> {
        self.inner
            .slots
            .remove_if(key, |_, slot| matches!(slot, Slot::Failed(_)));
        self.lookup(key)
    }

    /// Abort every in-flight fetch and forget those keys
    ///
    /// Ready and failed entries are kept. Returns the number cancelled.
    pub fn cancel_all(&self) -> usize {
        let mut cancelled = 0;
        self.inner.slots.retain(|_, slot| match slot {
            Slot::Loading { abort, .. } => {
                if let Some(handle) = abort.take() {
                    handle.abort();
                }
                cancelled += 1;
                false
            }
            Slot::Ready(_) | Slot::Failed(_) => true,
        });
        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled in-flight drill-down fetches");
            self.inner.notify();
        }
        cancelled
    }

    /// Abort in-flight fetches and drop every entry
    pub fn reset(&self) {
        self.cancel_all();
        self.inner.slots.clear();
        self.inner.notify();
    }

    /// Receiver bumped each time an entry changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    /// Number of keys with any state
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.slots.len()
    }

    /// Whether no key has been requested
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.slots.is_empty()
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            fetches_issued: self.inner.fetches.load(Ordering::Relaxed),
            ..CacheStats::default()
        };
        for slot in self.inner.slots.iter() {
            stats.entries += 1;
            match slot.value() {
                Slot::Loading { .. } => stats.loading += 1,
                Slot::Ready(_) => stats.ready += 1,
                Slot::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> DrillDownConfig {
        self.inner.config
    }

    fn spawn_fetch(&self, key: K, ticket: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(?key, "no tokio runtime; drill-down fetch not started");
            self.inner.complete(&key, ticket, Err(FetchError::NoRuntime));
            return;
        };

        self.inner.fetches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?key, ticket, "starting drill-down fetch");

        let source = Arc::clone(&self.inner.source);
        let weak: Weak<Inner<K, R>> = Arc::downgrade(&self.inner);
        let task_key = key.clone();
        let handle = runtime.spawn(async move {
            let result = match AssertUnwindSafe(source.fetch(&task_key)).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(FetchError::Panicked(panic_message(&*payload))),
            };
            if let Some(inner) = weak.upgrade() {
                inner.complete(&task_key, ticket, result);
            }
        });

        if let Some(mut slot) = self.inner.slots.get_mut(&key) {
            if let Slot::Loading { ticket: t, abort } = slot.value_mut() {
                if *t == ticket {
                    *abort = Some(handle.abort_handle());
                }
            }
        }
    }
}

impl<K, R> Debug for DrillDownCache<K, R>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrillDownCache")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

fn empty_rows<R>() -> Arc<[R]> {
    Arc::from(Vec::new())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FnSource;

    #[test]
    fn lookup_rows_are_empty_unless_ready() {
        let loading: Lookup<u8> = Lookup::Loading;
        assert!(loading.rows().is_empty());
        assert!(loading.is_loading());

        let failed: Lookup<u8> = Lookup::Failed(FetchError::Cancelled);
        assert!(failed.rows().is_empty());
        assert_eq!(failed.error(), Some(&FetchError::Cancelled));

        let ready = Lookup::Ready(Arc::from(vec![1u8, 2]));
        assert_eq!(&*ready.rows(), &[1, 2]);
        assert!(ready.is_ready());
    }

    #[test]
    fn panic_message_extracts_strings() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");
    }

    #[test]
    fn without_runtime_entry_fails() {
        let cache = DrillDownCache::new(FnSource::new(|_: u32| async { Ok(vec![1u8]) }));
        assert!(cache.get(&7).is_empty());
        assert_eq!(cache.peek(&7).unwrap().error(), Some(&FetchError::NoRuntime));
        assert_eq!(cache.stats().fetches_issued, 0);
    }

    #[tokio::test]
    async fn stats_track_states() {
        let cache = DrillDownCache::new(FnSource::new(|k: u32| async move {
            if k == 0 {
                Err(FetchError::store("no rows for zero"))
            } else {
                Ok(vec![k])
            }
        }));
        assert!(cache.load(&1).await.is_ok());
        assert!(cache.load(&0).await.is_err());

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.ready, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.loading, 0);
        assert_eq!(stats.fetches_issued, 2);
    }
}
