//! Row sources backing a drill-down cache

use crate::error::FetchError;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// Asynchronous producer of rows for a key
#[async_trait]
pub trait RowSource<K, R>: Send + Sync
where
    K: Send + Sync,
    R: Send,
{
    /// Fetch every row for `key`
    async fn fetch(&self, key: &K) -> Result<Vec<R>, FetchError>;
}

/// [`RowSource`] built from an async closure taking an owned key
pub struct FnSource<K, F> {
    f: F,
    _key: PhantomData<fn(K)>,
}

impl<K, F> FnSource<K, F> {
    /// Wrap a closure
    #[inline]
    #[must_use]
    pub fn new(f: F) -> Self {
        Self {
            f,
            _key: PhantomData,
        }
    }
}

#[async_trait]
impl<K, R, F, Fut> RowSource<K, R> for FnSource<K, F>
where
    K: Clone + Send + Sync,
    R: Send,
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<R>, FetchError>> + Send,
{
    async fn fetch(&self, key: &K) -> Result<Vec<R>, FetchError> {
        (self.f)(key.clone()).await
    }
}
