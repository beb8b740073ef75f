use crate::error::StoreError;
use std::future::Future;
use std::pin::Pin;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Durable string key-value slots that survive between job invocations.
///
/// The ledger lives in a single slot; implementations only need
/// last-writer-wins semantics per key.
pub trait PropertyStore: Send + Sync {
    /// Backend identifier (e.g. "sqlite", "memory").
    fn name(&self) -> &str;

    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()>;

    /// Removing an absent key is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}
