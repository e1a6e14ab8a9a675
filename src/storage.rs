//! Key/value persistence collaborator.
//!
//! The server records submissions through [`PersistenceService`], which is
//! injected into the router state. When no real store is available the
//! [`NoopPersistence`] default keeps the request path working.

use async_trait::async_trait;

/// Asynchronous key/value store.
///
/// `set` always resolves: implementations report failure through the returned
/// `bool` and never panic or error. With `verbose` set they log what they store.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn set(&self, key: &str, value: &str, verbose: bool) -> bool;
}

/// Store that accepts every write and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

#[async_trait]
impl PersistenceService for NoopPersistence {
    async fn set(&self, key: &str, value: &str, verbose: bool) -> bool {
        if verbose {
            log_stored(key, value, "noop");
        }
        true
    }
}

/// Log a stored entry, decoding the value as JSON when it is JSON.
pub(crate) fn log_stored(key: &str, value: &str, backend: &str) {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => tracing::info!(backend, key, data = %json, "Stored data"),
        Err(_) => tracing::info!(backend, key, data = value, "Stored data"),
    }
}
