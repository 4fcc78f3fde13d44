//! In-memory host store.

use hostreg_core::{BoxError, HostStore, VirtualHost};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A host store kept in process memory, one record list per scope.
///
/// Mirrors the permissive behaviour of a document store: `create` appends
/// even if the hostname already has a record, and `delete` drops every
/// record for the hostname.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scopes: Mutex<HashMap<String, Vec<VirtualHost>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with records under `scope`.
    pub fn seeded(scope: impl Into<String>, hosts: impl IntoIterator<Item = VirtualHost>) -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(scope.into(), hosts.into_iter().collect());
        Self {
            scopes: Mutex::new(scopes),
        }
    }

    /// Replace every record under `scope`.
    pub async fn replace(&self, scope: &str, hosts: impl IntoIterator<Item = VirtualHost>) {
        self.scopes
            .lock()
            .await
            .insert(scope.to_owned(), hosts.into_iter().collect());
    }

    /// Number of records under `scope`.
    pub async fn count(&self, scope: &str) -> usize {
        self.scopes.lock().await.get(scope).map_or(0, Vec::len)
    }

    /// Hostnames under `scope`, in storage order.
    pub async fn hostnames(&self, scope: &str) -> Vec<String> {
        self.scopes
            .lock()
            .await
            .get(scope)
            .map(|hosts| hosts.iter().map(|h| h.hostname().to_owned()).collect())
            .unwrap_or_default()
    }
}

impl HostStore for MemoryStore {
    async fn create(&self, scope: &str, host: &VirtualHost) -> Result<(), BoxError> {
        self.scopes
            .lock()
            .await
            .entry(scope.to_owned())
            .or_default()
            .push(host.clone());
        Ok(())
    }

    async fn delete(&self, scope: &str, host: &VirtualHost) -> Result<(), BoxError> {
        if let Some(hosts) = self.scopes.lock().await.get_mut(scope) {
            hosts.retain(|h| h.hostname() != host.hostname());
        }
        Ok(())
    }

    async fn list_all(&self, scope: &str) -> Result<Vec<VirtualHost>, BoxError> {
        Ok(self
            .scopes
            .lock()
            .await
            .get(scope)
            .cloned()
            .unwrap_or_default())
    }
}
