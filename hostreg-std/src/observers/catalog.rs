//! Explicit observer registration.

use hostreg_core::{HostObserver, ObserverSource, SharedObserver};
use std::sync::{Arc, PoisonError, RwLock};

/// A shared list that observers register themselves with.
///
/// Clones share the same list. Registering does not affect a registry
/// until its next observer scan.
#[derive(Clone, Default)]
pub struct ObserverCatalog {
    observers: Arc<RwLock<Vec<SharedObserver>>>,
}

impl ObserverCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn register<O: HostObserver>(&self, observer: O) -> &Self {
        self.register_shared(Arc::new(observer))
    }

    /// Register an already shared observer.
    pub fn register_shared(&self, observer: SharedObserver) -> &Self {
        tracing::debug!(observer = observer.name_dyn(), "observer registered");
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
        self
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObserverSource for ObserverCatalog {
    fn discover(&self) -> Vec<SharedObserver> {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for ObserverCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverCatalog")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::LoggingObserver;

    #[test]
    fn discover_returns_snapshot() {
        let catalog = ObserverCatalog::new();
        catalog.register(LoggingObserver::new("first"));
        let snapshot = catalog.discover();

        catalog.register(LoggingObserver::new("second"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(catalog.discover().len(), 2);
        assert_eq!(catalog.discover()[1].name_dyn(), "second");
    }

    #[test]
    fn clones_share_registrations() {
        let catalog = ObserverCatalog::new();
        let handle = catalog.clone();
        handle.register(LoggingObserver::new("plugin"));
        assert_eq!(catalog.len(), 1);
    }
}
