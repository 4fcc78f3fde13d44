//! Builder for constructing a Registry.

use super::Registry;
use crate::config::RegistryConfig;
use hostreg_core::{
    Activator, HostObserver, HostStore, NoopActivator, ObserverSource, SharedObserver,
};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Builder for constructing a [`Registry`].
///
/// # Example
///
/// ```rust,ignore
/// let registry = Registry::builder(MemoryStore::new())
///     .activator(BindingActivator::new(binder))
///     .config(RegistryConfig::default().with_master_scope("core9"))
///     .observer(LoggingObserver::default())
///     .observer_source(catalog.clone())
///     .build();
/// ```
pub struct RegistryBuilder<S, A = NoopActivator> {
    store: S,
    activator: A,
    config: RegistryConfig,
    observers: Vec<SharedObserver>,
    source: Option<Box<dyn ObserverSource>>,
}

impl<S: HostStore> RegistryBuilder<S, NoopActivator> {
    /// Create a builder over `store`, with no activation and default config.
    pub fn new(store: S) -> Self {
        Self {
            store,
            activator: NoopActivator,
            config: RegistryConfig::default(),
            observers: Vec::new(),
            source: None,
        }
    }
}

impl<S: HostStore, A: Activator> RegistryBuilder<S, A> {
    /// Use `activator` to provision hosts.
    pub fn activator<B: Activator>(self, activator: B) -> RegistryBuilder<S, B> {
        RegistryBuilder {
            store: self.store,
            activator,
            config: self.config,
            observers: self.observers,
            source: self.source,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an observer explicitly.
    ///
    /// Explicit observers come first in every scan, in registration order.
    pub fn observer<O: HostObserver>(mut self, observer: O) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Register an already shared observer explicitly.
    pub fn shared_observer(mut self, observer: SharedObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// Discover additional observers from `source` on every scan.
    pub fn observer_source<O: ObserverSource>(mut self, source: O) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Build the registry. Observers are scanned on first use.
    pub fn build(self) -> Registry<S, A> {
        Registry {
            store: self.store,
            activator: self.activator,
            config: self.config,
            hosts: Mutex::new(IndexMap::new()),
            observers: RwLock::new(None),
            registered: self.observers,
            source: self.source,
        }
    }
}
