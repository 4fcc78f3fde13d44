#![allow(dead_code)]

use hostreg::{
    ActivationPolicy, HostStore, Registry, RegistryConfig, VirtualHost,
    store::MemoryStore,
    testing::{FlakyStore, Journal, RecordingObserver, ScriptedActivator},
};
use std::sync::Arc;

pub use hostreg::testing::tenant;

pub const SCOPE: &str = "master";

pub type TestStore = Arc<FlakyStore<MemoryStore>>;
pub type TestRegistry = Registry<TestStore, ScriptedActivator>;

// ============================================================================
// Harness
// ============================================================================

/// A registry wired to a flaky in-memory store, a scripted activator and two
/// recording observers sharing one journal.
pub struct Harness {
    pub store: TestStore,
    pub activator: ScriptedActivator,
    pub journal: Journal,
    pub registry: TestRegistry,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(ActivationPolicy::Strict)
    }

    pub fn with_policy(policy: ActivationPolicy) -> Self {
        let store: TestStore = Arc::new(FlakyStore::new(MemoryStore::new()));
        let activator = ScriptedActivator::new();
        let journal = Journal::new();
        let registry = Registry::builder(store.clone())
            .activator(activator.clone())
            .config(
                RegistryConfig::default()
                    .with_master_scope(SCOPE)
                    .with_activation_policy(policy),
            )
            .observer(RecordingObserver::new("o1", journal.clone()))
            .observer(RecordingObserver::new("o2", journal.clone()))
            .build();

        Self {
            store,
            activator,
            journal,
            registry,
        }
    }

    /// Put records straight into the store, bypassing the registry.
    pub async fn seed(&self, hostnames: &[&str]) {
        for hostname in hostnames {
            self.store.create(SCOPE, &tenant(hostname)).await.unwrap();
        }
    }

    /// Replace every stored record, bypassing the registry.
    pub async fn set_store(&self, hostnames: &[&str]) {
        self.store
            .inner()
            .replace(SCOPE, hostnames.iter().map(|h| tenant(h)))
            .await;
    }

    pub async fn hostnames(&self) -> Vec<String> {
        self.registry
            .list()
            .await
            .iter()
            .map(|h| h.hostname().to_owned())
            .collect()
    }

    pub async fn stored(&self) -> Vec<String> {
        self.store.inner().hostnames(SCOPE).await
    }
}

/// Assert `by_hostname` and `list` agree and carry no duplicates.
pub async fn assert_unique(registry: &TestRegistry) {
    let list = registry.list().await;
    let map = registry.by_hostname().await;
    assert_eq!(list.len(), map.len(), "duplicate hostnames in registry");
    for host in &list {
        let mapped: &VirtualHost = &map[host.hostname()];
        assert_eq!(mapped, host.as_ref());
    }
}
