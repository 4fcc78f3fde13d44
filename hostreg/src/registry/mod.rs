//! # Registry Core
//!
//! The authoritative in-memory set of virtual hosts, kept in step with a
//! [`HostStore`] and announced to a set of observers.
//!
//! # Views of "the current hosts"
//!
//! Three views have to agree: the store's records, the in-memory map, and
//! what observers have been told. Every mutating operation therefore runs
//! under one async lock, awaits store and activation calls to completion,
//! and only then notifies observers. Within a pass every `Added`
//! notification precedes every `Removed` notification.
//!
//! # Operations
//!
//! | operation         | store            | activation      | notifies              |
//! |-------------------|------------------|-----------------|-----------------------|
//! | [`add`]           | create           | the host        | `Added`               |
//! | [`remove`]        | delete           | -               | `Removed`             |
//! | [`reconcile`]     | list all         | new hosts only  | delta only            |
//! | [`run`]           | list all         | every host      | every host, then gone |
//!
//! [`add`]: Registry::add
//! [`remove`]: Registry::remove
//! [`reconcile`]: Registry::reconcile
//! [`run`]: Registry::run

mod builder;
mod notify;
mod plan;

pub use builder::RegistryBuilder;

use crate::{
    config::{ActivationPolicy, RegistryConfig},
    report::{Failure, Report},
};
use hostreg_core::{
    Activator, HostEvent, HostStore, ObserverSource, RegistryError, SharedObserver, VirtualHost,
};
use indexmap::IndexMap;
use notify::Fanout;
use plan::Slot;
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};
use tokio::sync::Mutex;
use tracing::Instrument;

type HostMap = IndexMap<String, Arc<VirtualHost>>;

/// The virtual host registry.
///
/// Generic over the store `S` and the activator `A`; observers are held
/// dynamically since they are discovered at runtime.
pub struct Registry<S, A> {
    store: S,
    activator: A,
    config: RegistryConfig,
    hosts: Mutex<HostMap>,
    observers: RwLock<Option<Arc<[SharedObserver]>>>,
    registered: Vec<SharedObserver>,
    source: Option<Box<dyn ObserverSource>>,
}

impl<S: HostStore> Registry<S, hostreg_core::NoopActivator> {
    /// Start building a registry over `store`.
    pub fn builder(store: S) -> RegistryBuilder<S> {
        RegistryBuilder::new(store)
    }
}

impl<S: HostStore, A: Activator> Registry<S, A> {
    /// The configuration the registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The per-host activator.
    pub fn activator(&self) -> &A {
        &self.activator
    }

    // ------------------------------------------------------------------
    // Observer set
    // ------------------------------------------------------------------

    /// Rebuild the observer set: explicit observers, then discovered ones.
    ///
    /// Replaces the previous set. Passes already running keep the set they
    /// started with.
    pub fn scan_observers(&self) {
        self.rescan();
    }

    fn rescan(&self) -> Arc<[SharedObserver]> {
        let mut set = self.registered.clone();
        if let Some(source) = &self.source {
            set.extend(source.discover());
        }
        let set: Arc<[SharedObserver]> = set.into();
        tracing::debug!(observers = set.len(), "observer scan complete");
        *self.observers.write().unwrap_or_else(PoisonError::into_inner) = Some(set.clone());
        set
    }

    /// Current observer snapshot, scanning first if no scan happened yet.
    fn observer_snapshot(&self) -> Arc<[SharedObserver]> {
        let current = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match current {
            Some(set) => set,
            None => self.rescan(),
        }
    }

    /// Number of observers in the current set (scans if needed).
    pub fn observer_count(&self) -> usize {
        self.observer_snapshot().len()
    }

    fn fanout<'a>(&self, observers: &'a [SharedObserver]) -> Fanout<'a> {
        Fanout::new(observers, self.config.observer_timeout)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// The in-memory hosts, in insertion/reconciliation order.
    ///
    /// Never loads anything; empty until the first add, reconcile or run.
    pub async fn list(&self) -> Vec<Arc<VirtualHost>> {
        self.hosts.lock().await.values().cloned().collect()
    }

    /// Like [`list`](Self::list), but reconciles first if nothing is loaded.
    pub async fn ensure_loaded(&self) -> Result<Vec<Arc<VirtualHost>>, RegistryError> {
        if self.is_empty().await {
            self.reconcile().await?;
        }
        Ok(self.list().await)
    }

    /// Hosts keyed by hostname.
    pub async fn by_hostname(&self) -> HashMap<String, Arc<VirtualHost>> {
        self.hosts
            .lock()
            .await
            .iter()
            .map(|(name, host)| (name.clone(), host.clone()))
            .collect()
    }

    /// The registered instance for `hostname`.
    pub async fn get(&self, hostname: &str) -> Option<Arc<VirtualHost>> {
        self.hosts.lock().await.get(hostname).cloned()
    }

    /// Number of registered hosts.
    pub async fn len(&self) -> usize {
        self.hosts.lock().await.len()
    }

    /// Whether no host is registered.
    pub async fn is_empty(&self) -> bool {
        self.hosts.lock().await.is_empty()
    }

    /// Attach a runtime-only context entry to a known host.
    ///
    /// The entry lives on the in-memory instance only; it is not persisted
    /// and survives reconciliation because known hosts keep their instance.
    /// Returns `false` if the host is unknown.
    pub async fn annotate(
        &self,
        hostname: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> bool {
        let mut hosts = self.hosts.lock().await;
        match hosts.get_mut(hostname) {
            Some(host) => {
                Arc::make_mut(host).insert(key, value);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Single-host mutations
    // ------------------------------------------------------------------

    /// Persist, activate, register and announce a host.
    ///
    /// A store failure ends the call before anything else happens. What an
    /// activation failure does depends on [`ActivationPolicy`]: under
    /// `Strict` the record stays persisted but the host is neither
    /// registered nor announced and the error is returned; under `Lenient`
    /// the failure is reported and the host goes in anyway.
    ///
    /// A hostname that is already registered is replaced in place.
    pub async fn add(&self, host: VirtualHost) -> Result<Report, RegistryError> {
        let mut hosts = self.hosts.lock().await;
        let observers = self.observer_snapshot();
        let hostname = host.hostname().to_owned();
        let mut report = Report::default();

        self.store
            .create(&self.config.master_scope, &host)
            .await
            .map_err(RegistryError::StoreUnavailable)?;

        if let Err(source) = notify::activate(&self.activator, &host).await {
            match self.config.activation_policy {
                ActivationPolicy::Strict => {
                    tracing::warn!(%hostname, error = %source, "activation failed, host not registered");
                    return Err(RegistryError::Activation { hostname, source });
                }
                ActivationPolicy::Lenient => {
                    tracing::warn!(%hostname, error = %source, "activation failed, registering anyway");
                    report.failures.push(Failure::Activation {
                        hostname: hostname.clone(),
                        source,
                    });
                }
            }
        }

        let host = Arc::new(host);
        if hosts.insert(hostname.clone(), host.clone()).is_some() {
            tracing::debug!(%hostname, "replaced registered host");
        }
        tracing::info!(%hostname, "host added");

        self.fanout(&observers)
            .deliver(&HostEvent::Added(host.clone()), &mut report)
            .await;
        report.added.push(host);
        Ok(report)
    }

    /// Delete, unregister and announce the removal of a host.
    ///
    /// Unknown hostnames are a no-op: the store is not touched and nothing
    /// is announced. A store failure leaves the host registered.
    pub async fn remove(&self, hostname: &str) -> Result<Report, RegistryError> {
        let mut hosts = self.hosts.lock().await;
        let Some(host) = hosts.get(hostname).cloned() else {
            tracing::debug!(hostname, "remove of unknown host ignored");
            return Ok(Report::default());
        };
        let observers = self.observer_snapshot();

        self.store
            .delete(&self.config.master_scope, &host)
            .await
            .map_err(RegistryError::StoreUnavailable)?;
        hosts.shift_remove(hostname);
        tracing::info!(hostname, "host removed");

        let mut report = Report::default();
        self.fanout(&observers)
            .deliver(&HostEvent::Removed(host.clone()), &mut report)
            .await;
        report.removed.push(host);
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Batch passes
    // ------------------------------------------------------------------

    /// Merge the store's records into the in-memory set.
    ///
    /// Hosts only in the store are activated and announced as added; hosts
    /// only in memory are announced as removed (their records are not
    /// touched). Hosts on both sides keep their in-memory instance and are
    /// not announced. The new set follows the store's order.
    ///
    /// Per-host failures are collected in the report; a host whose
    /// activation fails is still registered, so the new set holds exactly
    /// one entry per distinct stored hostname. A store failure leaves the
    /// in-memory set as it was and announces nothing.
    pub async fn reconcile(&self) -> Result<Report, RegistryError> {
        let span = tracing::info_span!("reconcile", scope = %self.config.master_scope);
        self.reconcile_locked().instrument(span).await
    }

    async fn reconcile_locked(&self) -> Result<Report, RegistryError> {
        let mut hosts = self.hosts.lock().await;
        let observers = self.observer_snapshot();
        let fanout = self.fanout(&observers);

        let fresh = self
            .store
            .list_all(&self.config.master_scope)
            .await
            .map_err(RegistryError::StoreUnavailable)?;

        let plan = plan::plan(&hosts, fresh);
        for hostname in &plan.duplicates {
            tracing::warn!(%hostname, "store lists hostname more than once, keeping first");
        }
        tracing::debug!(
            discovered = plan.discovered(),
            stale = plan.stale.len(),
            "reconciliation planned"
        );

        let mut report = Report::default();
        let mut next = HostMap::with_capacity(plan.slots.len());

        for slot in plan.slots {
            let host = match slot {
                Slot::Kept(host) => host,
                Slot::Discovered(host) => {
                    let host = self.admit(host, &mut report).await;
                    fanout
                        .deliver(&HostEvent::Added(host.clone()), &mut report)
                        .await;
                    report.added.push(host.clone());
                    host
                }
            };
            next.insert(host.hostname().to_owned(), host);
        }

        for host in plan.stale {
            fanout
                .deliver(&HostEvent::Removed(host.clone()), &mut report)
                .await;
            report.removed.push(host);
        }

        *hosts = next;
        tracing::info!(
            added = report.added.len(),
            removed = report.removed.len(),
            failures = report.failures.len(),
            hosts = hosts.len(),
            "reconciliation complete"
        );
        Ok(report)
    }

    /// Bootstrap pass: activate and announce every stored host.
    ///
    /// Unlike [`reconcile`](Self::reconcile), known hosts are activated and
    /// announced again, and their fresh records replace the in-memory
    /// instances. Registered hosts missing from the store are announced as
    /// removed afterwards.
    ///
    /// A host whose activation fails is reported and still registered.
    pub async fn run(&self) -> Result<Report, RegistryError> {
        let span = tracing::info_span!("run", scope = %self.config.master_scope);
        self.run_locked().instrument(span).await
    }

    /// Alias for [`run`](Self::run).
    pub async fn execute(&self) -> Result<Report, RegistryError> {
        self.run().await
    }

    async fn run_locked(&self) -> Result<Report, RegistryError> {
        let mut hosts = self.hosts.lock().await;
        let observers = self.observer_snapshot();
        let fanout = self.fanout(&observers);

        let fresh = self
            .store
            .list_all(&self.config.master_scope)
            .await
            .map_err(RegistryError::StoreUnavailable)?;

        let mut report = Report::default();
        let mut seen = HashSet::with_capacity(fresh.len());
        let mut next = HostMap::with_capacity(fresh.len());

        for host in fresh {
            let hostname = host.hostname().to_owned();
            if !seen.insert(hostname.clone()) {
                tracing::warn!(%hostname, "store lists hostname more than once, keeping first");
                continue;
            }
            let host = self.admit(host, &mut report).await;
            fanout
                .deliver(&HostEvent::Added(host.clone()), &mut report)
                .await;
            report.added.push(host.clone());
            next.insert(hostname, host);
        }

        let gone: Vec<_> = hosts
            .values()
            .filter(|h| !seen.contains(h.hostname()))
            .cloned()
            .collect();
        for host in gone {
            fanout
                .deliver(&HostEvent::Removed(host.clone()), &mut report)
                .await;
            report.removed.push(host);
        }

        *hosts = next;
        tracing::info!(
            activated = report.added.len(),
            removed = report.removed.len(),
            failures = report.failures.len(),
            "bootstrap complete"
        );
        Ok(report)
    }

    /// Activate a host for a batch pass.
    ///
    /// A failed activation is reported but the host is registered anyway, so
    /// the new set always mirrors the stored records. The activation policy
    /// only governs single-host `add`.
    async fn admit(&self, host: VirtualHost, report: &mut Report) -> Arc<VirtualHost> {
        match notify::activate(&self.activator, &host).await {
            Ok(()) => tracing::debug!(hostname = host.hostname(), "host activated"),
            Err(source) => {
                tracing::warn!(hostname = host.hostname(), error = %source, "activation failed");
                report.failures.push(Failure::Activation {
                    hostname: host.hostname().to_owned(),
                    source,
                });
            }
        }
        Arc::new(host)
    }
}

impl<S, A> std::fmt::Debug for Registry<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("registered_observers", &self.registered.len())
            .field("has_observer_source", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostreg_std::{
        store::MemoryStore,
        testing::{Journal, RecordingObserver, ScriptedActivator, tenant},
    };

    const SCOPE: &str = "master";

    fn registry(
        store: Arc<MemoryStore>,
        journal: &Journal,
    ) -> Registry<Arc<MemoryStore>, ScriptedActivator> {
        Registry::builder(store)
            .activator(ScriptedActivator::new())
            .observer(RecordingObserver::new("recorder", journal.clone()))
            .build()
    }

    #[tokio::test]
    async fn annotation_survives_reconcile() {
        let store = Arc::new(MemoryStore::seeded(SCOPE, [tenant("a.example")]));
        let journal = Journal::new();
        let registry = registry(store, &journal);

        registry.reconcile().await.unwrap();
        assert!(registry.annotate("a.example", "bindings", 3).await);
        assert!(!registry.annotate("ghost.example", "bindings", 1).await);

        let report = registry.reconcile().await.unwrap();
        assert!(report.is_unchanged());
        let host = registry.get("a.example").await.unwrap();
        assert_eq!(host.get("bindings"), Some(&Value::from(3)));
    }

    #[tokio::test]
    async fn scan_is_lazy_and_replaces() {
        let journal = Journal::new();
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = calls.clone();
        let extra = journal.clone();
        let registry = Registry::builder(MemoryStore::new())
            .observer(RecordingObserver::new("explicit", journal.clone()))
            .observer_source(move || {
                let n = seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                let observers: Vec<SharedObserver> = (0..n)
                    .map(|i| {
                        Arc::new(RecordingObserver::new(format!("found-{i}"), extra.clone()))
                            as SharedObserver
                    })
                    .collect();
                observers
            })
            .build();

        assert_eq!(registry.observer_count(), 1);
        assert_eq!(registry.observer_count(), 1);
        registry.scan_observers();
        assert_eq!(registry.observer_count(), 2);
        registry.scan_observers();
        assert_eq!(registry.observer_count(), 3);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn ensure_loaded_only_loads_when_empty() {
        let store = Arc::new(MemoryStore::seeded(SCOPE, [tenant("a.example")]));
        let journal = Journal::new();
        let registry = registry(store.clone(), &journal);

        assert!(registry.list().await.is_empty());
        let loaded = registry.ensure_loaded().await.unwrap();
        assert_eq!(loaded.len(), 1);

        store.create(SCOPE, &tenant("b.example")).await.unwrap();
        let loaded = registry.ensure_loaded().await.unwrap();
        assert_eq!(loaded.len(), 1, "non-empty registry must not reload");
        assert_eq!(journal.added(), vec!["a.example"]);
    }
}
