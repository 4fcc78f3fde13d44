//! Testing utilities for hostreg.
//!
//! This module provides collaborators that make registry behaviour easy to
//! observe and to break on purpose.
//!
//! # Features
//!
//! - [`Journal`]: a shared, ordered log of notifications across observers
//! - [`RecordingObserver`]: records every event it receives into a journal
//! - [`FailingObserver`] / [`PanickingObserver`] / [`EagerPanickingObserver`]:
//!   misbehaving observers
//! - [`ScriptedActivator`]: records activations, fails on demand
//! - [`EagerPanickingActivator`]: panics before returning its future
//! - [`FlakyStore`]: wraps a store and fails calls while switched on

use hostreg_core::{
    ActivationError, Activator, BoxError, Context, HostEventKind, HostObserver, HostStore,
    VirtualHost,
};
use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

// ============================================================================
// Journal
// ============================================================================

/// One notification as seen by one observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Observer that received the event.
    pub observer: String,
    /// Event kind.
    pub kind: HostEventKind,
    /// Host the event was about.
    pub hostname: String,
}

/// A shared, append-only notification log.
///
/// Hand the same journal to several observers to check the global order
/// in which they were notified.
///
/// # Example
///
/// ```rust,ignore
/// let journal = Journal::new();
/// catalog.register(RecordingObserver::new("a", journal.clone()));
/// catalog.register(RecordingObserver::new("b", journal.clone()));
///
/// registry.reconcile().await?;
/// assert_eq!(journal.added(), vec!["c.example", "c.example"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, observer: &str, kind: HostEventKind, hostname: &str) {
        self.entries.lock().unwrap().push(Entry {
            observer: observer.to_owned(),
            kind,
            hostname: hostname.to_owned(),
        });
    }

    /// Get a clone of all entries.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    /// Hostnames of every `Added` entry, in order.
    pub fn added(&self) -> Vec<String> {
        self.hostnames_of(HostEventKind::Added)
    }

    /// Hostnames of every `Removed` entry, in order.
    pub fn removed(&self) -> Vec<String> {
        self.hostnames_of(HostEventKind::Removed)
    }

    fn hostnames_of(&self, kind: HostEventKind) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.hostname.clone())
            .collect()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

// ============================================================================
// Observers
// ============================================================================

/// An observer that records every event into a [`Journal`].
#[derive(Debug, Clone)]
pub struct RecordingObserver {
    name: String,
    journal: Journal,
}

impl RecordingObserver {
    /// Create a recording observer writing to `journal`.
    pub fn new(name: impl Into<String>, journal: Journal) -> Self {
        Self {
            name: name.into(),
            journal,
        }
    }

    /// Get the journal this observer writes to.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl HostObserver for RecordingObserver {
    async fn on_host_added(&self, host: &VirtualHost) -> Result<(), BoxError> {
        self.journal
            .push(&self.name, HostEventKind::Added, host.hostname());
        Ok(())
    }

    async fn on_host_removed(&self, host: &VirtualHost) -> Result<(), BoxError> {
        self.journal
            .push(&self.name, HostEventKind::Removed, host.hostname());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An observer that returns an error for every event, after counting it.
#[derive(Debug, Clone, Default)]
pub struct FailingObserver {
    calls: Arc<AtomicUsize>,
}

impl FailingObserver {
    /// Create a failing observer with a fresh call counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HostObserver for FailingObserver {
    async fn on_host_added(&self, host: &VirtualHost) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(format!("refusing {}", host.hostname()).into())
    }

    async fn on_host_removed(&self, host: &VirtualHost) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(format!("refusing {}", host.hostname()).into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// An observer that panics on every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingObserver;

impl HostObserver for PanickingObserver {
    async fn on_host_added(&self, host: &VirtualHost) -> Result<(), BoxError> {
        panic!("observer exploded on {}", host.hostname())
    }

    async fn on_host_removed(&self, host: &VirtualHost) -> Result<(), BoxError> {
        panic!("observer exploded on {}", host.hostname())
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// An observer that panics while the notification is being started,
/// before any future exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerPanickingObserver;

#[allow(unreachable_code)]
impl HostObserver for EagerPanickingObserver {
    fn on_host_added(
        &self,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        panic!("observer exploded early on {}", host.hostname());
        std::future::ready(Ok(()))
    }

    fn on_host_removed(
        &self,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        panic!("observer exploded early on {}", host.hostname());
        std::future::ready(Ok(()))
    }

    fn name(&self) -> &str {
        "eager-panicking"
    }
}

/// An observer that sleeps before acknowledging.
#[derive(Debug, Clone, Copy)]
pub struct SlowObserver(pub Duration);

impl HostObserver for SlowObserver {
    async fn on_host_added(&self, _host: &VirtualHost) -> Result<(), BoxError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }

    async fn on_host_removed(&self, _host: &VirtualHost) -> Result<(), BoxError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

// ============================================================================
// Scripted Activator
// ============================================================================

/// An activator that records the `database` of every context it sees and
/// fails for databases it was told to refuse.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedActivator {
    activated: Arc<Mutex<Vec<String>>>,
    refused: Arc<Mutex<HashSet<String>>>,
    panics: Arc<Mutex<HashSet<String>>>,
    delay: Option<Duration>,
}

impl ScriptedActivator {
    /// Create an activator that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every activation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail activation of `database`.
    pub fn refuse(&self, database: impl Into<String>) {
        self.refused.lock().unwrap().insert(database.into());
    }

    /// Panic during activation of `database`.
    pub fn panic_on(&self, database: impl Into<String>) {
        self.panics.lock().unwrap().insert(database.into());
    }

    /// Accept `database` again.
    pub fn accept(&self, database: &str) {
        self.refused.lock().unwrap().remove(database);
        self.panics.lock().unwrap().remove(database);
    }

    /// Databases successfully activated, in order.
    pub fn activated(&self) -> Vec<String> {
        self.activated.lock().unwrap().clone()
    }

    /// Number of successful activations.
    pub fn count(&self) -> usize {
        self.activated.lock().unwrap().len()
    }
}

impl Activator for ScriptedActivator {
    async fn activate(&self, context: &Context) -> Result<(), ActivationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let database = context
            .get("database")
            .and_then(|v| v.as_str())
            .ok_or(ActivationError::MissingKey("database"))?
            .to_owned();

        if self.panics.lock().unwrap().contains(&database) {
            panic!("activation exploded on {database}");
        }
        if self.refused.lock().unwrap().contains(&database) {
            return Err(ActivationError::Backend(
                format!("database {database} unreachable").into(),
            ));
        }
        self.activated.lock().unwrap().push(database);
        Ok(())
    }
}

/// An activator that panics while the call is being started, before any
/// future exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct EagerPanickingActivator;

#[allow(unreachable_code)]
impl Activator for EagerPanickingActivator {
    fn activate(
        &self,
        _context: &Context,
    ) -> impl Future<Output = Result<(), ActivationError>> + Send {
        panic!("activator exploded early");
        std::future::ready(Ok(()))
    }
}

// ============================================================================
// Flaky Store
// ============================================================================

/// Wraps a store and fails every call while switched on.
#[derive(Debug)]
pub struct FlakyStore<S> {
    inner: S,
    failing: AtomicBool,
}

impl<S> FlakyStore<S> {
    /// Wrap a store; starts healthy.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self) -> Result<(), BoxError> {
        if self.failing.load(Ordering::SeqCst) {
            Err("store connection refused".into())
        } else {
            Ok(())
        }
    }
}

impl<S: HostStore> HostStore for FlakyStore<S> {
    async fn create(&self, scope: &str, host: &VirtualHost) -> Result<(), BoxError> {
        self.check()?;
        self.inner.create(scope, host).await
    }

    async fn delete(&self, scope: &str, host: &VirtualHost) -> Result<(), BoxError> {
        self.check()?;
        self.inner.delete(scope, host).await
    }

    async fn list_all(&self, scope: &str) -> Result<Vec<VirtualHost>, BoxError> {
        self.check()?;
        self.inner.list_all(scope).await
    }
}

/// Builds a host carrying the usual activation keys, with
/// `database` derived from the first label of the hostname.
pub fn tenant(hostname: &str) -> VirtualHost {
    let database = hostname.split('.').next().unwrap_or(hostname).to_owned();
    VirtualHost::new(hostname)
        .with("database", database)
        .with("dbuser", "admin")
        .with("password", "secret")
}
