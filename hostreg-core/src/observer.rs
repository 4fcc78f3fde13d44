//! # Observers
//!
//! An observer (a "processor" in host-manager terms) is told when hosts
//! join or leave the registry. Observers are fire-and-continue: an error
//! returned from one is reported by the registry and never stops delivery
//! to the others.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`HostObserver`] uses native `async fn` for zero-cost static dispatch.
//! The registry discovers observers at runtime, so it stores them as
//! [`DynHostObserver`] trait objects; every `HostObserver` is one through a
//! blanket implementation.

use crate::{error::BoxError, host::VirtualHost};
use std::{future::Future, pin::Pin, sync::Arc};

/// A collaborator notified about host lifecycle changes.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `HostObserver`",
    label = "missing `HostObserver` implementation",
    note = "Observers must implement `on_host_added` and `on_host_removed`."
)]
pub trait HostObserver: Send + Sync + 'static {
    /// Called once for every host that became known.
    fn on_host_added(
        &self,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Called once for every host that is no longer known.
    fn on_host_removed(
        &self,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Boxed future returned by [`DynHostObserver`].
pub type ObserverFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

/// Dynamic object-safe version of [`HostObserver`].
pub trait DynHostObserver: Send + Sync + 'static {
    /// Dynamic dispatch version of [`HostObserver::on_host_added`].
    fn on_host_added_dyn<'a>(&'a self, host: &'a VirtualHost) -> ObserverFuture<'a>;

    /// Dynamic dispatch version of [`HostObserver::on_host_removed`].
    fn on_host_removed_dyn<'a>(&'a self, host: &'a VirtualHost) -> ObserverFuture<'a>;

    /// Dynamic dispatch version of [`HostObserver::name`].
    fn name_dyn(&self) -> &str;
}

// Blanket implementation: any HostObserver is a DynHostObserver.
impl<T: HostObserver> DynHostObserver for T {
    fn on_host_added_dyn<'a>(&'a self, host: &'a VirtualHost) -> ObserverFuture<'a> {
        Box::pin(self.on_host_added(host))
    }

    fn on_host_removed_dyn<'a>(&'a self, host: &'a VirtualHost) -> ObserverFuture<'a> {
        Box::pin(self.on_host_removed(host))
    }

    fn name_dyn(&self) -> &str {
        self.name()
    }
}

/// Shared handle to a type-erased observer.
pub type SharedObserver = Arc<dyn DynHostObserver>;

/// Enumerates the observers interested in host lifecycle events.
///
/// Called by the registry on every observer scan. The returned list is
/// fixed for the passes that follow, until the next scan.
pub trait ObserverSource: Send + Sync + 'static {
    /// Return the current observers.
    fn discover(&self) -> Vec<SharedObserver>;
}

impl ObserverSource for Vec<SharedObserver> {
    fn discover(&self) -> Vec<SharedObserver> {
        self.clone()
    }
}

impl<F> ObserverSource for F
where
    F: Fn() -> Vec<SharedObserver> + Send + Sync + 'static,
{
    fn discover(&self) -> Vec<SharedObserver> {
        self()
    }
}
