//! Persisted host records.

use crate::{error::BoxError, host::VirtualHost};
use std::{future::Future, sync::Arc};

/// Durable storage for host records.
///
/// `scope` is the logical namespace holding host configuration (the master
/// scope), kept apart from any per-tenant data. No ordering or
/// transactional guarantees are assumed: `create` may store a second record
/// for a hostname that already exists.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `HostStore`",
    label = "missing `HostStore` implementation",
    note = "Stores must implement `create`, `delete` and `list_all`."
)]
pub trait HostStore: Send + Sync + 'static {
    /// Persist a new record.
    fn create(
        &self,
        scope: &str,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Delete the record(s) for this host.
    fn delete(
        &self,
        scope: &str,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Load every record in one bulk read.
    fn list_all(
        &self,
        scope: &str,
    ) -> impl Future<Output = Result<Vec<VirtualHost>, BoxError>> + Send;
}

impl<S: HostStore> HostStore for Arc<S> {
    fn create(
        &self,
        scope: &str,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).create(scope, host)
    }

    fn delete(
        &self,
        scope: &str,
        host: &VirtualHost,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).delete(scope, host)
    }

    fn list_all(
        &self,
        scope: &str,
    ) -> impl Future<Output = Result<Vec<VirtualHost>, BoxError>> + Send {
        (**self).list_all(scope)
    }
}
