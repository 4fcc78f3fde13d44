//! Per-host activation.
//!
//! Activation provisions the resources a host needs once it becomes known
//! to the process. The usual activation binds the tenant database described
//! by the host context; [`DatabaseParams`] is the typed view of those keys.

use crate::{
    error::{ActivationError, BoxError},
    host::Context,
};
use serde_json::Value;
use std::{future::Future, sync::Arc};

/// Provisions backing resources for a host.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Activator`",
    label = "missing `Activator` implementation",
    note = "Activators must implement `activate` over a host context."
)]
pub trait Activator: Send + Sync + 'static {
    /// Activate the host described by `context`.
    fn activate(
        &self,
        context: &Context,
    ) -> impl Future<Output = Result<(), ActivationError>> + Send;
}

impl<A: Activator> Activator for Arc<A> {
    fn activate(
        &self,
        context: &Context,
    ) -> impl Future<Output = Result<(), ActivationError>> + Send {
        (**self).activate(context)
    }
}

/// An activator that does nothing. Useful when hosts need no provisioning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActivator;

impl Activator for NoopActivator {
    async fn activate(&self, _context: &Context) -> Result<(), ActivationError> {
        Ok(())
    }
}

/// Where a tenant database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// The default database server.
    Local,
    /// A named remote server.
    Remote(String),
}

/// Connection parameters read from a host context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseParams {
    /// Database name.
    pub database: String,
    /// Database user, from `dbuser`.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Remote server, from `dbhost`. `None` means the local server.
    pub host: Option<String>,
}

impl DatabaseParams {
    /// Reads `database`, `dbuser`, `password` and the optional `dbhost`.
    ///
    /// An empty or non-string `dbhost` counts as absent.
    pub fn from_context(context: &Context) -> Result<Self, ActivationError> {
        let required = |key: &'static str| {
            context
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or(ActivationError::MissingKey(key))
        };

        Ok(Self {
            database: required("database")?,
            user: required("dbuser")?,
            password: required("password")?,
            host: context
                .get("dbhost")
                .and_then(Value::as_str)
                .filter(|h| !h.is_empty())
                .map(str::to_owned),
        })
    }

    /// Which server to bind against.
    pub fn target(&self) -> DatabaseTarget {
        match &self.host {
            Some(host) => DatabaseTarget::Remote(host.clone()),
            None => DatabaseTarget::Local,
        }
    }
}

/// Binds a tenant database so that it can be used by the process.
pub trait DatabaseBinder: Send + Sync + 'static {
    /// Make the database described by `params` available.
    fn bind(&self, params: &DatabaseParams) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl<B: DatabaseBinder> DatabaseBinder for Arc<B> {
    fn bind(&self, params: &DatabaseParams) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).bind(params)
    }
}
