//! Database binding activator.

use hostreg_core::{
    ActivationError, Activator, Context, DatabaseBinder, DatabaseParams, DatabaseTarget,
};

/// Activates a host by binding its tenant database.
///
/// Reads [`DatabaseParams`] from the host context. A non-empty `dbhost`
/// selects a remote binding, otherwise the default server is used.
#[derive(Debug, Clone, Default)]
pub struct BindingActivator<B> {
    binder: B,
}

impl<B> BindingActivator<B> {
    /// Create an activator around a binder.
    pub fn new(binder: B) -> Self {
        Self { binder }
    }

    /// Get a reference to the binder.
    pub fn binder(&self) -> &B {
        &self.binder
    }
}

impl<B: DatabaseBinder> Activator for BindingActivator<B> {
    async fn activate(&self, context: &Context) -> Result<(), ActivationError> {
        let params = DatabaseParams::from_context(context)?;
        match params.target() {
            DatabaseTarget::Remote(ref server) => {
                tracing::debug!(database = %params.database, %server, "binding remote database");
            }
            DatabaseTarget::Local => {
                tracing::debug!(database = %params.database, "binding local database");
            }
        }
        self.binder
            .bind(&params)
            .await
            .map_err(ActivationError::Backend)
    }
}
