//! A binder that remembers what it bound.

use hostreg_core::{BoxError, DatabaseBinder, DatabaseParams};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

/// Records every binding and can be told to refuse certain databases.
///
/// Clones share state, so a clone kept by a test sees what the registry's
/// copy bound.
#[derive(Debug, Clone, Default)]
pub struct RecordingBinder {
    bound: Arc<Mutex<Vec<DatabaseParams>>>,
    refused: Arc<Mutex<HashSet<String>>>,
}

/// Error returned for a refused database.
#[derive(Debug, thiserror::Error)]
#[error("binding refused for database `{0}`")]
pub struct BindRefused(pub String);

impl RecordingBinder {
    /// Create a binder that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse future bindings of `database`.
    pub fn refuse(&self, database: impl Into<String>) {
        self.refused
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(database.into());
    }

    /// Everything bound so far, in order.
    pub fn bound(&self) -> Vec<DatabaseParams> {
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DatabaseBinder for RecordingBinder {
    async fn bind(&self, params: &DatabaseParams) -> Result<(), BoxError> {
        let refused = self
            .refused
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&params.database);
        if refused {
            return Err(Box::new(BindRefused(params.database.clone())));
        }
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(params.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::BindingActivator;
    use hostreg_core::{ActivationError, Activator, DatabaseTarget, VirtualHost};

    fn tenant(database: &str, dbhost: Option<&str>) -> VirtualHost {
        let host = VirtualHost::new(format!("{database}.example"))
            .with("database", database)
            .with("dbuser", "admin")
            .with("password", "secret");
        match dbhost {
            Some(server) => host.with("dbhost", server),
            None => host,
        }
    }

    #[tokio::test]
    async fn binds_local_and_remote() {
        let binder = RecordingBinder::new();
        let activator = BindingActivator::new(binder.clone());

        activator
            .activate(tenant("shop", None).context())
            .await
            .unwrap();
        activator
            .activate(tenant("blog", Some("db2.internal")).context())
            .await
            .unwrap();

        let bound = binder.bound();
        assert_eq!(bound.len(), 2);
        assert_eq!(bound[0].target(), DatabaseTarget::Local);
        assert_eq!(
            bound[1].target(),
            DatabaseTarget::Remote("db2.internal".into())
        );
    }

    #[tokio::test]
    async fn refused_database_is_backend_error() {
        let binder = RecordingBinder::new();
        binder.refuse("shop");
        let activator = BindingActivator::new(binder.clone());

        let err = activator
            .activate(tenant("shop", None).context())
            .await
            .unwrap_err();
        assert!(matches!(err, ActivationError::Backend(_)));
        assert!(binder.bound().is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_never_reach_binder() {
        let binder = RecordingBinder::new();
        let activator = BindingActivator::new(binder.clone());
        let host = VirtualHost::new("bare.example").with("database", "bare");

        let err = activator.activate(host.context()).await.unwrap_err();
        assert!(matches!(err, ActivationError::MissingKey("dbuser")));
        assert!(binder.bound().is_empty());
    }
}
