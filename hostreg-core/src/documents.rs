//! Host-scoped configuration documents.

use crate::error::BoxError;
use serde_json::Value;
use std::{future::Future, sync::Arc};

/// Read access to the configuration documents kept in a tenant database.
///
/// Documents are JSON objects identified by their `name` field inside a
/// collection.
pub trait DocumentSource: Send + Sync + 'static {
    /// Fetch the document called `name` from `collection` in `database`.
    fn find_named(
        &self,
        database: &str,
        collection: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<Value>, BoxError>> + Send;
}

impl<D: DocumentSource> DocumentSource for Arc<D> {
    fn find_named(
        &self,
        database: &str,
        collection: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<Value>, BoxError>> + Send {
        (**self).find_named(database, collection, name)
    }
}
