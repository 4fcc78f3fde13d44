//! In-memory configuration documents.

use hostreg_core::{BoxError, DocumentSource};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Documents grouped by `(database, collection)`.
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    collections: RwLock<HashMap<(String, String), Vec<Value>>>,
}

impl MemoryDocuments {
    /// Create an empty document source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document to a collection.
    pub async fn insert(&self, database: &str, collection: &str, document: Value) {
        self.collections
            .write()
            .await
            .entry((database.to_owned(), collection.to_owned()))
            .or_default()
            .push(document);
    }
}

impl DocumentSource for MemoryDocuments {
    async fn find_named(
        &self,
        database: &str,
        collection: &str,
        name: &str,
    ) -> Result<Option<Value>, BoxError> {
        let collections = self.collections.read().await;
        let found = collections
            .get(&(database.to_owned(), collection.to_owned()))
            .and_then(|docs| {
                docs.iter()
                    .find(|doc| doc.get("name").and_then(Value::as_str) == Some(name))
            })
            .cloned();
        Ok(found)
    }
}
