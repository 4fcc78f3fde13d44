//! URL alias lookup.
//!
//! Each tenant keeps a configuration document named `aliases` in its
//! `{prefix}configuration` collection:
//!
//! ```json
//! { "name": "aliases", "aliases": [ { "from": "/old", "to": "/new" } ] }
//! ```
//!
//! Reads the host's `database` and `prefix` context keys.

use hostreg_core::{DocumentSource, RegistryError, VirtualHost};
use serde_json::Value;

/// Collection suffix holding tenant configuration documents.
pub const CONFIGURATION_COLLECTION: &str = "configuration";

/// Name of the document listing URL aliases.
pub const ALIASES_DOCUMENT: &str = "aliases";

/// Resolve `path` to its alias target for `host`.
///
/// The first entry whose `from` equals `path` wins. Returns `Ok(None)` when
/// nothing matches, when the host has no `database`, or when the document
/// or its `aliases` array is missing or malformed. Only a failing document
/// source is an error.
pub async fn resolve_alias<D: DocumentSource>(
    documents: &D,
    host: &VirtualHost,
    path: &str,
) -> Result<Option<String>, RegistryError> {
    let Some(database) = host.get_str("database") else {
        return Ok(None);
    };
    let collection = format!(
        "{}{CONFIGURATION_COLLECTION}",
        host.get_str("prefix").unwrap_or_default()
    );

    let document = documents
        .find_named(database, &collection, ALIASES_DOCUMENT)
        .await
        .map_err(RegistryError::StoreUnavailable)?;

    Ok(document.as_ref().and_then(|doc| first_match(doc, path)))
}

fn first_match(document: &Value, path: &str) -> Option<String> {
    document
        .get("aliases")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("from").and_then(Value::as_str) == Some(path))?
        .get("to")?
        .as_str()
        .map(str::to_owned)
}

/// Alias lookups against a fixed document source.
#[derive(Debug, Clone)]
pub struct AliasResolver<D> {
    documents: D,
}

impl<D: DocumentSource> AliasResolver<D> {
    /// Resolve aliases against `documents`.
    pub fn new(documents: D) -> Self {
        Self { documents }
    }

    /// See [`resolve_alias`].
    pub async fn resolve(
        &self,
        host: &VirtualHost,
        path: &str,
    ) -> Result<Option<String>, RegistryError> {
        resolve_alias(&self.documents, host, path).await
    }
}
