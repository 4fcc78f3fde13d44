use hostreg::{
    AliasResolver, BoxError, DocumentSource, RegistryError, VirtualHost, documents::MemoryDocuments,
    resolve_alias,
};
use serde_json::{Value, json};

fn shop() -> VirtualHost {
    VirtualHost::new("shop.example")
        .with("database", "shop")
        .with("prefix", "shop_")
}

async fn documents() -> MemoryDocuments {
    let docs = MemoryDocuments::new();
    docs.insert(
        "shop",
        "shop_configuration",
        json!({
            "name": "aliases",
            "aliases": [
                { "from": "/old", "to": "/new" },
                { "from": "/blog", "to": "/news" },
            ]
        }),
    )
    .await;
    docs
}

#[tokio::test]
async fn test_resolves_known_alias() {
    let docs = documents().await;
    let target = resolve_alias(&docs, &shop(), "/old").await.unwrap();
    assert_eq!(target.as_deref(), Some("/new"));

    let target = resolve_alias(&docs, &shop(), "/blog").await.unwrap();
    assert_eq!(target.as_deref(), Some("/news"));
}

#[tokio::test]
async fn test_unknown_path_is_none() {
    let docs = documents().await;
    assert_eq!(resolve_alias(&docs, &shop(), "/missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_collection_is_prefixed() {
    let docs = documents().await;
    let unprefixed = VirtualHost::new("shop.example").with("database", "shop");
    assert_eq!(resolve_alias(&docs, &unprefixed, "/old").await.unwrap(), None);

    docs.insert(
        "shop",
        "configuration",
        json!({ "name": "aliases", "aliases": [ { "from": "/old", "to": "/plain" } ] }),
    )
    .await;
    let resolver = AliasResolver::new(docs);
    assert_eq!(
        resolver.resolve(&unprefixed, "/old").await.unwrap().as_deref(),
        Some("/plain")
    );
}

#[tokio::test]
async fn test_missing_database_or_document_is_none() {
    let docs = MemoryDocuments::new();
    let bare = VirtualHost::new("bare.example");
    assert_eq!(resolve_alias(&docs, &bare, "/old").await.unwrap(), None);
    assert_eq!(resolve_alias(&docs, &shop(), "/old").await.unwrap(), None);
}

#[tokio::test]
async fn test_malformed_aliases_is_none() {
    let docs = MemoryDocuments::new();
    docs.insert(
        "shop",
        "shop_configuration",
        json!({ "name": "aliases", "aliases": { "from": "/old", "to": "/new" } }),
    )
    .await;
    assert_eq!(resolve_alias(&docs, &shop(), "/old").await.unwrap(), None);
}

struct Unreachable;

impl DocumentSource for Unreachable {
    async fn find_named(
        &self,
        _database: &str,
        _collection: &str,
        _name: &str,
    ) -> Result<Option<Value>, BoxError> {
        Err("connection refused".into())
    }
}

#[tokio::test]
async fn test_source_failure_is_store_error() {
    let err = resolve_alias(&Unreachable, &shop(), "/old")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::StoreUnavailable(_)));
}
