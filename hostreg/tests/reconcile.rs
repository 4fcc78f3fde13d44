use hostreg::{HostEventKind, HostStore, RegistryError, testing::Entry};
use std::sync::Arc;

mod common;
use common::{Harness, SCOPE, assert_unique, tenant};

#[tokio::test]
async fn test_delta_adds_new_and_removes_stale() {
    let h = Harness::new();
    h.set_store(&["a.example", "b.example"]).await;
    h.registry.reconcile().await.unwrap();
    let b_before = h.registry.get("b.example").await.unwrap();
    h.journal.clear();

    h.set_store(&["b.example", "c.example"]).await;
    let report = h.registry.reconcile().await.unwrap();

    assert_eq!(report.added_hostnames(), vec!["c.example"]);
    assert_eq!(report.removed_hostnames(), vec!["a.example"]);
    assert!(report.is_clean());

    // Nothing about b, one entry per observer for c and a.
    assert_eq!(h.journal.added(), vec!["c.example", "c.example"]);
    assert_eq!(h.journal.removed(), vec!["a.example", "a.example"]);

    assert_eq!(h.hostnames().await, vec!["b.example", "c.example"]);
    let b_after = h.registry.get("b.example").await.unwrap();
    assert!(Arc::ptr_eq(&b_before, &b_after), "known host must keep its instance");
}

#[tokio::test]
async fn test_adds_precede_removes_for_every_observer() {
    let h = Harness::new();
    h.set_store(&["a.example", "b.example"]).await;
    h.registry.reconcile().await.unwrap();
    h.journal.clear();

    h.set_store(&["b.example", "c.example", "d.example"]).await;
    h.registry.reconcile().await.unwrap();

    let entries = h.journal.entries();
    let last_add = entries
        .iter()
        .rposition(|e| e.kind == HostEventKind::Added)
        .unwrap();
    let first_remove = entries
        .iter()
        .position(|e| e.kind == HostEventKind::Removed)
        .unwrap();
    assert!(last_add < first_remove);

    // Observers are notified in a fixed order for each event.
    assert_eq!(
        entries[..2],
        [
            Entry {
                observer: "o1".into(),
                kind: HostEventKind::Added,
                hostname: "c.example".into(),
            },
            Entry {
                observer: "o2".into(),
                kind: HostEventKind::Added,
                hostname: "c.example".into(),
            },
        ]
    );
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let h = Harness::new();
    h.set_store(&["a.example", "b.example", "c.example"]).await;

    let first = h.registry.reconcile().await.unwrap();
    assert_eq!(first.added.len(), 3);
    let before = h.hostnames().await;
    let notified = h.journal.len();

    let second = h.registry.reconcile().await.unwrap();
    assert!(second.is_unchanged());
    assert_eq!(h.journal.len(), notified);
    assert_eq!(h.hostnames().await, before);
    assert_eq!(h.activator.count(), 3, "known hosts are not re-activated");
}

#[tokio::test]
async fn test_new_set_follows_store_order() {
    let h = Harness::new();
    h.set_store(&["a.example", "b.example", "c.example"]).await;
    h.registry.reconcile().await.unwrap();

    h.set_store(&["c.example", "a.example", "b.example"]).await;
    let report = h.registry.reconcile().await.unwrap();

    assert!(report.is_unchanged());
    assert_eq!(
        h.hostnames().await,
        vec!["c.example", "a.example", "b.example"]
    );
}

#[tokio::test]
async fn test_store_failure_leaves_registry_untouched() {
    let h = Harness::new();
    h.set_store(&["a.example"]).await;
    h.registry.reconcile().await.unwrap();
    h.journal.clear();

    h.set_store(&["b.example"]).await;
    h.store.set_failing(true);
    let err = h.registry.reconcile().await.unwrap_err();

    assert!(matches!(err, RegistryError::StoreUnavailable(_)));
    assert_eq!(h.hostnames().await, vec!["a.example"]);
    assert!(h.journal.is_empty());
}

#[tokio::test]
async fn test_stale_hosts_are_not_deleted_from_store() {
    let h = Harness::new();
    h.seed(&["a.example"]).await;
    h.registry.reconcile().await.unwrap();

    // A record written elsewhere disappears and comes back.
    h.set_store(&[]).await;
    let report = h.registry.reconcile().await.unwrap();
    assert_eq!(report.removed_hostnames(), vec!["a.example"]);
    assert!(h.registry.is_empty().await);

    h.store.create(SCOPE, &tenant("a.example")).await.unwrap();
    let report = h.registry.reconcile().await.unwrap();
    assert_eq!(report.added_hostnames(), vec!["a.example"]);
}

#[tokio::test]
async fn test_duplicate_store_records_stay_unique() {
    let h = Harness::new();
    h.seed(&["a.example", "b.example", "a.example"]).await;

    let report = h.registry.reconcile().await.unwrap();

    assert_eq!(report.added_hostnames(), vec!["a.example", "b.example"]);
    assert_eq!(h.hostnames().await, vec!["a.example", "b.example"]);
    assert_unique(&h.registry).await;
}

#[tokio::test]
async fn test_run_reannounces_everything() {
    let h = Harness::new();
    h.set_store(&["a.example", "b.example"]).await;
    h.registry.reconcile().await.unwrap();
    let a_before = h.registry.get("a.example").await.unwrap();
    h.journal.clear();

    h.set_store(&["a.example", "c.example"]).await;
    let report = h.registry.run().await.unwrap();

    assert_eq!(report.added_hostnames(), vec!["a.example", "c.example"]);
    assert_eq!(report.removed_hostnames(), vec!["b.example"]);
    assert_eq!(
        h.journal.added(),
        vec!["a.example", "a.example", "c.example", "c.example"]
    );
    assert_eq!(h.activator.activated(), vec!["a", "b", "a", "c"]);

    let a_after = h.registry.get("a.example").await.unwrap();
    assert!(!Arc::ptr_eq(&a_before, &a_after), "run loads fresh instances");
    assert_eq!(h.hostnames().await, vec!["a.example", "c.example"]);

    // Steady state afterwards: nothing to announce.
    let report = h.registry.execute().await.unwrap();
    assert_eq!(report.added.len(), 2);
    let report = h.registry.reconcile().await.unwrap();
    assert!(report.is_unchanged());
}

#[tokio::test]
async fn test_ensure_loaded_reconciles_once() {
    let h = Harness::new();
    h.set_store(&["a.example", "b.example"]).await;

    assert!(h.registry.list().await.is_empty());
    let hosts = h.registry.ensure_loaded().await.unwrap();
    assert_eq!(hosts.len(), 2);
    assert_eq!(h.registry.ensure_loaded().await.unwrap().len(), 2);
    assert_eq!(h.activator.count(), 2);
}
