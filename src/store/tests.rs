use super::*;
use tempfile::TempDir;

async fn exercise_slot(store: &dyn PropertyStore) {
    assert_eq!(store.get("slot").await.unwrap(), None);

    store.set("slot", "first").await.unwrap();
    assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("first"));

    store.set("slot", "second").await.unwrap();
    assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("second"));

    store.delete("slot").await.unwrap();
    assert_eq!(store.get("slot").await.unwrap(), None);

    // deleting an absent key is a no-op
    store.delete("slot").await.unwrap();
}

#[tokio::test]
async fn memory_store_get_set_delete() {
    let store = InMemoryPropertyStore::new();
    exercise_slot(&store).await;
    assert_eq!(store.name(), "memory");
}

#[tokio::test]
async fn sqlite_store_get_set_delete() {
    let tmp = TempDir::new().unwrap();
    let store = SqlitePropertyStore::open(&tmp.path().join("state").join("props.db"))
        .await
        .unwrap();
    exercise_slot(&store).await;
    assert_eq!(store.name(), "sqlite");
}

#[tokio::test]
async fn sqlite_store_persists_across_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("props.db");

    {
        let store = SqlitePropertyStore::open(&path).await.unwrap();
        store.set("MAILBOX_ACTION_RUNS_JSON", "[]").await.unwrap();
    }

    let reopened = SqlitePropertyStore::open(&path).await.unwrap();
    assert_eq!(
        reopened
            .get("MAILBOX_ACTION_RUNS_JSON")
            .await
            .unwrap()
            .as_deref(),
        Some("[]")
    );
    assert_eq!(reopened.path(), path.as_path());
}
