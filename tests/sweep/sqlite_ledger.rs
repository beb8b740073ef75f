use crate::sweep_harness::{Harness, days_ago, monday_morning};
use labelsweep::store::SqlitePropertyStore;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn ledger_survives_reopening_the_store() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("state.db");
    let now = monday_morning();

    {
        let store = SqlitePropertyStore::open(&db).await.unwrap();
        let h = Harness::with_store(Arc::new(store));
        h.mailbox
            .add_thread("old", days_ago(now, 8), &["Automations/SevenDayArchive"]);
        h.sweeper.run_daily(now).await;
    }

    let store = SqlitePropertyStore::open(&db).await.unwrap();
    let h = Harness::with_store(Arc::new(store));
    let runs = h.sweeper.ledger().load().await.unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[1].action_key, "SevenDayArchive");
    assert_eq!((runs[1].scanned, runs[1].acted), (1, 1));

    let summary = h.sweeper.run_weekly(now).await.unwrap();
    assert!(summary.body.contains("- SevenDayArchive: scanned=1, archived=1, errors=0"));
    assert!(h.sweeper.ledger().load().await.unwrap().is_empty());
}
