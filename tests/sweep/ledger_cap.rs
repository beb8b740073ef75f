use crate::sweep_harness::{Harness, days_ago, monday_morning};
use chrono::Duration;
use labelsweep::ledger::MAX_RUNS_TO_KEEP;

#[tokio::test]
async fn ledger_keeps_only_the_newest_records() {
    let h = Harness::with_defaults();
    let start = monday_morning();
    // only the first run acts on anything
    h.mailbox
        .add_thread("first", days_ago(start, 10), &["Automations/ThreeDayArchive"]);

    // three records per run; 101 runs overflow the cap by exactly the first run
    for day in 0..100 {
        h.sweeper.run_daily(start + Duration::days(day)).await;
    }
    let last_day = start + Duration::days(100);
    h.mailbox
        .add_thread("last", days_ago(last_day, 10), &["Automations/ThreeDayDelete"]);
    h.sweeper.run_daily(last_day).await;

    let runs = h.sweeper.ledger().load().await.unwrap();
    assert_eq!(runs.len(), MAX_RUNS_TO_KEEP);
    assert_eq!(runs[0].action_key, "ThreeDayArchive");
    assert!(runs[..MAX_RUNS_TO_KEEP - 1].iter().all(|r| r.acted == 0));

    let newest = runs.last().unwrap();
    assert_eq!(newest.action_key, "ThreeDayDelete");
    assert_eq!((newest.scanned, newest.acted), (1, 1));
}
