use crate::sweep_harness::{Harness, days_ago, monday_morning};
use labelsweep::mailbox::FailPoint;

const ARCHIVE_3: &str = "Automations/ThreeDayArchive";
const ARCHIVE_7: &str = "Automations/SevenDayArchive";
const DELETE_3: &str = "Automations/ThreeDayDelete";

#[tokio::test]
async fn daily_run_applies_each_policy_and_records_once_per_entry() {
    let h = Harness::with_defaults();
    let now = monday_morning();
    h.mailbox.add_thread("old-a", days_ago(now, 5), &[ARCHIVE_3]);
    h.mailbox.add_thread("new-a", days_ago(now, 1), &[ARCHIVE_3]);
    h.mailbox.add_thread("mid-b", days_ago(now, 5), &[ARCHIVE_7]);
    h.mailbox.add_thread("old-c", days_ago(now, 4), &[DELETE_3]);

    let report = h.sweeper.run_daily(now).await;

    let summary: Vec<(&str, u64, u64)> = report
        .entries
        .iter()
        .map(|e| (e.key.as_str(), e.scanned, e.acted))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("ThreeDayArchive", 2, 1),
            ("SevenDayArchive", 1, 0),
            ("ThreeDayDelete", 1, 1),
        ]
    );
    assert_eq!(report.failed_entries(), 0);

    let archived = h.mailbox.thread("old-a").unwrap();
    assert!(!archived.in_inbox);
    assert!(!archived.labels.contains(ARCHIVE_3));

    let fresh = h.mailbox.thread("new-a").unwrap();
    assert!(fresh.in_inbox);
    assert!(fresh.labels.contains(ARCHIVE_3));

    let trashed = h.mailbox.thread("old-c").unwrap();
    assert!(trashed.trashed);
    assert!(!trashed.labels.contains(DELETE_3));

    let runs = h.sweeper.ledger().load().await.unwrap();
    assert_eq!(runs.len(), 3);
    assert!(runs.iter().all(|r| !r.is_error()));
}

#[tokio::test]
async fn second_run_does_not_reprocess_handled_threads() {
    let h = Harness::with_defaults();
    let now = monday_morning();
    h.mailbox.add_thread("old-a", days_ago(now, 10), &[ARCHIVE_3]);

    h.sweeper.run_daily(now).await;
    let second = h.sweeper.run_daily(now).await;

    assert_eq!(second.entries[0].scanned, 0);
    assert_eq!(second.entries[0].acted, 0);
    assert_eq!(h.sweeper.ledger().load().await.unwrap().len(), 6);
}

#[tokio::test]
async fn missing_label_is_recorded_and_later_entries_still_run() {
    let h = Harness::with_defaults();
    let now = monday_morning();
    // only the delete label exists
    h.mailbox.add_thread("old-c", days_ago(now, 4), &[DELETE_3]);

    let report = h.sweeper.run_daily(now).await;

    assert_eq!(report.failed_entries(), 2);
    assert_eq!(
        report.entries[0].error.as_deref(),
        Some("Label not found: Automations/ThreeDayArchive")
    );
    assert_eq!(report.entries[2].acted, 1);

    let runs = h.sweeper.ledger().load().await.unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].error, "Label not found: Automations/ThreeDayArchive");
    assert_eq!((runs[0].scanned, runs[0].acted), (0, 0));
}

#[tokio::test]
async fn provider_failure_is_recorded_as_zero_counts_with_message() {
    let h = Harness::with_defaults();
    let now = monday_morning();
    h.mailbox.add_thread("t1", days_ago(now, 9), &[ARCHIVE_3]);
    h.mailbox.add_thread("t2", days_ago(now, 9), &[ARCHIVE_3]);
    h.mailbox.add_thread("t3", days_ago(now, 9), &[ARCHIVE_3]);
    h.mailbox.fail_on("t2", FailPoint::Archive);

    let report = h.sweeper.run_daily(now).await;

    // t3 is never reached
    let entry = &report.entries[0];
    assert_eq!((entry.scanned, entry.acted), (2, 1));
    assert!(entry.error.as_deref().unwrap().contains("injected failure"));

    assert!(h.mailbox.thread("t2").unwrap().labels.contains(ARCHIVE_3));
    assert!(h.mailbox.thread("t3").unwrap().labels.contains(ARCHIVE_3));

    // the report shows partial progress, the ledger does not
    let runs = h.sweeper.ledger().load().await.unwrap();
    assert_eq!((runs[0].scanned, runs[0].acted), (0, 0));
    assert!(runs[0].error.contains("injected failure"));
}
