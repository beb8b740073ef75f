use crate::sweep_harness::{Harness, RECIPIENT, days_ago, monday_morning};
use labelsweep::SweepError;
use labelsweep::ledger::LEDGER_KEY;
use labelsweep::mailbox::InMemoryMailbox;
use labelsweep::policy::{PolicyTable, default_policies};
use labelsweep::store::InMemoryPropertyStore;
use labelsweep::{ConfigError, Sweeper};
use std::sync::Arc;

#[tokio::test]
async fn weekly_summary_totals_runs_then_resets_ledger() {
    let h = Harness::with_defaults();
    let now = monday_morning();
    h.mailbox
        .add_thread("a", days_ago(now, 4), &["Automations/ThreeDayArchive"]);
    h.mailbox
        .add_thread("d", days_ago(now, 4), &["Automations/ThreeDayDelete"]);

    h.sweeper.run_daily(now).await;
    h.sweeper.run_daily(now).await;

    let summary = h.sweeper.run_weekly(now).await.unwrap();
    assert_eq!(summary.runs, 6);
    assert_eq!(
        summary.body,
        "Weekly Gmail automation summary\n\
         Generated: Mon, 13 May 2024 06:00:00 +0000\n\
         \n\
         - ThreeDayArchive: scanned=1, archived=1, errors=0\n\
         - SevenDayArchive: scanned=0, archived=0, errors=2\n\
         - ThreeDayDelete: scanned=1, trashed=1, errors=0"
    );

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, RECIPIENT);
    assert_eq!(sent[0].subject, "Weekly Gmail automation summary");
    assert_eq!(sent[0].body, summary.body);

    assert!(h.store.get(LEDGER_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn empty_week_reports_zero_totals() {
    let h = Harness::with_defaults();
    let summary = h.sweeper.run_weekly(monday_morning()).await.unwrap();
    assert_eq!(summary.runs, 0);
    assert!(summary.totals.iter().all(|(_, t)| t.scanned == 0 && t.errors == 0));
    assert_eq!(h.mailer.sent().len(), 1);
}

#[tokio::test]
async fn failed_delivery_keeps_ledger_for_next_attempt() {
    let h = Harness::with_defaults();
    let now = monday_morning();
    h.sweeper.run_daily(now).await;
    h.mailer.fail_with("relay down");

    let err = h.sweeper.run_weekly(now).await.unwrap_err();
    assert!(matches!(err, SweepError::Mail(_)));
    assert_eq!(h.sweeper.ledger().load().await.unwrap().len(), 3);
}

#[tokio::test]
async fn corrupt_ledger_aborts_without_sending() {
    let h = Harness::with_defaults();
    h.store.set(LEDGER_KEY, "{not json").await.unwrap();

    let err = h.sweeper.run_weekly(monday_morning()).await.unwrap_err();
    assert!(matches!(err, SweepError::Ledger(_)));
    assert!(h.mailer.sent().is_empty());
    assert_eq!(
        h.store.get(LEDGER_KEY).await.unwrap().as_deref(),
        Some("{not json")
    );
}

#[tokio::test]
async fn weekly_without_recipient_is_a_config_error() {
    let policies = Arc::new(PolicyTable::new(default_policies()).unwrap());
    let sweeper = Sweeper::new(
        policies,
        Arc::new(InMemoryPropertyStore::new()),
        Arc::new(InMemoryMailbox::new()),
    );

    let err = sweeper.run_weekly(monday_morning()).await.unwrap_err();
    assert!(matches!(err, SweepError::Config(ConfigError::Validation(_))));
}
