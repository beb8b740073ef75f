use chrono::{DateTime, Duration, TimeZone, Utc};
use labelsweep::Sweeper;
use labelsweep::mail::CapturingMailer;
use labelsweep::mailbox::InMemoryMailbox;
use labelsweep::policy::{PolicyTable, default_policies};
use labelsweep::store::{InMemoryPropertyStore, PropertyStore};
use std::sync::Arc;

pub const RECIPIENT: &str = "owner@example.com";

pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 13, 6, 0, 0).unwrap()
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

pub struct Harness {
    pub mailbox: Arc<InMemoryMailbox>,
    pub store: Arc<dyn PropertyStore>,
    pub mailer: Arc<CapturingMailer>,
    pub sweeper: Sweeper,
}

impl Harness {
    pub fn with_defaults() -> Self {
        Self::with_store(Arc::new(InMemoryPropertyStore::new()))
    }

    pub fn with_store(store: Arc<dyn PropertyStore>) -> Self {
        let policies = Arc::new(PolicyTable::new(default_policies()).unwrap());
        let mailbox = Arc::new(InMemoryMailbox::new());
        let mailer = Arc::new(CapturingMailer::new());
        let sweeper = Sweeper::new(policies, Arc::clone(&store), mailbox.clone())
            .with_summary(mailer.clone(), RECIPIENT);
        Self {
            mailbox,
            store,
            mailer,
            sweeper,
        }
    }
}
