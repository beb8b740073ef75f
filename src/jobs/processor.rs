use crate::error::MailboxError;
use crate::ledger::RunFields;
use crate::mailbox::Mailbox;
use crate::policy::{Operation, PolicyEntry};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub scanned: u64,
    pub acted: u64,
}

/// Result of scanning one label.
#[derive(Debug)]
pub enum ProcessOutcome {
    Completed(ScanCounts),
    LabelNotFound,
    /// The scan stopped at a provider failure; `counts` is the work done before it.
    Failed {
        counts: ScanCounts,
        error: MailboxError,
    },
}

impl ProcessOutcome {
    pub fn counts(&self) -> ScanCounts {
        match self {
            Self::Completed(counts) | Self::Failed { counts, .. } => *counts,
            Self::LabelNotFound => ScanCounts::default(),
        }
    }

    pub fn error_message(&self, entry: &PolicyEntry) -> Option<String> {
        match self {
            Self::Completed(_) => None,
            Self::LabelNotFound => Some(format!("Label not found: {}", entry.label_name)),
            Self::Failed { error, .. } => Some(error.to_string()),
        }
    }

    /// Ledger fields for this outcome under `entry`'s policy snapshot.
    ///
    /// A failed scan is recorded as 0/0 with its message; the partial counts
    /// only reach the daily report and log.
    pub fn to_fields(&self, entry: &PolicyEntry) -> RunFields {
        let counts = match self {
            Self::Completed(counts) => *counts,
            Self::LabelNotFound | Self::Failed { .. } => ScanCounts::default(),
        };
        let fields = RunFields::for_policy(entry).with_counts(counts.scanned, counts.acted);
        match self.error_message(entry) {
            Some(message) => fields.with_error(message),
            None => fields,
        }
    }
}

/// Applies one policy entry to the threads currently under its label.
#[derive(Clone)]
pub struct LabelProcessor {
    mailbox: Arc<dyn Mailbox>,
}

impl LabelProcessor {
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self { mailbox }
    }

    pub async fn process(&self, entry: &PolicyEntry, now: DateTime<Utc>) -> ProcessOutcome {
        let mut counts = ScanCounts::default();
        match self.scan(entry, now, &mut counts).await {
            Ok(true) => ProcessOutcome::Completed(counts),
            Ok(false) => ProcessOutcome::LabelNotFound,
            Err(error) => ProcessOutcome::Failed { counts, error },
        }
    }

    /// Returns `Ok(false)` when the label does not exist.
    async fn scan(
        &self,
        entry: &PolicyEntry,
        now: DateTime<Utc>,
        counts: &mut ScanCounts,
    ) -> Result<bool, MailboxError> {
        let Some(label) = self.mailbox.find_label(&entry.label_name).await? else {
            return Ok(false);
        };

        let cutoff = entry.cutoff(now);
        let threads = self.mailbox.threads(&label).await?;
        tracing::info!("[{}] threads with label: {}", entry.key, threads.len());

        for thread in &threads {
            counts.scanned += 1;

            let last_activity = self.mailbox.last_activity(thread).await?;
            if last_activity >= cutoff {
                continue;
            }

            match entry.op {
                Operation::Trash => self.mailbox.trash(thread).await?,
                Operation::Archive => self.mailbox.archive(thread).await?,
            }
            // unlabel so the next scan does not select it again
            self.mailbox.remove_label(thread, &label).await?;
            counts.acted += 1;
        }

        Ok(true)
    }
}
