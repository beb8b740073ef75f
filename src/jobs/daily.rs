use super::processor::LabelProcessor;
use crate::ledger::RunRecorder;
use crate::policy::{Operation, PolicyTable};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// What happened to one policy entry during a daily run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub key: String,
    pub op: Operation,
    pub scanned: u64,
    pub acted: u64,
    pub error: Option<String>,
    /// Set when the run record could not be written to the ledger.
    pub record_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyReport {
    pub entries: Vec<EntryReport>,
}

impl DailyReport {
    pub fn failed_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    pub fn unrecorded_entries(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.record_error.is_some())
            .count()
    }
}

/// Runs every policy entry once, in table order, and records each outcome.
pub struct DailyJob {
    policies: Arc<PolicyTable>,
    processor: LabelProcessor,
    recorder: RunRecorder,
}

impl DailyJob {
    pub fn new(
        policies: Arc<PolicyTable>,
        processor: LabelProcessor,
        recorder: RunRecorder,
    ) -> Self {
        Self {
            policies,
            processor,
            recorder,
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> DailyReport {
        tracing::info!(policies = self.policies.len(), "Daily mailbox actions started");

        let mut report = DailyReport::default();
        for entry in self.policies.iter() {
            let outcome = self.processor.process(entry, now).await;
            let counts = outcome.counts();
            let error = outcome.error_message(entry);

            match &error {
                None => tracing::info!(
                    key = %entry.key,
                    scanned = counts.scanned,
                    acted = counts.acted,
                    "Policy applied"
                ),
                Some(message) => tracing::warn!(
                    key = %entry.key,
                    scanned = counts.scanned,
                    acted = counts.acted,
                    "Policy failed: {message}"
                ),
            }

            let fields = outcome.to_fields(entry);
            let record_error = match self.recorder.record(&entry.key, fields).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::error!(key = %entry.key, "Failed to record run: {e}");
                    Some(e.to_string())
                }
            };

            report.entries.push(EntryReport {
                key: entry.key.clone(),
                op: entry.op,
                scanned: counts.scanned,
                acted: counts.acted,
                error,
                record_error,
            });
        }

        report
    }
}
