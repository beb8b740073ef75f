use super::{Ledger, MAX_RUNS_TO_KEEP, RunFields, RunRecord};
use crate::error::SweepError;
use chrono::Utc;

/// Appends run records to the ledger as a FIFO window of at most `cap` entries.
#[derive(Clone)]
pub struct RunRecorder {
    ledger: Ledger,
    cap: usize,
}

impl RunRecorder {
    pub fn new(ledger: Ledger) -> Self {
        Self::with_cap(ledger, MAX_RUNS_TO_KEEP)
    }

    pub fn with_cap(ledger: Ledger, cap: usize) -> Self {
        Self {
            ledger,
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// One read-modify-write of the ledger slot. Returns the appended record.
    pub async fn record(
        &self,
        action_key: &str,
        fields: RunFields,
    ) -> Result<RunRecord, SweepError> {
        let mut runs = self.ledger.load_or_empty().await?;
        let record = fields.into_record(action_key, Utc::now());
        runs.push(record.clone());

        let overflow = runs.len().saturating_sub(self.cap);
        if overflow > 0 {
            runs.drain(..overflow);
            tracing::debug!(evicted = overflow, cap = self.cap, "Evicted oldest run records");
        }

        self.ledger.save(&runs).await?;
        Ok(record)
    }
}
