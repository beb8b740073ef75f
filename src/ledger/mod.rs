//! Bounded run-history ledger.
//!
//! The ledger is one JSON array stored under [`LEDGER_KEY`]. The daily job
//! appends one [`RunRecord`] per policy entry through the [`RunRecorder`];
//! the weekly job reads the whole array once and then clears it.

mod recorder;
mod record;

pub use record::{RunFields, RunRecord};
pub use recorder::RunRecorder;

use crate::error::{LedgerError, SweepError};
use crate::store::PropertyStore;
use std::sync::Arc;

/// Property-store slot holding the serialized ledger.
pub const LEDGER_KEY: &str = "MAILBOX_ACTION_RUNS_JSON";

/// Maximum number of run records retained between weekly summaries.
pub const MAX_RUNS_TO_KEEP: usize = 300;

/// Typed view over the ledger slot of a [`PropertyStore`].
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn PropertyStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self { store }
    }

    /// Loads the ledger, failing on a value that does not decode.
    pub async fn load(&self) -> Result<Vec<RunRecord>, SweepError> {
        match self.store.get(LEDGER_KEY).await? {
            None => Ok(Vec::new()),
            Some(raw) => decode(&raw).map_err(SweepError::from),
        }
    }

    /// Loads the ledger, treating a corrupt value as an empty history.
    pub async fn load_or_empty(&self) -> Result<Vec<RunRecord>, SweepError> {
        let Some(raw) = self.store.get(LEDGER_KEY).await? else {
            return Ok(Vec::new());
        };
        match decode(&raw) {
            Ok(runs) => Ok(runs),
            Err(err) => {
                tracing::warn!(
                    store = self.store.name(),
                    "Discarding unreadable run ledger: {err}"
                );
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, runs: &[RunRecord]) -> Result<(), SweepError> {
        let raw =
            serde_json::to_string(runs).map_err(|e| LedgerError::Encode(e.to_string()))?;
        self.store.set(LEDGER_KEY, &raw).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), SweepError> {
        self.store.delete(LEDGER_KEY).await?;
        Ok(())
    }
}

fn decode(raw: &str) -> Result<Vec<RunRecord>, LedgerError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| LedgerError::Corrupt(e.to_string()))
}
