use crate::policy::{Operation, PolicyEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one policy entry during one daily run, with the policy as it was then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub when: DateTime<Utc>,
    pub action_key: String,
    /// Snapshot fields; older records may lack them.
    #[serde(default)]
    pub label_name: String,
    #[serde(default)]
    pub days_old: u32,
    pub op: Operation,
    #[serde(default)]
    pub scanned: u64,
    #[serde(default)]
    pub acted: u64,
    /// Empty when the run succeeded.
    #[serde(default)]
    pub error: String,
}

impl RunRecord {
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Everything a record carries except its timestamp and action key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFields {
    pub label_name: String,
    pub days_old: u32,
    pub op: Operation,
    pub scanned: u64,
    pub acted: u64,
    pub error: Option<String>,
}

impl RunFields {
    /// Policy snapshot with zero counts and no error.
    pub fn for_policy(entry: &PolicyEntry) -> Self {
        Self {
            label_name: entry.label_name.clone(),
            days_old: entry.age_threshold_days,
            op: entry.op,
            scanned: 0,
            acted: 0,
            error: None,
        }
    }

    pub fn with_counts(mut self, scanned: u64, acted: u64) -> Self {
        self.scanned = scanned;
        self.acted = acted;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub(super) fn into_record(self, action_key: &str, when: DateTime<Utc>) -> RunRecord {
        RunRecord {
            when,
            action_key: action_key.to_string(),
            label_name: self.label_name,
            days_old: self.days_old,
            op: self.op,
            scanned: self.scanned,
            acted: self.acted,
            error: self.error.unwrap_or_default(),
        }
    }
}
