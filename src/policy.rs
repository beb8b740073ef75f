use crate::error::ConfigError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Disposition applied to a stale thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    #[serde(alias = "archive")]
    Archive,
    #[serde(alias = "trash")]
    Trash,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "ARCHIVE",
            Self::Trash => "TRASH",
        }
    }

    /// Past-tense verb used in the weekly report.
    pub fn report_verb(self) -> &'static str {
        match self {
            Self::Trash => "trashed",
            Self::Archive => "archived",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One label → disposition mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub key: String,
    /// Exact, case-sensitive label name including nesting, e.g. `Automations/ThreeDayArchive`.
    #[serde(rename = "label")]
    pub label_name: String,
    #[serde(rename = "days")]
    pub age_threshold_days: u32,
    pub op: Operation,
}

impl PolicyEntry {
    pub fn new(
        key: impl Into<String>,
        label_name: impl Into<String>,
        age_threshold_days: u32,
        op: Operation,
    ) -> Self {
        Self {
            key: key.into(),
            label_name: label_name.into(),
            age_threshold_days,
            op,
        }
    }

    /// Threads whose last activity is strictly before this instant are stale.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.age_threshold_days))
    }
}

/// Ordered, validated policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    entries: Vec<PolicyEntry>,
}

impl PolicyTable {
    pub fn new(entries: Vec<PolicyEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::Validation(
                "at least one policy entry is required".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.key.trim().is_empty() {
                return Err(ConfigError::Validation("policy key must not be empty".into()));
            }
            if entry.label_name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "policy '{}' has an empty label name",
                    entry.key
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate policy key '{}'",
                    entry.key
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PolicyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolicyEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&PolicyEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn default_policies() -> Vec<PolicyEntry> {
    vec![
        PolicyEntry::new(
            "ThreeDayArchive",
            "Automations/ThreeDayArchive",
            3,
            Operation::Archive,
        ),
        PolicyEntry::new(
            "SevenDayArchive",
            "Automations/SevenDayArchive",
            7,
            Operation::Archive,
        ),
        PolicyEntry::new(
            "ThreeDayDelete",
            "Automations/ThreeDayDelete",
            3,
            Operation::Trash,
        ),
    ]
}
