use crate::error::SweepError;
use crate::ledger::{Ledger, RunRecord};
use crate::mail::MailSender;
use crate::policy::PolicyTable;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Used both as the report's first line and as the mail subject.
pub const SUMMARY_TITLE: &str = "Weekly Gmail automation summary";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub scanned: u64,
    pub acted: u64,
    pub errors: u64,
}

impl Totals {
    fn add(&mut self, record: &RunRecord) {
        self.scanned += record.scanned;
        self.acted += record.acted;
        if record.is_error() {
            self.errors += 1;
        }
    }
}

/// Per-key totals in policy-table order. Every key of the table is present,
/// including ones without runs.
pub fn aggregate(policies: &PolicyTable, runs: &[RunRecord]) -> Vec<(String, Totals)> {
    let mut totals: HashMap<&str, Totals> = policies
        .iter()
        .map(|entry| (entry.key.as_str(), Totals::default()))
        .collect();

    for run in runs {
        match totals.get_mut(run.action_key.as_str()) {
            Some(t) => t.add(run),
            None => tracing::warn!(
                key = %run.action_key,
                "Ignoring run record for a policy that is no longer configured"
            ),
        }
    }

    policies
        .iter()
        .map(|entry| {
            let t = totals.get(entry.key.as_str()).copied().unwrap_or_default();
            (entry.key.clone(), t)
        })
        .collect()
}

pub fn render_report(
    policies: &PolicyTable,
    totals: &[(String, Totals)],
    generated: DateTime<Utc>,
) -> String {
    let mut lines = Vec::with_capacity(totals.len() + 3);
    lines.push(SUMMARY_TITLE.to_string());
    lines.push(format!("Generated: {}", generated.to_rfc2822()));
    lines.push(String::new());

    for (key, t) in totals {
        let verb = policies
            .get(key)
            .map_or("archived", |entry| entry.op.report_verb());
        lines.push(format!(
            "- {key}: scanned={}, {verb}={}, errors={}",
            t.scanned, t.acted, t.errors
        ));
    }

    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySummary {
    pub runs: usize,
    pub totals: Vec<(String, Totals)>,
    pub body: String,
}

/// Summarises the ledger, mails the report and resets the ledger.
pub struct WeeklyJob {
    policies: Arc<PolicyTable>,
    ledger: Ledger,
    mailer: Arc<dyn MailSender>,
    recipient: String,
}

impl WeeklyJob {
    pub fn new(
        policies: Arc<PolicyTable>,
        ledger: Ledger,
        mailer: Arc<dyn MailSender>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            policies,
            ledger,
            mailer,
            recipient: recipient.into(),
        }
    }

    /// The ledger is cleared only after the mail sender accepted the report.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<WeeklySummary, SweepError> {
        let runs = self.ledger.load().await?;
        let totals = aggregate(&self.policies, &runs);
        let body = render_report(&self.policies, &totals, now);

        self.mailer.send(&self.recipient, SUMMARY_TITLE, &body).await?;
        self.ledger.clear().await?;

        tracing::info!(
            runs = runs.len(),
            transport = self.mailer.name(),
            "Weekly summary sent, ledger reset"
        );

        Ok(WeeklySummary {
            runs: runs.len(),
            totals,
            body,
        })
    }
}
