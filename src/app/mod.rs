pub mod dispatch;
pub mod render;

use crate::config::Config;
use crate::error::{ConfigError, SweepError};
use crate::jobs::{DailyJob, DailyReport, LabelProcessor, WeeklyJob, WeeklySummary};
use crate::ledger::{Ledger, RunRecorder};
use crate::mail::{MailSender, SmtpMailer};
use crate::mailbox::{GmailMailbox, Mailbox, build_gmail_client};
use crate::policy::PolicyTable;
use crate::store::{PropertyStore, SqlitePropertyStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The daily and weekly jobs wired to one mailbox and one ledger.
pub struct Sweeper {
    policies: Arc<PolicyTable>,
    ledger: Ledger,
    daily: DailyJob,
    weekly: Option<WeeklyJob>,
}

impl Sweeper {
    pub fn new(
        policies: Arc<PolicyTable>,
        store: Arc<dyn PropertyStore>,
        mailbox: Arc<dyn Mailbox>,
    ) -> Self {
        let ledger = Ledger::new(store);
        let daily = DailyJob::new(
            Arc::clone(&policies),
            LabelProcessor::new(mailbox),
            RunRecorder::new(ledger.clone()),
        );
        Self {
            policies,
            ledger,
            daily,
            weekly: None,
        }
    }

    /// Enables the weekly summary, delivered to `recipient` through `mailer`.
    pub fn with_summary(
        mut self,
        mailer: Arc<dyn MailSender>,
        recipient: impl Into<String>,
    ) -> Self {
        self.weekly = Some(WeeklyJob::new(
            Arc::clone(&self.policies),
            self.ledger.clone(),
            mailer,
            recipient,
        ));
        self
    }

    /// Builds the Gmail/SQLite/SMTP stack described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let policies = Arc::new(config.policy_table()?);
        let store = open_store(config).await?;

        let token = config
            .gmail
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("No Gmail access token: set gmail.access_token or LABELSWEEP_GMAIL_TOKEN")?;
        let mailbox = GmailMailbox::new(
            &config.gmail.api_base,
            token,
            build_gmail_client(config.gmail.timeout_secs),
        );

        let sweeper = Self::new(policies, store, Arc::new(mailbox));
        if config.summary.recipient.trim().is_empty() {
            tracing::info!("No summary recipient configured, weekly summary disabled");
            return Ok(sweeper);
        }

        let mailer = SmtpMailer::from_config(&config.smtp, config.summary_sender())?;
        Ok(sweeper.with_summary(Arc::new(mailer), config.summary.recipient.clone()))
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub async fn run_daily(&self, now: DateTime<Utc>) -> DailyReport {
        self.daily.run(now).await
    }

    pub async fn run_weekly(&self, now: DateTime<Utc>) -> Result<WeeklySummary, SweepError> {
        let Some(weekly) = &self.weekly else {
            return Err(ConfigError::Validation(
                "summary.recipient is not set; weekly summary is disabled".into(),
            )
            .into());
        };
        weekly.run(now).await
    }
}

/// Opens the SQLite property store backing the run ledger.
pub async fn open_store(config: &Config) -> Result<Arc<dyn PropertyStore>> {
    let path = config.ledger_db_path();
    let store = SqlitePropertyStore::open(&path)
        .await
        .with_context(|| format!("Failed to open ledger store at {}", path.display()))?;
    Ok(Arc::new(store))
}
