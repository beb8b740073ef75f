mod expression;

pub use expression::{next_run_for, parse_schedule};

use crate::app::Sweeper;
use crate::config::ScheduleConfig;
use anyhow::Result;
use chrono::{DateTime, Utc};
use cron::Schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Daily,
    Weekly,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

struct Slot {
    expression: String,
    schedule: Schedule,
    next: DateTime<Utc>,
}

impl Slot {
    fn new(expression: &str, from: DateTime<Utc>) -> Result<Self> {
        let schedule = parse_schedule(expression)?;
        let next = next_run_for(&schedule, expression, from)?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
            next,
        })
    }

    /// Moves past the occurrence just run. Occurrences already behind `now`
    /// (e.g. after the host slept) are skipped, not replayed.
    fn advance(&mut self, now: DateTime<Utc>) -> Result<()> {
        let following = next_run_for(&self.schedule, &self.expression, self.next)?;
        if following < now {
            tracing::warn!(
                expression = %self.expression,
                missed_from = %following.to_rfc3339(),
                "Skipping missed occurrences"
            );
        }
        self.next = next_run_for(&self.schedule, &self.expression, self.next.max(now))?;
        Ok(())
    }
}

/// Upcoming occurrences of the daily and weekly jobs.
///
/// Only the slot that ran is advanced, so a job that fell due while the other
/// one ran still runs next. On a tie the daily job goes first.
pub struct Timetable {
    daily: Slot,
    weekly: Slot,
}

impl Timetable {
    pub fn new(config: &ScheduleConfig, from: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            daily: Slot::new(&config.daily, from)?,
            weekly: Slot::new(&config.weekly, from)?,
        })
    }

    pub fn peek(&self) -> (JobKind, DateTime<Utc>) {
        if self.daily.next <= self.weekly.next {
            (JobKind::Daily, self.daily.next)
        } else {
            (JobKind::Weekly, self.weekly.next)
        }
    }

    pub fn advance(&mut self, kind: JobKind, now: DateTime<Utc>) -> Result<()> {
        match kind {
            JobKind::Daily => self.daily.advance(now),
            JobKind::Weekly => self.weekly.advance(now),
        }
    }
}

/// Runs the jobs on their cron schedules until Ctrl-C.
pub async fn run(sweeper: &Sweeper, config: &ScheduleConfig) -> Result<()> {
    let mut timetable = Timetable::new(config, Utc::now())?;

    loop {
        let (kind, at) = timetable.peek();
        tracing::info!(job = kind.as_str(), at = %at.to_rfc3339(), "Next scheduled run");

        let wait = (at - Utc::now()).to_std().unwrap_or_default();
        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Scheduler stopping");
                return Ok(());
            }
        }

        match kind {
            JobKind::Daily => {
                let report = sweeper.run_daily(Utc::now()).await;
                if report.unrecorded_entries() > 0 {
                    tracing::warn!(
                        unrecorded = report.unrecorded_entries(),
                        "Daily run finished with unrecorded entries"
                    );
                }
            }
            JobKind::Weekly => {
                if let Err(e) = sweeper.run_weekly(Utc::now()).await {
                    tracing::warn!("Weekly summary failed: {e}");
                }
            }
        }

        timetable.advance(kind, Utc::now())?;
    }
}

#[cfg(test)]
mod tests;
