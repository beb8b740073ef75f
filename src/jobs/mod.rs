mod daily;
mod processor;
mod weekly;

pub use daily::{DailyJob, DailyReport, EntryReport};
pub use processor::{LabelProcessor, ProcessOutcome, ScanCounts};
pub use weekly::{SUMMARY_TITLE, Totals, WeeklyJob, WeeklySummary, aggregate, render_report};
