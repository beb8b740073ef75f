use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `labelsweep` - label-driven mailbox archiving with a weekly summary.
#[derive(Parser, Debug)]
#[command(name = "labelsweep")]
#[command(version)]
#[command(about = "Archive or trash stale labelled threads and mail a weekly summary.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.labelsweep/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the daily label sweep once
    Daily,

    /// Build, send and reset the weekly summary once
    Weekly,

    /// Show the run records collected since the last summary
    History,

    /// Show the configured label policies
    Policies,

    /// Show config, ledger and credential status
    Status,

    /// Run the daily and weekly jobs on their cron schedules
    Daemon,
}
