use crate::app::Sweeper;
use crate::app::render::{render_daily, render_history, render_policies, render_status};
use crate::cli::Commands;
use crate::config::Config;
use crate::ledger::Ledger;
use anyhow::Result;
use chrono::Utc;
use tracing::info;

pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Policies => {
            println!("{}", render_policies(&config.policy_table()?));
            Ok(())
        }

        Commands::History => {
            let ledger = Ledger::new(super::open_store(&config).await?);
            println!("{}", render_history(&ledger.load().await?));
            Ok(())
        }

        Commands::Status => {
            let recorded = match super::open_store(&config).await {
                Ok(store) => Ledger::new(store).load().await.ok().map(|runs| runs.len()),
                Err(_) => None,
            };
            println!("{}", render_status(&config, recorded));
            Ok(())
        }

        Commands::Daily => {
            let sweeper = Sweeper::from_config(&config).await?;
            let report = sweeper.run_daily(Utc::now()).await;
            println!("{}", render_daily(&report));
            if report.unrecorded_entries() > 0 {
                anyhow::bail!(
                    "{} run record(s) could not be written to the ledger",
                    report.unrecorded_entries()
                );
            }
            Ok(())
        }

        Commands::Weekly => {
            let sweeper = Sweeper::from_config(&config).await?;
            let summary = sweeper.run_weekly(Utc::now()).await?;
            println!("{}", summary.body);
            Ok(())
        }

        Commands::Daemon => {
            let sweeper = Sweeper::from_config(&config).await?;
            info!(
                daily = %config.schedule.daily,
                weekly = %config.schedule.weekly,
                "Starting labelsweep daemon"
            );
            crate::scheduler::run(&sweeper, &config.schedule).await
        }
    }
}
