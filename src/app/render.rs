use crate::config::Config;
use crate::jobs::DailyReport;
use crate::ledger::RunRecord;
use crate::policy::PolicyTable;

pub fn render_daily(report: &DailyReport) -> String {
    let mut lines = Vec::with_capacity(report.entries.len());
    for entry in &report.entries {
        let mut line = format!(
            "{}: scanned={}, {}={}",
            entry.key,
            entry.scanned,
            entry.op.report_verb(),
            entry.acted
        );
        if let Some(error) = &entry.error {
            line.push_str(&format!(", error={error}"));
        }
        if let Some(record_error) = &entry.record_error {
            line.push_str(&format!(" (not recorded: {record_error})"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn render_history(runs: &[RunRecord]) -> String {
    if runs.is_empty() {
        return "No runs recorded since the last summary.".to_string();
    }
    runs.iter()
        .map(|run| {
            let mut line = format!(
                "{} {} [{} {}d {}] scanned={} acted={}",
                run.when.to_rfc3339(),
                run.action_key,
                run.label_name,
                run.days_old,
                run.op,
                run.scanned,
                run.acted
            );
            if run.is_error() {
                line.push_str(&format!(" error={}", run.error));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_policies(policies: &PolicyTable) -> String {
    policies
        .iter()
        .map(|p| {
            format!(
                "{}: {} after {} day(s) -> {}",
                p.key, p.label_name, p.age_threshold_days, p.op
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_status(config: &Config, recorded_runs: Option<usize>) -> String {
    let set_or_missing = |present: bool| if present { "set" } else { "missing" };
    let token_set = config
        .gmail
        .access_token
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());
    let recipient = if config.summary.recipient.trim().is_empty() {
        "(disabled)"
    } else {
        config.summary.recipient.as_str()
    };

    let lines = vec![
        format!("labelsweep {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        format!("Config:        {}", config.config_path.display()),
        format!("Ledger store:  {}", config.ledger_db_path().display()),
        format!(
            "Ledger runs:   {}",
            recorded_runs.map_or_else(|| "unreadable".to_string(), |n| n.to_string())
        ),
        format!("Policies:      {}", config.policies.len()),
        format!("Gmail token:   {}", set_or_missing(token_set)),
        format!("Summary to:    {recipient}"),
        format!(
            "SMTP relay:    {}:{} ({:?})",
            config.smtp.host, config.smtp.port, config.smtp.tls
        ),
        format!("Daily cron:    {}", config.schedule.daily),
        format!("Weekly cron:   {}", config.schedule.weekly),
    ];
    lines.join("\n")
}
