use crate::error::ConfigError;
use crate::mailbox::DEFAULT_GMAIL_API_BASE;
use crate::policy::{PolicyEntry, PolicyTable, default_policies};
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".labelsweep";

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Directory holding runtime state - computed at load time, not serialized
    #[serde(skip)]
    pub state_dir: PathBuf,

    /// Label → disposition table, applied in order
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyEntry>,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub gmail: GmailConfig,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

// ── Weekly summary ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Address the weekly summary is sent to
    #[serde(default)]
    pub recipient: String,
}

// ── Gmail API ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailConfig {
    #[serde(default = "default_gmail_api_base")]
    pub api_base: String,
    /// OAuth access token with the gmail.modify scope
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_gmail_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_gmail_api_base() -> String {
    DEFAULT_GMAIL_API_BASE.into()
}

fn default_gmail_timeout_secs() -> u64 {
    60
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            api_base: default_gmail_api_base(),
            access_token: None,
            timeout_secs: default_gmail_timeout_secs(),
        }
    }
}

// ── SMTP delivery ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTlsMode {
    Tls,
    #[default]
    StartTls,
    Plaintext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub tls: SmtpTlsMode,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Sender address; falls back to the summary recipient when empty
    #[serde(default)]
    pub from: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            tls: SmtpTlsMode::default(),
            username: None,
            password: None,
            from: String::new(),
        }
    }
}

// ── Ledger store ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file for the run ledger (default: <state_dir>/state.db). `~` is expanded.
    #[serde(default)]
    pub path: Option<String>,
}

// ── Daemon schedule ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression (UTC) for the daily sweep
    #[serde(default = "default_daily_schedule")]
    pub daily: String,
    /// Cron expression (UTC) for the weekly summary
    #[serde(default = "default_weekly_schedule")]
    pub weekly: String,
}

fn default_daily_schedule() -> String {
    "0 6 * * *".into()
}

fn default_weekly_schedule() -> String {
    "0 7 * * Mon".into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily: default_daily_schedule(),
            weekly: default_weekly_schedule(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let app_dir = home.join(APP_DIR);

        Self {
            config_path: app_dir.join("config.toml"),
            state_dir: app_dir.join("state"),
            policies: default_policies(),
            summary: SummaryConfig::default(),
            gmail: GmailConfig::default(),
            smtp: SmtpConfig::default(),
            store: StoreConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_at(&home.join(APP_DIR).join("config.toml"))
    }

    /// Loads `config_path`, writing a default config there first if it does not exist.
    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        let app_dir = config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let state_dir = app_dir.join("state");

        fs::create_dir_all(&state_dir)
            .with_context(|| format!("Failed to create {}", state_dir.display()))?;

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed paths that are skipped during serialization
            config.config_path = config_path.to_path_buf();
            config.state_dir = state_dir;
            config
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                state_dir,
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("LABELSWEEP_GMAIL_TOKEN") {
            if !token.is_empty() {
                self.gmail.access_token = Some(token);
            }
        }

        if let Ok(password) = std::env::var("LABELSWEEP_SMTP_PASSWORD") {
            if !password.is_empty() {
                self.smtp.password = Some(password);
            }
        }

        if let Ok(recipient) = std::env::var("LABELSWEEP_SUMMARY_TO") {
            if !recipient.is_empty() {
                self.summary.recipient = recipient;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy_table()?;
        for (name, expression) in [
            ("daily", &self.schedule.daily),
            ("weekly", &self.schedule.weekly),
        ] {
            crate::scheduler::parse_schedule(expression).map_err(|e| {
                ConfigError::Validation(format!("schedule.{name}: {e:#}"))
            })?;
        }
        Ok(())
    }

    pub fn policy_table(&self) -> Result<PolicyTable, ConfigError> {
        PolicyTable::new(self.policies.clone())
    }

    /// SQLite file backing the run ledger.
    pub fn ledger_db_path(&self) -> PathBuf {
        match self.store.path.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => PathBuf::from(shellexpand::tilde(raw).into_owned()),
            _ => self.state_dir.join("state.db"),
        }
    }

    /// Sender address for the weekly summary.
    pub fn summary_sender(&self) -> &str {
        if self.smtp.from.trim().is_empty() {
            &self.summary.recipient
        } else {
            &self.smtp.from
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
