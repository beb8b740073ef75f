use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `labelsweep`.
///
/// Each collaborator boundary defines its own error variant. The jobs match
/// on these to decide whether a failure is contained at one policy entry or
/// aborts the run; the CLI glue continues to use `anyhow::Result`.
#[derive(Debug, Error)]
pub enum SweepError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Mailbox provider ─────────────────────────────────────────────────
    #[error("mailbox: {0}")]
    Mailbox(#[from] MailboxError),

    // ── Property store ───────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Ledger contents ──────────────────────────────────────────────────
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    // ── Summary delivery ─────────────────────────────────────────────────
    #[error("mail: {0}")]
    Mail(#[from] MailError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Mailbox errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("provider returned {status} for {endpoint}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("thread {thread_id} not found")]
    ThreadNotFound { thread_id: String },

    #[error("thread {thread_id} has no messages")]
    EmptyThread { thread_id: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend not available: {0}")]
    BackendUnavailable(String),

    #[error("sqlx: {0}")]
    Sqlx(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(err.to_string())
    }
}

// ─── Ledger errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("stored ledger is not valid JSON: {0}")]
    Corrupt(String),

    #[error("failed to encode ledger: {0}")]
    Encode(String),
}

// ─── Mail errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address}: {message}")]
    Address { address: String, message: String },

    #[error("message build failed: {0}")]
    Build(String),

    #[error("smtp send to {to} failed: {message}")]
    Send { to: String, message: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, SweepError>;
