pub mod schema;

pub use schema::{
    Config, GmailConfig, ScheduleConfig, SmtpConfig, SmtpTlsMode, StoreConfig, SummaryConfig,
};
