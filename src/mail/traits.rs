use crate::error::MailError;
use std::future::Future;
use std::pin::Pin;

/// Outbound plain-text mail used to deliver the weekly summary.
pub trait MailSender: Send + Sync {
    /// Transport identifier (e.g. "smtp", "capture").
    fn name(&self) -> &str;

    fn send<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;
}
