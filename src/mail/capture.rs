use super::traits::MailSender;
use crate::error::MailError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Keeps every message in memory instead of delivering it.
#[derive(Debug, Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail_with: Mutex<Option<String>>,
}

impl CapturingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following send fails with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.fail_with) = Some(message.into());
    }

    pub fn sent(&self) -> Vec<SentMail> {
        lock(&self.sent).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MailSender for CapturingMailer {
    fn name(&self) -> &str {
        "capture"
    }

    fn send<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>> {
        let result = match lock(&self.fail_with).clone() {
            Some(message) => Err(MailError::Send {
                to: to.to_string(),
                message,
            }),
            None => {
                lock(&self.sent).push(SentMail {
                    to: to.to_string(),
                    subject: subject.to_string(),
                    body: body.to_string(),
                });
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}
