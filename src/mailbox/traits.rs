use crate::error::MailboxError;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

pub type MailboxFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, MailboxError>> + Send + 'a>>;

/// A provider-side label. `name` is the full nested name, `id` whatever the
/// provider uses to address it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: String,
    pub name: String,
}

/// Handle to a conversation thread taken from a label snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadRef {
    pub id: String,
}

impl ThreadRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Mailbox operations the label processor needs.
///
/// Every mutating call is applied immediately by the provider; there is no
/// batching and no rollback.
pub trait Mailbox: Send + Sync {
    /// Provider identifier (e.g. "gmail", "memory").
    fn name(&self) -> &str;

    /// Exact, case-sensitive lookup by full label name.
    fn find_label<'a>(&'a self, name: &'a str) -> MailboxFuture<'a, Option<Label>>;

    /// Every thread currently carrying `label`, collected before returning.
    fn threads<'a>(&'a self, label: &'a Label) -> MailboxFuture<'a, Vec<ThreadRef>>;

    /// Time of the most recent message in the thread.
    fn last_activity<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, DateTime<Utc>>;

    /// Move the thread out of the inbox, keeping it in the mailbox.
    fn archive<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, ()>;

    /// Move the thread to the trash.
    fn trash<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, ()>;

    fn remove_label<'a>(&'a self, thread: &'a ThreadRef, label: &'a Label)
    -> MailboxFuture<'a, ()>;
}
