use super::traits::{Label, Mailbox, MailboxFuture, ThreadRef};
use crate::error::MailboxError;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mailbox-side state of one fake thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadState {
    pub last_activity: DateTime<Utc>,
    pub labels: BTreeSet<String>,
    pub in_inbox: bool,
    pub trashed: bool,
}

/// Call that can be made to fail for a given thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    LastActivity,
    Archive,
    Trash,
    RemoveLabel,
}

#[derive(Debug, Default)]
struct Inner {
    labels: Vec<Label>,
    // insertion order is the snapshot order
    order: Vec<String>,
    threads: HashMap<String, ThreadState>,
    failures: HashSet<(String, FailPoint)>,
}

/// In-process mailbox used by tests and dry runs.
///
/// Labels are addressed by name; the label id is the name itself.
#[derive(Debug, Default)]
pub struct InMemoryMailbox {
    inner: Mutex<Inner>,
}

impl InMemoryMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_label(&self, name: &str) -> Label {
        let mut inner = self.inner();
        if let Some(existing) = inner.labels.iter().find(|l| l.name == name) {
            return existing.clone();
        }
        let label = Label {
            id: name.to_string(),
            name: name.to_string(),
        };
        inner.labels.push(label.clone());
        label
    }

    /// Adds an inbox thread carrying `labels`. Unknown labels are created.
    pub fn add_thread(
        &self,
        id: &str,
        last_activity: DateTime<Utc>,
        labels: &[&str],
    ) -> ThreadRef {
        for name in labels {
            self.add_label(name);
        }
        let mut inner = self.inner();
        if !inner.threads.contains_key(id) {
            inner.order.push(id.to_string());
        }
        inner.threads.insert(
            id.to_string(),
            ThreadState {
                last_activity,
                labels: labels.iter().map(|l| (*l).to_string()).collect(),
                in_inbox: true,
                trashed: false,
            },
        );
        ThreadRef::new(id)
    }

    pub fn fail_on(&self, thread_id: &str, point: FailPoint) {
        self.inner().failures.insert((thread_id.to_string(), point));
    }

    pub fn thread(&self, id: &str) -> Option<ThreadState> {
        self.inner().threads.get(id).cloned()
    }

    fn check(
        inner: &Inner,
        thread: &ThreadRef,
        point: FailPoint,
    ) -> Result<(), MailboxError> {
        if inner.failures.contains(&(thread.id.clone(), point)) {
            return Err(MailboxError::Request {
                endpoint: format!("memory/{}/{point:?}", thread.id),
                message: "injected failure".into(),
            });
        }
        if !inner.threads.contains_key(&thread.id) {
            return Err(MailboxError::ThreadNotFound {
                thread_id: thread.id.clone(),
            });
        }
        Ok(())
    }

    fn mutate(
        &self,
        thread: &ThreadRef,
        point: FailPoint,
        apply: impl FnOnce(&mut ThreadState),
    ) -> Result<(), MailboxError> {
        let mut inner = self.inner();
        Self::check(&inner, thread, point)?;
        if let Some(state) = inner.threads.get_mut(&thread.id) {
            apply(state);
        }
        Ok(())
    }
}

impl Mailbox for InMemoryMailbox {
    fn name(&self) -> &str {
        "memory"
    }

    fn find_label<'a>(&'a self, name: &'a str) -> MailboxFuture<'a, Option<Label>> {
        let found = self.inner().labels.iter().find(|l| l.name == name).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn threads<'a>(&'a self, label: &'a Label) -> MailboxFuture<'a, Vec<ThreadRef>> {
        let inner = self.inner();
        let snapshot: Vec<ThreadRef> = inner
            .order
            .iter()
            .filter(|id| {
                inner
                    .threads
                    .get(*id)
                    .is_some_and(|t| t.labels.contains(&label.id))
            })
            .map(ThreadRef::new)
            .collect();
        drop(inner);
        Box::pin(async move { Ok(snapshot) })
    }

    fn last_activity<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, DateTime<Utc>> {
        let inner = self.inner();
        let result = Self::check(&inner, thread, FailPoint::LastActivity)
            .map(|()| inner.threads[&thread.id].last_activity);
        drop(inner);
        Box::pin(async move { result })
    }

    fn archive<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, ()> {
        let result = self.mutate(thread, FailPoint::Archive, |t| t.in_inbox = false);
        Box::pin(async move { result })
    }

    fn trash<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, ()> {
        let result = self.mutate(thread, FailPoint::Trash, |t| {
            t.in_inbox = false;
            t.trashed = true;
        });
        Box::pin(async move { result })
    }

    fn remove_label<'a>(
        &'a self,
        thread: &'a ThreadRef,
        label: &'a Label,
    ) -> MailboxFuture<'a, ()> {
        let result = self.mutate(thread, FailPoint::RemoveLabel, |t| {
            t.labels.remove(&label.id);
        });
        Box::pin(async move { result })
    }
}
