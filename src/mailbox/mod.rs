mod gmail;
mod memory;
mod traits;

pub use gmail::{DEFAULT_GMAIL_API_BASE, GmailMailbox, build_gmail_client};
pub use memory::{FailPoint, InMemoryMailbox, ThreadState};
pub use traits::{Label, Mailbox, MailboxFuture, ThreadRef};
