mod capture;
mod smtp;
mod traits;

pub use capture::{CapturingMailer, SentMail};
pub use smtp::SmtpMailer;
pub use traits::MailSender;
