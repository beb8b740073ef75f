use super::traits::MailSender;
use crate::config::{SmtpConfig, SmtpTlsMode};
use crate::error::MailError;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::future::Future;
use std::pin::Pin;

/// Delivers mail through an SMTP relay. The blocking lettre transport runs
/// on tokio's blocking pool.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    /// `from` is the envelope sender; see `Config::summary_sender`.
    pub fn from_config(config: &SmtpConfig, from: &str) -> Result<Self, MailError> {
        let builder = match config.tls {
            SmtpTlsMode::Plaintext => SmtpTransport::builder_dangerous(&config.host),
            SmtpTlsMode::StartTls => SmtpTransport::starttls_relay(&config.host)
                .map_err(|e| MailError::Build(format!("smtp starttls relay init failed: {e}")))?,
            SmtpTlsMode::Tls => SmtpTransport::relay(&config.host)
                .map_err(|e| MailError::Build(format!("smtp tls relay init failed: {e}")))?,
        };

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.to_string(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e| MailError::Address {
        address: address.to_string(),
        message: format!("{e}"),
    })
}

pub(crate) fn build_message(
    from: &str,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, MailError> {
    Message::builder()
        .from(parse_mailbox(from)?)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .body(body.to_string())
        .map_err(|e| MailError::Build(e.to_string()))
}

impl MailSender for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn send<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>> {
        Box::pin(async move {
            let message = build_message(&self.from, to, subject, body)?;
            let transport = self.transport.clone();
            let recipient = to.to_string();

            let outcome = tokio::task::spawn_blocking(move || transport.send(&message))
                .await
                .map_err(|e| MailError::Send {
                    to: recipient.clone(),
                    message: format!("send task failed: {e}"),
                })?;

            let response = outcome.map_err(|e| MailError::Send {
                to: recipient.clone(),
                message: e.to_string(),
            })?;
            tracing::debug!(to = %recipient, code = %response.code(), "Summary mail accepted");
            Ok(())
        })
    }
}
