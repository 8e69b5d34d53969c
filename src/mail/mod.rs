// src/mail/mod.rs

//! Outbound notification email.
//!
//! [`Mailer`] abstracts the transport so handlers never touch lettre directly.
//! The backend is picked at startup from `MAIL_BACKEND`.

mod noop;
mod sendmail;
mod smtp;

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::{
    Mailbox, Message, MultiPart, MultiPartKind, SinglePart, header::ContentType,
};

use crate::config::{Config, MailBackend};

pub use noop::NoopMailer;
pub use sendmail::SendmailMailer;
pub use smtp::SmtpMailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    /// The message could not be assembled (bad address, bad header).
    Build(String),
    /// The transport refused or failed to deliver.
    Send(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Build(msg) => write!(f, "failed to build message: {}", msg),
            MailError::Send(msg) => write!(f, "failed to send message: {}", msg),
        }
    }
}

impl std::error::Error for MailError {}

/// A rendered notification, ready for any transport.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// MIME boundary separating the two alternatives.
    pub boundary: String,
}

impl EmailMessage {
    /// Builds the `multipart/alternative` MIME message: plain text first, then HTML.
    pub fn to_message(&self) -> Result<Message, MailError> {
        let from: Mailbox = parse_mailbox(&self.from, "sender")?;
        let reply_to: Mailbox = parse_mailbox(&self.reply_to, "reply-to")?;
        let to: Mailbox = parse_mailbox(&self.to, "recipient")?;

        Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(&self.subject)
            .multipart(
                MultiPart::builder()
                    .kind(MultiPartKind::Alternative)
                    .boundary(self.boundary.clone())
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(self.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(self.html_body.clone()),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

fn parse_mailbox(value: &str, role: &str) -> Result<Mailbox, MailError> {
    value
        .parse()
        .map_err(|e| MailError::Build(format!("invalid {} address '{}': {}", role, value, e)))
}

static BOUNDARY_SEQ: AtomicU64 = AtomicU64::new(0);

/// A boundary token derived from the current time.
/// The sequence suffix keeps two sends within the same nanosecond apart.
pub fn new_boundary() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let seq = BOUNDARY_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("elmar-{:x}-{:x}", nanos, seq)
}

/// Mail transport capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError>;
}

/// Selects the transport configured by `MAIL_BACKEND`.
pub fn from_config(config: &Config) -> Arc<dyn Mailer> {
    match config.mail_backend {
        MailBackend::Smtp => Arc::new(SmtpMailer::new(
            &config.smtp_host,
            config.smtp_port,
            config.smtp_username.clone().zip(config.smtp_password.clone()),
        )),
        MailBackend::Sendmail => Arc::new(SendmailMailer::new(config.sendmail_command.as_deref())),
        MailBackend::Noop => Arc::new(NoopMailer),
    }
}
