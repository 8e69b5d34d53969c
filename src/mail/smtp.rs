//! SMTP transport.
//!
//! Wraps lettre's `AsyncSmtpTransport`. Connects without TLS, which suits a
//! relay on localhost or inside the same network.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    transport::smtp::authentication::Credentials,
};

use super::{EmailMessage, MailError, Mailer};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// `credentials` is `(username, password)` for relays that require AUTH.
    pub fn new(host: &str, port: u16, credentials: Option<(String, String)>) -> Self {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Self {
            transport: builder.build(),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError> {
        let message = email.to_message()?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(format!("SMTP: {}", e)))?;

        Ok(())
    }
}
