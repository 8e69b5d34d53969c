//! Transport that only logs. For local development without a mail relay.

use async_trait::async_trait;

use super::{EmailMessage, MailError, Mailer};

#[derive(Debug, Clone)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError> {
        // Still build the message so address errors show up during development.
        email.to_message()?;
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Noop mailer: skipping delivery"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_succeeds() {
        let email = EmailMessage {
            to: "kontakt@inovit.com.pl".to_string(),
            from: "ELMAR Szkolenia <szkolenia@inovit.com.pl>".to_string(),
            reply_to: "kontakt@inovit.com.pl".to_string(),
            subject: "Szkolenie dla nowego pracownika - Jan Kowalski".to_string(),
            text_body: "test".to_string(),
            html_body: "<p>test</p>".to_string(),
            boundary: crate::mail::new_boundary(),
        };

        assert!(NoopMailer.send(&email).await.is_ok());
    }
}
