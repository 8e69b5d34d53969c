//! Local `sendmail` transport, for hosts that deliver through the system MTA.

use async_trait::async_trait;
use lettre::{AsyncSendmailTransport, AsyncTransport, Tokio1Executor};

use super::{EmailMessage, MailError, Mailer};

pub struct SendmailMailer {
    transport: AsyncSendmailTransport<Tokio1Executor>,
}

impl SendmailMailer {
    /// Uses `command` instead of the `sendmail` found on `PATH` when given.
    pub fn new(command: Option<&str>) -> Self {
        let transport = match command {
            Some(command) => AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command),
            None => AsyncSendmailTransport::<Tokio1Executor>::new(),
        };

        Self { transport }
    }
}

#[async_trait]
impl Mailer for SendmailMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError> {
        let message = email.to_message()?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(format!("sendmail: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_send_error() {
        let mailer = SendmailMailer::new(Some("/nonexistent/sendmail-for-tests"));
        let email = EmailMessage {
            to: "kontakt@inovit.com.pl".to_string(),
            from: "szkolenia@inovit.com.pl".to_string(),
            reply_to: "kontakt@inovit.com.pl".to_string(),
            subject: "test".to_string(),
            text_body: "test".to_string(),
            html_body: "<p>test</p>".to_string(),
            boundary: "elmar-test".to_string(),
        };

        assert!(matches!(mailer.send(&email).await, Err(MailError::Send(_))));
    }
}
