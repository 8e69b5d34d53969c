// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

/// Which transport delivers the notification email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    /// Relay through an SMTP server.
    Smtp,
    /// Pipe the message into the local `sendmail` binary.
    Sendmail,
    /// Log the message and report success without delivering it.
    Noop,
}

impl FromStr for MailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailBackend::Smtp),
            "sendmail" => Ok(MailBackend::Sendmail),
            "noop" => Ok(MailBackend::Noop),
            other => Err(format!("unknown mail backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub rust_log: String,
    pub log_dir: String,
    pub audit_log_path: String,

    pub mail_backend: MailBackend,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub sendmail_command: Option<String>,

    /// Fixed recipient of every report.
    pub mail_to: String,
    /// Sender mailbox, e.g. `ELMAR Szkolenia <szkolenia@inovit.com.pl>`.
    pub mail_from: String,
    pub mail_reply_to: String,

    /// How long a request waits for the mail transport before answering with a
    /// dispatch failure. This bounds the response time; it does not cancel a
    /// send that a child process (sendmail) has already taken over.
    pub mail_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            audit_log_path: "training-logs.txt".to_string(),
            mail_backend: MailBackend::Sendmail,
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            smtp_username: None,
            smtp_password: None,
            sendmail_command: None,
            mail_to: "kontakt@inovit.com.pl".to_string(),
            mail_from: "ELMAR Szkolenia <szkolenia@inovit.com.pl>".to_string(),
            mail_reply_to: "kontakt@inovit.com.pl".to_string(),
            mail_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let mail_backend = match env::var("MAIL_BACKEND") {
            Ok(value) => value
                .parse::<MailBackend>()
                .expect("MAIL_BACKEND must be one of: smtp, sendmail, noop"),
            Err(_) => defaults.mail_backend,
        };

        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.smtp_port);

        let mail_timeout = env::var("MAIL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.mail_timeout);

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            audit_log_path: env::var("AUDIT_LOG_PATH").unwrap_or(defaults.audit_log_path),
            mail_backend,
            smtp_host: env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            sendmail_command: env::var("SENDMAIL_COMMAND").ok(),
            mail_to: env::var("MAIL_TO").unwrap_or(defaults.mail_to),
            mail_from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
            mail_reply_to: env::var("MAIL_REPLY_TO").unwrap_or(defaults.mail_reply_to),
            mail_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_backend_parse() {
        assert_eq!("smtp".parse::<MailBackend>(), Ok(MailBackend::Smtp));
        assert_eq!(" Sendmail ".parse::<MailBackend>(), Ok(MailBackend::Sendmail));
        assert_eq!("NOOP".parse::<MailBackend>(), Ok(MailBackend::Noop));
        assert!("carrier-pigeon".parse::<MailBackend>().is_err());
    }

    #[test]
    fn test_default_recipients() {
        let config = Config::default();
        assert_eq!(config.mail_to, "kontakt@inovit.com.pl");
        assert_eq!(config.mail_reply_to, "kontakt@inovit.com.pl");
        assert_eq!(config.mail_timeout, Duration::from_secs(30));
    }
}
