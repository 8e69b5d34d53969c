// src/handlers/notify.rs

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Local;

use crate::{
    audit::{AuditLog, LogRecord},
    config::Config,
    error::AppError,
    mail::{self, EmailMessage, Mailer},
    models::{
        response::SuccessResponse,
        submission::{Submission, SubmissionRequest},
    },
    report::{self, ReportRenderer, TrainingReport},
};

pub const SENT_MESSAGE: &str = "Email wysłany pomyślnie";

/// Accepts a training-completion report and emails it.
///
/// * Parses the JSON body by hand so malformed input still gets a JSON error.
/// * Renders the HTML and plain-text report and sends one email.
/// * Appends one line to the training log, only after a successful send.
///
/// No retries: a failed or timed-out dispatch is returned to the caller as-is.
pub async fn submit_report(
    State(config): State<Config>,
    State(mailer): State<Arc<dyn Mailer>>,
    State(audit_log): State<Arc<dyn AuditLog>>,
    State(renderer): State<Arc<ReportRenderer>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request: SubmissionRequest = serde_json::from_slice(&body)?;
    let submission = Submission::try_from(request)?;
    let report = TrainingReport::new(&submission);
    let rendered = renderer.render(&report)?;

    let email = EmailMessage {
        to: config.mail_to.clone(),
        from: config.mail_from.clone(),
        reply_to: config.mail_reply_to.clone(),
        subject: report::subject(&submission),
        text_body: rendered.text_body,
        html_body: rendered.html_body,
        boundary: mail::new_boundary(),
    };

    // Bounds the response time only. A transport that already handed the
    // message to an external process (sendmail) may still deliver it.
    match tokio::time::timeout(config.mail_timeout, mailer.send(&email)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(AppError::MailDispatch(format!(
                "no response from mail transport within {:?}",
                config.mail_timeout
            )));
        }
    }

    tracing::info!(
        name = %report.full_name,
        score = report.score,
        total = report.total,
        "Training report sent"
    );

    let record = LogRecord::new(Local::now().naive_local(), &submission, &report);
    if let Err(e) = audit_log.append(&record.to_line()).await {
        // The email already went out; the caller still gets a success.
        tracing::error!("Failed to append training log entry: {:?}", e);
    }

    Ok(SuccessResponse::new(SENT_MESSAGE))
}

/// CORS pre-flight. Nothing in the request is read.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
