// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::{
    mail::MailError,
    models::response::{ErrorResponse, json_utf8},
};

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Metoda niedozwolona. Użyj POST.";
pub const MISSING_FIELDS_MESSAGE: &str =
    "Brak wymaganych danych (firstName, lastName, trainingDate)";
pub const MAIL_DISPATCH_MESSAGE: &str = "Błąd wysyłania emaila";

/// Global Application Error Enum.
/// Every variant is terminal for the request and maps to one status and one JSON body.
#[derive(Debug)]
pub enum AppError {
    // 405 Method Not Allowed
    MethodNotAllowed,

    // 400 Bad Request (missing fields, malformed JSON, negative numbers)
    BadRequest(String),

    // 500, the submitted date could not be parsed
    DateParse(String),

    // 500, the email was rendered but not delivered
    MailDispatch(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a `{success: false, error}` JSON response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            ),
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected submission: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::DateParse(msg) => {
                tracing::warn!("Unparseable date in submission: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::MailDispatch(msg) => {
                tracing::error!("Mail dispatch failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    MAIL_DISPATCH_MESSAGE.to_string(),
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        json_utf8(status, &ErrorResponse::new(error_message))
    }
}

/// Malformed or mistyped JSON bodies are the caller's fault.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("Nieprawidłowe dane JSON: {}", err))
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::MailDispatch(err.to_string())
    }
}
