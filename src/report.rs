// src/report.rs

//! Rendering of the training-completion report.
//!
//! The same [`TrainingReport`] feeds both the HTML and the plain-text template
//! so the two alternatives of the email never disagree. Templates are embedded
//! with `include_str!` and rendered by tera.

use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    error::AppError,
    models::submission::{Submission, WrongAnswer},
    utils::{
        format::{format_date, format_date_time, format_duration, percentage},
        html::escape_html,
    },
};

pub const ALL_CORRECT_MESSAGE: &str = "BRAK - wszystkie odpowiedzi poprawne!";

const TRAINING_TOPICS: [&str; 6] = [
    "Podstawa prawna szkolenia (Rozp. WE 852/2004)",
    "Zasady przechowywania ryb (temperatura 4°C)",
    "Wymogi zdrowotne pracowników",
    "Higiena rąk i odzież ochronna",
    "Czystość stanowiska pracy",
    "Zabronione praktyki w produkcji",
];

/// One wrong answer, escaped, with placeholders for absent fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrongLine {
    pub nr: String,
    pub user: String,
    pub correct: String,
}

impl From<&WrongAnswer> for WrongLine {
    fn from(item: &WrongAnswer) -> Self {
        Self {
            nr: item.nr_text().map_or_else(|| "?".to_string(), |v| escape_html(&v)),
            user: item.user_text().map_or_else(|| "brak".to_string(), |v| escape_html(&v)),
            correct: item.correct_text().map_or_else(|| "?".to_string(), |v| escape_html(&v)),
        }
    }
}

/// Display-ready values derived from a [`Submission`].
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub full_name: String,
    pub training_date: String,
    pub training_end_time: String,
    pub duration: String,
    pub score: u64,
    pub total: u64,
    pub percentage: u64,
    /// In input order.
    pub wrong: Vec<WrongLine>,
}

impl TrainingReport {
    pub fn new(submission: &Submission) -> Self {
        Self {
            full_name: submission.full_name(),
            training_date: format_date(submission.training_date),
            training_end_time: format_date_time(submission.training_end_time),
            duration: format_duration(submission.duration),
            score: submission.score,
            total: submission.total,
            percentage: percentage(submission.score, submission.total),
            wrong: submission.wrong.iter().map(WrongLine::from).collect(),
        }
    }
}

pub fn subject(submission: &Submission) -> String {
    format!("Szkolenie dla nowego pracownika - {}", submission.full_name())
}

/// Both bodies of one report email.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub html_body: String,
    pub text_body: String,
}

/// Wraps the tera engine holding the report templates.
///
/// `report.html` is autoescaped by tera; values that are already escaped
/// (names and wrong answers) are marked `safe` there. `report.txt` is not
/// autoescaped.
pub struct ReportRenderer {
    engine: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, AppError> {
        Self::with_templates(vec![
            ("report.html", include_str!("../templates/report.html")),
            ("report.txt", include_str!("../templates/report.txt")),
        ])
    }

    fn with_templates(templates: Vec<(&str, &str)>) -> Result<Self, AppError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(templates)
            .map_err(|e| AppError::InternalServerError(format!("template load failed: {}", e)))?;

        Ok(Self { engine })
    }

    pub fn render(&self, report: &TrainingReport) -> Result<RenderedReport, AppError> {
        let mut context = Context::from_serialize(report)
            .map_err(|e| AppError::InternalServerError(format!("template context failed: {}", e)))?;
        context.insert("all_correct", ALL_CORRECT_MESSAGE);
        context.insert("topics", &TRAINING_TOPICS);

        let html_body = self
            .engine
            .render("report.html", &context)
            .map_err(|e| AppError::InternalServerError(format!("report.html: {}", e)))?;

        let text_body = self
            .engine
            .render("report.txt", &context)
            .map_err(|e| AppError::InternalServerError(format!("report.txt: {}", e)))?;

        Ok(RenderedReport {
            html_body,
            text_body,
        })
    }
}
