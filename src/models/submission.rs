// src/models/submission.rs

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, MISSING_FIELDS_MESSAGE},
    utils::{
        format::{parse_date, parse_date_time},
        html::sanitize,
    },
};

pub const DEFAULT_TOTAL: u64 = 12;

/// DTO for a training-completion report, as posted by the training page.
///
/// Every field is optional at this level so that missing required fields
/// can be reported together instead of failing on the first one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub training_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_int")]
    #[validate(range(min = 0, message = "score must not be negative"))]
    pub score: Option<i64>,

    #[serde(default, deserialize_with = "lenient_int")]
    #[validate(range(min = 0, message = "total must not be negative"))]
    pub total: Option<i64>,

    /// Seconds spent on the training.
    #[serde(default, deserialize_with = "lenient_int")]
    #[validate(range(min = 0, message = "duration must not be negative"))]
    pub duration: Option<i64>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub training_end_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_wrong")]
    pub wrong: Option<Vec<WrongAnswer>>,
}

/// One incorrectly answered question.
/// Sub-fields are free-form JSON scalars; absent ones render as placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrongAnswer {
    pub nr: Option<Value>,
    pub user: Option<Value>,
    pub correct: Option<Value>,
}

impl WrongAnswer {
    pub fn nr_text(&self) -> Option<String> {
        self.nr.as_ref().and_then(scalar_text)
    }

    pub fn user_text(&self) -> Option<String> {
        self.user.as_ref().and_then(scalar_text)
    }

    pub fn correct_text(&self) -> Option<String> {
        self.correct.as_ref().and_then(scalar_text)
    }
}

/// A validated submission, with names already trimmed and HTML-escaped.
#[derive(Debug, Clone)]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub training_date: NaiveDate,
    pub score: u64,
    pub total: u64,
    pub duration: u64,
    pub training_end_time: NaiveDateTime,
    pub wrong: Vec<WrongAnswer>,
}

impl Submission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TryFrom<SubmissionRequest> for Submission {
    type Error = AppError;

    fn try_from(req: SubmissionRequest) -> Result<Self, Self::Error> {
        let first_name = non_blank(req.first_name.as_deref());
        let last_name = non_blank(req.last_name.as_deref());
        let training_date = non_blank(req.training_date.as_deref());

        let (Some(first_name), Some(last_name), Some(training_date)) =
            (first_name, last_name, training_date)
        else {
            return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        };

        if let Err(validation_errors) = req.validate() {
            return Err(AppError::BadRequest(validation_errors.to_string()));
        }

        let training_date = parse_date(training_date)?;
        let training_end_time = match req.training_end_time.as_deref() {
            Some(end) => parse_date_time(end)?,
            None => Local::now().naive_local(),
        };

        Ok(Self {
            first_name: sanitize(first_name),
            last_name: sanitize(last_name),
            training_date,
            score: req.score.map_or(0, |v| v as u64),
            total: req.total.map_or(DEFAULT_TOTAL, |v| v as u64),
            duration: req.duration.map_or(0, |v| v as u64),
            training_end_time,
            wrong: req.wrong.unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Display text of a JSON scalar; `null` and containers have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Accepts strings and other scalars as text; `null` counts as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value @ (Value::Array(_) | Value::Object(_))) => Err(de::Error::custom(format!(
            "expected a string, found {}",
            value
        ))),
        Some(value) => Ok(scalar_text(&value)),
    }
}

/// Accepts an array of answers or an object whose values are answers.
/// Items that are not objects become answers with every field absent;
/// a scalar in place of the list counts as no list.
fn lenient_wrong<'de, D>(deserializer: D) -> Result<Option<Vec<WrongAnswer>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Value> = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        _ => return Ok(None),
    };

    Ok(Some(items.into_iter().map(wrong_answer).collect()))
}

fn wrong_answer(item: Value) -> WrongAnswer {
    match item {
        Value::Object(mut map) => WrongAnswer {
            nr: map.remove("nr").filter(|v| !v.is_null()),
            user: map.remove("user").filter(|v| !v.is_null()),
            correct: map.remove("correct").filter(|v| !v.is_null()),
        },
        _ => WrongAnswer::default(),
    }
}

/// Accepts integers, floats (truncated) and numeric strings.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid integer: {}", n))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid integer: {:?}", s)))
        }
        Some(other) => Err(de::Error::custom(format!(
            "expected an integer, found {}",
            other
        ))),
    }
}
