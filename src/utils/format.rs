// src/utils/format.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::AppError;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses a calendar date.
///
/// Accepts `YYYY-MM-DD`, `DD.MM.YYYY`, or any date-time understood by
/// [`parse_date_time`], in which case the time part is discarded.
pub fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    let input = input.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .map(Ok)
        .unwrap_or_else(|| parse_date_time(input).map(|dt| dt.date()))
}

/// Parses an ISO-8601 / RFC 3339 timestamp into wall-clock time.
///
/// A timestamp carrying an offset keeps the wall time of that offset.
/// A bare date is read as midnight.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, AppError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }

    if let Some(dt) = OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(input, fmt).ok())
    {
        return Ok(dt.naive_local());
    }

    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Ok(dt);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| AppError::DateParse(format!("Nieprawidłowy format daty: {}", input)))
}

/// `DD.MM.YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// `DD.MM.YYYY HH:MM:SS`
pub fn format_date_time(dt: NaiveDateTime) -> String {
    dt.format("%d.%m.%Y %H:%M:%S").to_string()
}

/// Seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `round(100 * score / total)`, or 0 when `total` is 0.
///
/// Rounds half away from zero and does not clamp: a score above the total
/// yields more than 100.
pub fn percentage(score: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (score as f64 * 100.0 / total as f64).round() as u64
}
