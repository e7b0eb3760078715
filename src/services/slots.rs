//! Shared interval and time helpers. The availability engine and booking
//! admission must agree on the overlap predicate, so it lives here and
//! nowhere else.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::AppError;

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && b_start < a_end`. Touching endpoints do
/// not overlap.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Weekday index with 0 = Sunday, the convention stored on work schedules.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn parse_hhmm(s: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| AppError::Validation(format!("invalid time, expected HH:mm: {s}")))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date, expected YYYY-MM-DD: {s}")))
}
