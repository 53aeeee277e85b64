//! Working-hours checks: time format, shift ordering, overlaps and at least
//! one open day.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use super::result::{IssueCategory, ValidationResult};
use crate::onboarding::{DayHours, DayOfWeek};

const FIELD: &str = "workingHours";

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

pub const NO_OPEN_DAY: &str = "At least one day must be open";

/// Parse a strict `HH:mm` 24-hour time.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if !TIME_RE.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Validate a week of working hours. Only errors are produced.
///
/// Shifts on the same day may not overlap; touching shifts (one closes at
/// 12:00, the next opens at 12:00) are fine.
pub fn validate_working_hours_overlaps(days: &[DayHours]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for day in days.iter().filter(|d| d.is_open) {
        validate_day(day.day, day, &mut result);
    }

    if !days.iter().any(|d| d.is_open) {
        result.error(IssueCategory::WorkingHours, FIELD, NO_OPEN_DAY);
    }

    result
}

fn validate_day(day: DayOfWeek, hours: &DayHours, result: &mut ValidationResult) {
    let label = day.label();

    if hours.shifts.is_empty() {
        result.error(
            IssueCategory::WorkingHours,
            FIELD,
            format!("{label} is marked open but has no hours"),
        );
        return;
    }

    let mut valid: Vec<(usize, NaiveTime, NaiveTime)> = Vec::new();
    for (idx, shift) in hours.shifts.iter().enumerate() {
        let open = parse_time(&shift.open_time);
        let close = parse_time(&shift.close_time);
        if open.is_none() {
            result.error(
                IssueCategory::WorkingHours,
                FIELD,
                format!(
                    "{label}: opening time '{}' must be in HH:mm 24-hour format",
                    shift.open_time
                ),
            );
        }
        if close.is_none() {
            result.error(
                IssueCategory::WorkingHours,
                FIELD,
                format!(
                    "{label}: closing time '{}' must be in HH:mm 24-hour format",
                    shift.close_time
                ),
            );
        }
        let (Some(open), Some(close)) = (open, close) else {
            continue;
        };
        if open >= close {
            result.error(
                IssueCategory::WorkingHours,
                FIELD,
                format!("{label}: opening time must be before closing time"),
            );
            continue;
        }
        valid.push((idx, open, close));
    }

    for (i, a) in valid.iter().enumerate() {
        for b in &valid[i + 1..] {
            if a.1 < b.2 && b.1 < a.2 {
                result.error(
                    IssueCategory::WorkingHours,
                    FIELD,
                    format!("{label}: shifts {} and {} overlap", a.0 + 1, b.0 + 1),
                );
            }
        }
    }
}
