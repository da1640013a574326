//! Deadline classification
//!
//! Maps a task's optional `YYYY-MM-DD` deadline to an urgency bucket by
//! whole-day distance from an explicit "today". Pure and total: no clock
//! access, no errors. Callers at the CLI/UI edge supply
//! `Local::now().date_naive()`; tests pin a fixed date.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format accepted for deadlines
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const COLOR_MUTED: &str = "#999";
const COLOR_DANGER: &str = "#e74c3c";
const COLOR_WARN: &str = "#f39c12";
const COLOR_OK: &str = "#27ae60";

/// Urgency bucket of a deadline relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlineBucket {
    /// No deadline set
    NoDeadline,
    /// Deadline is in the past
    Overdue,
    /// Deadline is today
    Today,
    /// Deadline is tomorrow
    Tomorrow,
    /// Deadline is within the next 3 days
    Soon,
    /// Deadline is more than 3 days away
    OnTime,
}

impl fmt::Display for DeadlineBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineBucket::NoDeadline => write!(f, "no-deadline"),
            DeadlineBucket::Overdue => write!(f, "overdue"),
            DeadlineBucket::Today => write!(f, "today"),
            DeadlineBucket::Tomorrow => write!(f, "tomorrow"),
            DeadlineBucket::Soon => write!(f, "soon"),
            DeadlineBucket::OnTime => write!(f, "on-time"),
        }
    }
}

/// Classification of one deadline: bucket plus display color and label
///
/// `color` and `label` are presentation hints; only `bucket` carries
/// behavioral meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineStatus {
    pub bucket: DeadlineBucket,
    pub color: &'static str,
    pub label: String,
}

impl DeadlineStatus {
    fn new(bucket: DeadlineBucket, color: &'static str, label: impl Into<String>) -> Self {
        Self {
            bucket,
            color,
            label: label.into(),
        }
    }
}

/// Parse a deadline string as a calendar date
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Whole calendar days from `today` to `deadline` (negative when past)
pub fn diff_days(deadline: NaiveDate, today: NaiveDate) -> i64 {
    deadline.signed_duration_since(today).num_days()
}

/// Classify a deadline relative to an explicit `today`
///
/// Absent and blank deadlines classify as `no-deadline`; so does a
/// non-empty string that is not a calendar date, so a malformed task
/// degrades to the neutral bucket instead of failing the render. Write
/// paths reject malformed dates before they are stored.
pub fn classify(deadline: Option<&str>, today: NaiveDate) -> DeadlineStatus {
    let raw = match deadline {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return DeadlineStatus::new(DeadlineBucket::NoDeadline, COLOR_MUTED, "no deadline"),
    };

    let date = match parse_deadline(raw) {
        Some(date) => date,
        None => return DeadlineStatus::new(DeadlineBucket::NoDeadline, COLOR_MUTED, "no deadline"),
    };

    let diff = diff_days(date, today);
    if diff < 0 {
        DeadlineStatus::new(DeadlineBucket::Overdue, COLOR_DANGER, "overdue")
    } else if diff == 0 {
        DeadlineStatus::new(DeadlineBucket::Today, COLOR_WARN, "due today")
    } else if diff == 1 {
        DeadlineStatus::new(DeadlineBucket::Tomorrow, COLOR_WARN, "due tomorrow")
    } else if diff <= 3 {
        DeadlineStatus::new(DeadlineBucket::Soon, COLOR_WARN, format!("in {diff}d"))
    } else {
        DeadlineStatus::new(DeadlineBucket::OnTime, COLOR_OK, format!("in {diff}d"))
    }
}
