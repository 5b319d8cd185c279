//! Due-date arithmetic and urgency classification.
//!
//! Everything here is pure: callers pass "today" explicitly so results are
//! reproducible in tests and independent of the process clock.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Number of days before the due date during which a record is flagged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AlertWindow(pub u32);

impl AlertWindow {
    /// Window used by the name/date-only tracker.
    pub const MINIMAL: AlertWindow = AlertWindow(configs::MINIMAL_ALERT_WINDOW_DAYS);
    /// Window used once service types and fees are tracked.
    pub const EXTENDED: AlertWindow = AlertWindow(configs::EXTENDED_ALERT_WINDOW_DAYS);

    pub fn days(self) -> i64 { i64::from(self.0) }

    /// `0 <= days <= window`
    pub fn contains(self, days: i64) -> bool { (0..=self.days()).contains(&days) }
}

impl Default for AlertWindow {
    fn default() -> Self { Self::EXTENDED }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Overdue,
    Alert,
    Ok,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Overdue => "overdue",
            Severity::Alert => "alert",
            Severity::Ok => "ok",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Status {
    pub severity: Severity,
    pub label: String,
}

/// Whole days from `today` until `due`; negative once the date has passed.
///
/// Both sides are calendar dates (midnight), so the ceiling of the fractional
/// day difference is the plain day difference.
pub fn days_until_due(today: NaiveDate, due: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Same as [`days_until_due`] for a wall-clock instant; the time of day is dropped first.
pub fn days_until_due_at(now: NaiveDateTime, due: NaiveDate) -> i64 {
    days_until_due(now.date(), due)
}

fn day_word(n: i64) -> &'static str {
    if n == 1 { "day" } else { "days" }
}

pub fn classify(days: i64, window: AlertWindow) -> Status {
    let (severity, label) = if days < 0 {
        let elapsed = days.abs();
        (Severity::Overdue, format!("overdue {} {} ago", elapsed, day_word(elapsed)))
    } else if days == 0 {
        (Severity::Alert, "due today".to_string())
    } else if days <= window.days() {
        (Severity::Alert, format!("due in {} {}", days, day_word(days)))
    } else {
        (Severity::Ok, "up to date".to_string())
    };
    Status { severity, label }
}

/// `classify(days_until_due(today, due), window)`
pub fn status_for(today: NaiveDate, due: NaiveDate, window: AlertWindow) -> Status {
    classify(days_until_due(today, due), window)
}
