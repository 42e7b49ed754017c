//! Shift template and shift assignment models.
//!
//! Templates describe a recurring daily window (e.g. "Lunch 11:00-15:00").
//! Assignments place one staff member on one template for one date, copying
//! the template's times so later template edits do not move existing shifts.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssignmentId, ShiftId};

/// Minutes covered by a daily window. Windows ending at or before their start
/// wrap past midnight.
pub fn window_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let minutes = (end - start).num_minutes();
    if minutes > 0 { minutes } else { minutes + 24 * 60 }
}

/// Converts whole minutes to decimal hours rounded to two places.
///
/// # Example
///
/// ```
/// use staff_ops_engine::models::decimal_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(decimal_hours(90), Decimal::new(150, 2));
/// assert_eq!(decimal_hours(20), Decimal::new(33, 2));
/// ```
pub fn decimal_hours(minutes: i64) -> Decimal {
    (Decimal::new(minutes, 0) / Decimal::new(60, 0)).round_dp(2)
}

/// The concrete `[start, end)` interval of a daily window on `date`.
pub fn window_on(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let begins = date.and_time(start);
    (begins, begins + Duration::minutes(window_minutes(start, end)))
}

/// A reusable shift definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    /// Unique identifier.
    pub id: ShiftId,
    /// Display name (e.g. "Breakfast").
    pub name: String,
    /// Daily start time.
    pub start_time: NaiveTime,
    /// Daily end time; may be earlier than `start_time` for overnight shifts.
    pub end_time: NaiveTime,
    /// Length of the shift in hours, derived from start and end.
    pub duration_hours: Decimal,
    /// Inactive templates keep their assignments but accept no new ones.
    pub is_active: bool,
}

impl ShiftTemplate {
    /// Creates an active template, deriving its duration.
    pub fn new(id: ShiftId, name: String, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id,
            name,
            start_time,
            end_time,
            duration_hours: decimal_hours(window_minutes(start_time, end_time)),
            is_active: true,
        }
    }

    /// Moves the template window and re-derives the duration.
    pub fn retime(&mut self, start_time: NaiveTime, end_time: NaiveTime) {
        self.start_time = start_time;
        self.end_time = end_time;
        self.duration_hours = decimal_hours(window_minutes(start_time, end_time));
    }

    /// Returns true if the window wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// Partial update for a shift template. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateUpdate {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New start time.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// New end time.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Re-enable or disable the template.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Lifecycle state of a shift assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Created, window not yet started.
    Scheduled,
    /// Window in progress.
    Active,
    /// Window finished.
    Completed,
    /// Window finished without a clock-in.
    Missed,
}

impl AssignmentStatus {
    /// Returns true if no further transition is allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Missed)
    }

    /// The snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Scheduled => "scheduled",
            AssignmentStatus::Active => "active",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Missed => "missed",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One staff member placed on one shift template for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// Unique identifier.
    pub id: AssignmentId,
    /// The assigned staff member.
    pub staff_id: String,
    /// The template this assignment was created from.
    pub shift_id: ShiftId,
    /// The working date.
    pub date: NaiveDate,
    /// Start time, copied from the template at creation.
    pub start_time: NaiveTime,
    /// End time, copied from the template at creation.
    pub end_time: NaiveTime,
    /// Lifecycle state.
    pub status: AssignmentStatus,
}

impl ShiftAssignment {
    /// The concrete `[start, end)` interval of this assignment.
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        window_on(self.date, self.start_time, self.end_time)
    }

    /// Returns true if this assignment's window overlaps `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let (own_start, own_end) = self.window();
        own_start < end && start < own_end
    }

    /// Returns true if `now` falls within the window.
    pub fn covers(&self, now: NaiveDateTime) -> bool {
        let (start, end) = self.window();
        now >= start && now < end
    }
}
