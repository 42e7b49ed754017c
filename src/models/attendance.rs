//! Attendance record model.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AttendanceId;

/// The outcome recorded for a staff member on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Present and on time.
    Present,
    /// Absent for the whole day.
    Absent,
    /// Clocked in after the scheduled start plus the grace threshold.
    Late,
    /// Worked part of the day.
    HalfDay,
    /// Covered by leave.
    OnLeave,
}

impl AttendanceStatus {
    /// Statuses that cannot coexist with a recorded clock-out.
    pub fn excludes_clock_out(self) -> bool {
        matches!(self, AttendanceStatus::Absent | AttendanceStatus::OnLeave)
    }

    /// The snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::OnLeave => "on_leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One staff member's attendance for one calendar day.
///
/// There is at most one record per `(staff_id, date)`. Records are never
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier.
    pub id: AttendanceId,
    /// The staff member.
    pub staff_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Clock-in time, if recorded.
    #[serde(default)]
    pub clock_in: Option<NaiveTime>,
    /// Clock-out time, if recorded.
    #[serde(default)]
    pub clock_out: Option<NaiveTime>,
    /// The day's outcome.
    pub status: AttendanceStatus,
    /// Hours between clock-in and clock-out, set on clock-out.
    #[serde(default)]
    pub total_hours: Option<Decimal>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl AttendanceRecord {
    /// Returns true if the record is for `staff_id` on `date`.
    pub fn is_for(&self, staff_id: &str, date: NaiveDate) -> bool {
        self.staff_id == staff_id && self.date == date
    }
}
