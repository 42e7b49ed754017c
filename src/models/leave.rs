//! Leave request model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::LeaveId;

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Earned (annual) leave.
    Earned,
    /// Unpaid leave.
    Unpaid,
}

/// Lifecycle state of a leave request.
///
/// `Pending` is the only state with outgoing transitions; `Approved` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by a manager.
    Approved,
    /// Rejected with a reason.
    Rejected,
}

impl LeaveStatus {
    /// Returns true if no further transition is allowed.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// The lowercase name used in messages and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for time off by a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: LeaveId,
    /// The staff member requesting leave.
    pub staff_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive calendar span of the request.
    pub days: u32,
    /// Why the leave is requested.
    #[serde(default)]
    pub reason: String,
    /// Current lifecycle state.
    pub status: LeaveStatus,
    /// The day the request was submitted.
    pub applied_date: NaiveDate,
    /// Who approved the request. Set only when approved.
    #[serde(default)]
    pub approved_by: Option<String>,
    /// When the request was approved. Set only when approved.
    #[serde(default)]
    pub approved_date: Option<NaiveDate>,
    /// Why the request was rejected. Set only when rejected.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl LeaveRequest {
    /// Returns true if `date` falls within the leave span.
    ///
    /// # Example
    ///
    /// ```
    /// use staff_ops_engine::models::{LeaveRequest, LeaveStatus, LeaveType};
    /// use chrono::NaiveDate;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
    /// let leave = LeaveRequest {
    ///     id: 1,
    ///     staff_id: "STF-01".to_string(),
    ///     leave_type: LeaveType::Sick,
    ///     start_date: d(15),
    ///     end_date: d(17),
    ///     days: 3,
    ///     reason: String::new(),
    ///     status: LeaveStatus::Pending,
    ///     applied_date: d(10),
    ///     approved_by: None,
    ///     approved_date: None,
    ///     rejection_reason: None,
    /// };
    /// assert!(leave.covers(d(17)));
    /// assert!(!leave.covers(d(18)));
    /// ```
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if this is approved leave covering `date` for `staff_id`.
    pub fn excludes(&self, staff_id: &str, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.staff_id == staff_id && self.covers(date)
    }
}

/// Inclusive number of calendar days between two dates.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    ((end - start).num_days() + 1).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    #[test]
    fn test_inclusive_days() {
        assert_eq!(inclusive_days(d(15), d(17)), 3);
        assert_eq!(inclusive_days(d(15), d(15)), 1);
    }

    #[test]
    fn test_inclusive_days_across_month_end() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(inclusive_days(start, end), 4);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!LeaveStatus::Pending.is_terminal());
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Approved).unwrap(),
            "\"approved\""
        );
        let leave_type: LeaveType = serde_json::from_str("\"earned\"").unwrap();
        assert_eq!(leave_type, LeaveType::Earned);
    }
}
