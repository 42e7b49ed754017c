//! KPI snapshots.
//!
//! Snapshots are pure aggregates recomputed on demand from the engine's
//! collections. They hold no state of their own and are never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MonthKey;

/// Sentinel reported as the current shift when no template is running.
pub const NO_CURRENT_SHIFT: &str = "none";

/// Attendance counts for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceKpi {
    /// The day the counts cover.
    pub date: NaiveDate,
    /// Records marked present.
    pub present: u32,
    /// Records marked absent.
    pub absent: u32,
    /// Records marked late.
    pub late: u32,
    /// Records marked half day.
    pub half_day: u32,
    /// Records marked on leave.
    pub on_leave: u32,
    /// Rostered staff with no record for the day.
    pub unmarked: u32,
}

/// Leave request counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveKpi {
    /// All requests.
    pub total: u32,
    /// Awaiting a decision.
    pub pending: u32,
    /// Approved.
    pub approved: u32,
    /// Rejected.
    pub rejected: u32,
    /// Days covered by approved requests.
    pub approved_days: u32,
}

/// Shift coverage at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftKpi {
    /// Templates with at least one active assignment covering "now".
    pub active_shifts: u32,
    /// Staff with an active assignment covering "now".
    pub on_duty: u32,
    /// Remaining staff.
    pub off_duty: u32,
    /// Name of the template running "now", or [`NO_CURRENT_SHIFT`].
    pub current_shift: String,
    /// Templates defined, active or not.
    pub total_templates: u32,
    /// Assignments dated today that are still scheduled.
    pub scheduled_today: u32,
}

/// Salary slip rollup for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryKpi {
    /// The month covered.
    pub month: MonthKey,
    /// Slips for the month.
    pub slips: u32,
    /// Slips still pending.
    pub pending: u32,
    /// Slips generated but not sent.
    pub generated: u32,
    /// Slips sent.
    pub sent: u32,
    /// Sum of gross salaries.
    pub total_gross: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Sum of net salaries.
    pub total_net: Decimal,
}

/// Commission rollup for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionKpi {
    /// The month covered.
    pub month: MonthKey,
    /// Commission records for the month.
    pub records: u32,
    /// Sum of all commission amounts.
    pub total_amount: Decimal,
    /// Sum of unpaid commission amounts.
    pub pending_amount: Decimal,
    /// Sum of paid commission amounts.
    pub paid_amount: Decimal,
}
