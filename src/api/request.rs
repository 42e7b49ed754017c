//! Request types for the Staff Operations API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! endpoints in [`handlers`](super::handlers).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::LeaveSubmission;
use crate::models::{
    AttendanceStatus, LeaveStatus, LeaveType, MonthKey, RoleId, SalaryComponents, ShiftId,
    StaffMember,
};

/// Request body for `POST /staff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStaffRequest {
    /// Caller-chosen staff id, e.g. "STF-01".
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional role reference.
    #[serde(default)]
    pub role_id: Option<RoleId>,
}

/// Request body for `POST /roles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    /// Role name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Permission keys to grant.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Request body for `POST /leave-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLeaveRequest {
    /// The staff member requesting leave.
    pub staff_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Why the leave is requested.
    #[serde(default)]
    pub reason: String,
    /// The day the request was made.
    pub applied_date: NaiveDate,
}

/// Request body for `POST /leave-requests/:id/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveLeaveRequest {
    /// Who approved the request.
    pub approver: String,
    /// The day of approval.
    pub approved_date: NaiveDate,
}

/// Request body for `POST /leave-requests/:id/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectLeaveRequest {
    /// Why the request was rejected.
    pub reason: String,
}

/// Query string for `GET /leave-requests`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveQuery {
    /// Only requests in this status.
    #[serde(default)]
    pub status: Option<LeaveStatus>,
}

/// Request body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    /// Template name.
    pub name: String,
    /// Daily start time.
    pub start_time: NaiveTime,
    /// Daily end time; at or before the start wraps past midnight.
    pub end_time: NaiveTime,
}

/// Request body for `POST /assignments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignShiftRequest {
    /// The staff member to place.
    pub staff_id: String,
    /// The template to place them on.
    pub shift_id: ShiftId,
    /// The shift date.
    pub date: NaiveDate,
}

/// Request body for `POST /assignments/roster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    /// First date to roster.
    pub start_date: NaiveDate,
    /// Last date to roster (inclusive).
    pub end_date: NaiveDate,
    /// Staff per template per date; the configured default when absent.
    #[serde(default)]
    pub headcount: Option<u32>,
}

/// Request body for `POST /assignments/:id/advance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// The instant to advance to.
    pub now: NaiveDateTime,
}

/// Query string for `GET /assignments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentQuery {
    /// Only assignments on this date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Only assignments for this staff member.
    #[serde(default)]
    pub staff_id: Option<String>,
}

/// Query string carrying "now".
#[derive(Debug, Clone, Deserialize)]
pub struct NowQuery {
    /// The instant to evaluate at.
    pub now: NaiveDateTime,
}

/// Request body for `POST /attendance/mark`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    /// The staff member.
    pub staff_id: String,
    /// The day.
    pub date: NaiveDate,
    /// The status to record.
    pub status: AttendanceStatus,
}

/// Request body for `POST /attendance/clock-in` and `/attendance/clock-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    /// The staff member.
    pub staff_id: String,
    /// The attendance day.
    pub date: NaiveDate,
    /// The clock time.
    pub time: NaiveTime,
}

/// Query string carrying a date.
#[derive(Debug, Clone, Deserialize)]
pub struct DateQuery {
    /// The day.
    pub date: NaiveDate,
}

/// Request body for `POST /payroll/slips`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlipRequest {
    /// The staff member.
    pub staff_id: String,
    /// The payroll month, "YYYY-MM".
    pub month: MonthKey,
    /// Basic salary.
    pub basic_salary: Decimal,
    /// House rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Provident fund deduction.
    #[serde(default)]
    pub pf: Decimal,
    /// Tax deduction.
    #[serde(default)]
    pub tax: Decimal,
    /// The day the slip is generated.
    pub generated_date: NaiveDate,
}

/// Query string for month-scoped listings and rollups.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    /// The month, "YYYY-MM".
    pub month: MonthKey,
}

/// Query string for month-scoped listings where the month is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionalMonthQuery {
    /// The month, "YYYY-MM".
    #[serde(default)]
    pub month: Option<MonthKey>,
}

/// Request body for `POST /commissions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCommissionRequest {
    /// The staff member.
    pub staff_id: String,
    /// Sales the commission is earned on.
    pub sales_amount: Decimal,
    /// Percentage rate, 0 to 100.
    pub commission_rate: Decimal,
    /// The month, "YYYY-MM".
    pub month: MonthKey,
}

/// Request body for `POST /commissions/:id/pay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayCommissionRequest {
    /// The day of payment.
    pub paid_date: NaiveDate,
}

impl From<AddStaffRequest> for StaffMember {
    fn from(req: AddStaffRequest) -> Self {
        StaffMember {
            id: req.id,
            name: req.name,
            role_id: req.role_id,
        }
    }
}

impl From<SubmitLeaveRequest> for LeaveSubmission {
    fn from(req: SubmitLeaveRequest) -> Self {
        LeaveSubmission {
            staff_id: req.staff_id,
            leave_type: req.leave_type,
            start_date: req.start_date,
            end_date: req.end_date,
            reason: req.reason,
        }
    }
}

impl From<&GenerateSlipRequest> for SalaryComponents {
    fn from(req: &GenerateSlipRequest) -> Self {
        SalaryComponents {
            basic_salary: req.basic_salary,
            hra: req.hra,
            bonus: req.bonus,
            pf: req.pf,
            tax: req.tax,
        }
    }
}
