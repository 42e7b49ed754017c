//! Core data models for the Staff Operations Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod kpi;
mod leave;
mod month;
mod payroll;
mod role;
mod shift;
mod staff;

/// Identifier of a [`Role`].
pub type RoleId = u64;
/// Identifier of a [`LeaveRequest`].
pub type LeaveId = u64;
/// Identifier of a [`ShiftTemplate`].
pub type ShiftId = u64;
/// Identifier of a [`ShiftAssignment`].
pub type AssignmentId = u64;
/// Identifier of an [`AttendanceRecord`].
pub type AttendanceId = u64;
/// Identifier of a [`SalarySlip`].
pub type SlipId = u64;
/// Identifier of a [`CommissionRecord`].
pub type CommissionId = u64;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use kpi::{AttendanceKpi, CommissionKpi, LeaveKpi, NO_CURRENT_SHIFT, SalaryKpi, ShiftKpi};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType, inclusive_days};
pub use month::MonthKey;
pub use payroll::{
    CommissionRecord, CommissionStatus, SalaryComponents, SalarySlip, SlipStatus, SlipTotals,
    commission_amount, round2,
};
pub use role::{PermissionCatalog, PermissionEntry, Role, RoleUpdate};
pub use shift::{
    AssignmentStatus, ShiftAssignment, ShiftTemplate, TemplateUpdate, decimal_hours,
    window_minutes, window_on,
};
pub use staff::StaffMember;
