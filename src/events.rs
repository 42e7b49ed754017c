//! Engine events and the notification boundary.
//!
//! Every successful state change on [`StaffOpsEngine`](crate::engine::StaffOpsEngine)
//! emits one [`EngineEvent`]; every rejected operation emits
//! [`EngineEvent::OperationRejected`]. Listeners are registered with
//! `StaffOpsEngine::subscribe` and called synchronously, in registration
//! order, after the state change has been applied.
//!
//! ```text
//! StaffOpsEngine operation
//!        |
//!        v
//! EngineEvent --> EventListener (any Fn(&EngineEvent))
//!                 NotifierBridge --> Notifier::notify(message, severity)
//! ```

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AssignmentId, AssignmentStatus, AttendanceStatus, CommissionId, LeaveId, MonthKey, RoleId,
    ShiftId, SlipId,
};

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Routine confirmation.
    Info,
    /// Succeeded, but needs attention.
    Warning,
    /// The operation was rejected.
    Error,
}

/// A state change, or a rejected attempt at one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EngineEvent {
    StaffAdded {
        staff_id: String,
    },
    RoleCreated {
        role_id: RoleId,
        name: String,
    },
    RoleUpdated {
        role_id: RoleId,
    },
    /// `orphaned_staff` lists staff still referencing the deleted role.
    RoleDeleted {
        role_id: RoleId,
        orphaned_staff: Vec<String>,
    },
    PermissionToggled {
        role_id: RoleId,
        key: String,
        granted: bool,
    },
    LeaveSubmitted {
        leave_id: LeaveId,
        staff_id: String,
        days: u32,
    },
    LeaveApproved {
        leave_id: LeaveId,
        staff_id: String,
        approver: String,
    },
    LeaveRejected {
        leave_id: LeaveId,
        staff_id: String,
    },
    TemplateCreated {
        shift_id: ShiftId,
        name: String,
    },
    TemplateUpdated {
        shift_id: ShiftId,
    },
    TemplateDeactivated {
        shift_id: ShiftId,
    },
    ShiftAssigned {
        assignment_id: AssignmentId,
        staff_id: String,
        date: NaiveDate,
    },
    RosterGenerated {
        created: usize,
        shortfalls: usize,
    },
    AssignmentAdvanced {
        assignment_id: AssignmentId,
        from: AssignmentStatus,
        to: AssignmentStatus,
    },
    AttendanceMarked {
        staff_id: String,
        date: NaiveDate,
        status: AttendanceStatus,
    },
    ClockedIn {
        staff_id: String,
        date: NaiveDate,
        time: NaiveTime,
    },
    ClockedOut {
        staff_id: String,
        date: NaiveDate,
        total_hours: Decimal,
        status: AttendanceStatus,
    },
    SlipGenerated {
        slip_id: SlipId,
        staff_id: String,
        month: MonthKey,
        net_salary: Decimal,
    },
    SlipSent {
        slip_id: SlipId,
    },
    CommissionRecorded {
        commission_id: CommissionId,
        staff_id: String,
        amount: Decimal,
    },
    CommissionPaid {
        commission_id: CommissionId,
    },
    /// An operation failed; no state was changed.
    OperationRejected {
        operation: String,
        error: String,
    },
}

impl EngineEvent {
    /// The severity a notifier should present this event with.
    pub fn severity(&self) -> Severity {
        match self {
            EngineEvent::OperationRejected { .. } => Severity::Error,
            EngineEvent::RoleDeleted { orphaned_staff, .. } if !orphaned_staff.is_empty() => {
                Severity::Warning
            }
            EngineEvent::RosterGenerated { shortfalls, .. } if *shortfalls > 0 => Severity::Warning,
            EngineEvent::AssignmentAdvanced {
                to: AssignmentStatus::Missed,
                ..
            } => Severity::Warning,
            EngineEvent::ClockedOut {
                status: AttendanceStatus::Late,
                ..
            } => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEvent::StaffAdded { staff_id } => write!(f, "Staff {} added", staff_id),
            EngineEvent::RoleCreated { role_id, name } => {
                write!(f, "Role '{}' created with id {}", name, role_id)
            }
            EngineEvent::RoleUpdated { role_id } => write!(f, "Role {} updated", role_id),
            EngineEvent::RoleDeleted {
                role_id,
                orphaned_staff,
            } => {
                if orphaned_staff.is_empty() {
                    write!(f, "Role {} deleted", role_id)
                } else {
                    write!(
                        f,
                        "Role {} deleted; still referenced by {}",
                        role_id,
                        orphaned_staff.join(", ")
                    )
                }
            }
            EngineEvent::PermissionToggled {
                role_id,
                key,
                granted,
            } => {
                let verb = if *granted { "granted to" } else { "revoked from" };
                write!(f, "Permission {} {} role {}", key, verb, role_id)
            }
            EngineEvent::LeaveSubmitted {
                leave_id,
                staff_id,
                days,
            } => write!(
                f,
                "Leave request {} submitted for {} ({} days)",
                leave_id, staff_id, days
            ),
            EngineEvent::LeaveApproved {
                leave_id,
                staff_id,
                approver,
            } => write!(
                f,
                "Leave request {} for {} approved by {}",
                leave_id, staff_id, approver
            ),
            EngineEvent::LeaveRejected { leave_id, staff_id } => {
                write!(f, "Leave request {} for {} rejected", leave_id, staff_id)
            }
            EngineEvent::TemplateCreated { shift_id, name } => {
                write!(f, "Shift template '{}' created with id {}", name, shift_id)
            }
            EngineEvent::TemplateUpdated { shift_id } => {
                write!(f, "Shift template {} updated", shift_id)
            }
            EngineEvent::TemplateDeactivated { shift_id } => {
                write!(f, "Shift template {} deactivated", shift_id)
            }
            EngineEvent::ShiftAssigned {
                assignment_id,
                staff_id,
                date,
            } => write!(
                f,
                "Assignment {} created for {} on {}",
                assignment_id, staff_id, date
            ),
            EngineEvent::RosterGenerated {
                created,
                shortfalls,
            } => write!(
                f,
                "Roster generated: {} assignments, {} short slots",
                created, shortfalls
            ),
            EngineEvent::AssignmentAdvanced {
                assignment_id,
                from,
                to,
            } => write!(f, "Assignment {} moved from {} to {}", assignment_id, from, to),
            EngineEvent::AttendanceMarked {
                staff_id,
                date,
                status,
            } => write!(f, "{} marked {} on {}", staff_id, status, date),
            EngineEvent::ClockedIn {
                staff_id,
                date,
                time,
            } => write!(f, "{} clocked in at {} on {}", staff_id, time, date),
            EngineEvent::ClockedOut {
                staff_id,
                date,
                total_hours,
                status,
            } => write!(
                f,
                "{} clocked out on {} after {} hours ({})",
                staff_id, date, total_hours, status
            ),
            EngineEvent::SlipGenerated {
                slip_id,
                staff_id,
                month,
                net_salary,
            } => write!(
                f,
                "Salary slip {} generated for {} ({}): net {}",
                slip_id, staff_id, month, net_salary
            ),
            EngineEvent::SlipSent { slip_id } => write!(f, "Salary slip {} sent", slip_id),
            EngineEvent::CommissionRecorded {
                commission_id,
                staff_id,
                amount,
            } => write!(
                f,
                "Commission {} of {} recorded for {}",
                commission_id, amount, staff_id
            ),
            EngineEvent::CommissionPaid { commission_id } => {
                write!(f, "Commission {} paid", commission_id)
            }
            EngineEvent::OperationRejected { operation, error } => {
                write!(f, "Failed to {}: {}", operation, error)
            }
        }
    }
}

/// Receives engine events.
pub trait EventListener: Send + Sync {
    /// Called once per event, after the state change it describes.
    fn on_event(&self, event: &EngineEvent);
}

impl<F> EventListener for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn on_event(&self, event: &EngineEvent) {
        self(event)
    }
}

/// Delivers a user-facing message. Composition and transport belong to
/// the implementor.
pub trait Notifier: Send + Sync {
    /// Shows or sends `message`.
    fn notify(&self, message: &str, severity: Severity);
}

/// Forwards every event to a [`Notifier`] as its display text.
#[derive(Debug, Clone)]
pub struct NotifierBridge<N> {
    notifier: N,
}

impl<N: Notifier> NotifierBridge<N> {
    /// Wraps `notifier`.
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: Notifier> EventListener for NotifierBridge<N> {
    fn on_event(&self, event: &EngineEvent) {
        self.notifier.notify(&event.to_string(), event.severity());
    }
}
