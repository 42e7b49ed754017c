//! The in-memory working set an engine is built from.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::models::{
    AttendanceRecord, CommissionRecord, LeaveRequest, Role, SalarySlip, ShiftAssignment,
    ShiftTemplate, StaffMember,
};
use crate::persistence::{EntityKind, Persistence, StoreError};

/// Every collection the engine owns, as plain data.
///
/// Missing collections deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct WorkingSet {
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
    #[serde(default)]
    pub shift_templates: Vec<ShiftTemplate>,
    #[serde(default)]
    pub shift_assignments: Vec<ShiftAssignment>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub salary_slips: Vec<SalarySlip>,
    #[serde(default)]
    pub commissions: Vec<CommissionRecord>,
}

impl WorkingSet {
    /// Loads every collection from `store`.
    ///
    /// Fails on the first kind that cannot be loaded or parsed.
    pub fn load(store: &dyn Persistence) -> Result<Self, StoreError> {
        Ok(Self {
            staff: load_kind(store, EntityKind::Staff)?,
            roles: load_kind(store, EntityKind::Roles)?,
            leave_requests: load_kind(store, EntityKind::LeaveRequests)?,
            shift_templates: load_kind(store, EntityKind::ShiftTemplates)?,
            shift_assignments: load_kind(store, EntityKind::ShiftAssignments)?,
            attendance: load_kind(store, EntityKind::Attendance)?,
            salary_slips: load_kind(store, EntityKind::SalarySlips)?,
            commissions: load_kind(store, EntityKind::Commissions)?,
        })
    }

    /// The collection for `kind` as a JSON array.
    pub fn collection(&self, kind: EntityKind) -> Result<Value, StoreError> {
        let value = match kind {
            EntityKind::Staff => serde_json::to_value(&self.staff),
            EntityKind::Roles => serde_json::to_value(&self.roles),
            EntityKind::LeaveRequests => serde_json::to_value(&self.leave_requests),
            EntityKind::ShiftTemplates => serde_json::to_value(&self.shift_templates),
            EntityKind::ShiftAssignments => serde_json::to_value(&self.shift_assignments),
            EntityKind::Attendance => serde_json::to_value(&self.attendance),
            EntityKind::SalarySlips => serde_json::to_value(&self.salary_slips),
            EntityKind::Commissions => serde_json::to_value(&self.commissions),
        };
        value.map_err(|e| StoreError::Malformed {
            kind,
            message: e.to_string(),
        })
    }
}

fn load_kind<T: DeserializeOwned>(store: &dyn Persistence, kind: EntityKind) -> Result<Vec<T>, StoreError> {
    let value = store.load(kind)?;
    serde_json::from_value(value).map_err(|e| StoreError::Malformed {
        kind,
        message: e.to_string(),
    })
}
