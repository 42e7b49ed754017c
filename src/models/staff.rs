//! Staff member model.

use serde::{Deserialize, Serialize};

use super::RoleId;

/// A member of staff at a restaurant site.
///
/// Every other entity refers back to a staff member through its `id`;
/// none of them own the staff record.
///
/// # Example
///
/// ```
/// use staff_ops_engine::models::StaffMember;
///
/// let waiter = StaffMember::new("STF-01", "Asha Rao").with_role(2);
/// assert_eq!(waiter.role_id, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Caller-assigned staff identifier (e.g. "STF-01").
    pub id: String,
    /// Display name.
    pub name: String,
    /// The role this staff member holds, if any.
    #[serde(default)]
    pub role_id: Option<RoleId>,
}

impl StaffMember {
    /// Creates a staff member without a role.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role_id: None,
        }
    }

    /// Sets the role reference.
    pub fn with_role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }
}
