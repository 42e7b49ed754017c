//! The persistence boundary.
//!
//! The engine never performs I/O on its own. A caller loads a
//! [`WorkingSet`](crate::engine::WorkingSet) through a [`Persistence`]
//! implementation and later pushes the engine's state back with
//! `StaffOpsEngine::sync`. Collections travel as `serde_json::Value`
//! arrays, one per [`EntityKind`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EntityKind {
    Staff,
    Roles,
    LeaveRequests,
    ShiftTemplates,
    ShiftAssignments,
    Attendance,
    SalarySlips,
    Commissions,
}

impl EntityKind {
    /// Every kind, in load order.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Staff,
        EntityKind::Roles,
        EntityKind::LeaveRequests,
        EntityKind::ShiftTemplates,
        EntityKind::ShiftAssignments,
        EntityKind::Attendance,
        EntityKind::SalarySlips,
        EntityKind::Commissions,
    ];

    /// The snake_case collection name.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Staff => "staff",
            EntityKind::Roles => "roles",
            EntityKind::LeaveRequests => "leave_requests",
            EntityKind::ShiftTemplates => "shift_templates",
            EntityKind::ShiftAssignments => "shift_assignments",
            EntityKind::Attendance => "attendance",
            EntityKind::SalarySlips => "salary_slips",
            EntityKind::Commissions => "commissions",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store failed.
    #[error("Store failed for {kind}: {message}")]
    Backend {
        /// The collection being loaded or saved.
        kind: EntityKind,
        /// What went wrong.
        message: String,
    },

    /// A collection did not have the expected shape.
    #[error("Malformed {kind} collection: {message}")]
    Malformed {
        /// The collection that failed to (de)serialize.
        kind: EntityKind,
        /// The serde error.
        message: String,
    },
}

/// Loads and saves whole collections.
pub trait Persistence: Send + Sync {
    /// Returns the stored collection for `kind` as a JSON array.
    fn load(&self, kind: EntityKind) -> Result<Value, StoreError>;

    /// Replaces the stored collection for `kind`.
    fn save(&self, kind: EntityKind, value: &Value) -> Result<(), StoreError>;
}

/// An in-process store. Kinds never saved load as empty arrays.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<EntityKind, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `kind` with `value`.
    pub fn with(self, kind: EntityKind, value: Value) -> Self {
        if let Ok(mut collections) = self.collections.lock() {
            collections.insert(kind, value);
        }
        self
    }
}

impl Persistence for MemoryStore {
    fn load(&self, kind: EntityKind) -> Result<Value, StoreError> {
        let collections = self.collections.lock().map_err(|_| poisoned(kind))?;
        Ok(collections
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }

    fn save(&self, kind: EntityKind, value: &Value) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().map_err(|_| poisoned(kind))?;
        collections.insert(kind, value.clone());
        Ok(())
    }
}

fn poisoned(kind: EntityKind) -> StoreError {
    StoreError::Backend {
        kind,
        message: "store lock poisoned".to_string(),
    }
}

/// The outcome of pushing every collection to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Kinds saved successfully.
    pub saved: Vec<EntityKind>,
    /// Kinds that failed, with the error text.
    pub failed: Vec<(EntityKind, String)>,
}

impl SyncReport {
    /// Returns true if every kind was saved.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
