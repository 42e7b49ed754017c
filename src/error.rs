//! Error types for the Staff Operations Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while operating on staff data.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Staff Operations Engine.
///
/// Every engine operation either returns the updated entity or exactly one
/// of these errors. A failed operation never leaves state partially mutated.
///
/// # Example
///
/// ```
/// use staff_ops_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "role".to_string(),
///     id: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "role not found: 42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input was malformed: empty name, end before start, unknown permission key.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "role", "leave request").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A state-machine edge that is not permitted.
    #[error("Cannot move {entity} {id} from {from} to {to}")]
    InvalidTransition {
        /// The kind of entity.
        entity: String,
        /// The entity identifier.
        id: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A shift assignment would overlap an existing assignment.
    #[error("Staff '{staff_id}' already has overlapping assignment {existing_assignment} on {date}")]
    Conflict {
        /// The staff member being assigned.
        staff_id: String,
        /// The date of the assignment.
        date: NaiveDate,
        /// The assignment that overlaps.
        existing_assignment: u64,
    },

    /// A shift assignment falls on a date covered by approved leave.
    #[error("Staff '{staff_id}' is on approved leave {leave_id} on {date}")]
    LeaveConflict {
        /// The staff member being assigned.
        staff_id: String,
        /// The date of the assignment.
        date: NaiveDate,
        /// The approved leave request covering the date.
        leave_id: u64,
    },

    /// A second clock-in for the same staff member and day.
    #[error("Staff '{staff_id}' already clocked in on {date}")]
    DuplicateClockIn {
        /// The staff member.
        staff_id: String,
        /// The attendance day.
        date: NaiveDate,
    },
}

impl EngineError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_transition(
        entity: &str,
        id: impl ToString,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        EngineError::InvalidTransition {
            entity: entity.to_string(),
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
