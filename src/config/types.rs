//! Configuration types for the staff operations engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::models::PermissionCatalog;

/// Default minutes a clock-in may trail the scheduled start before it counts as late.
pub const DEFAULT_LATE_GRACE_MINUTES: i64 = 15;

/// Default number of staff placed on each shift by roster generation.
pub const DEFAULT_HEADCOUNT: u32 = 1;

/// Attendance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSettings {
    /// Minutes after the scheduled start before a clock-in is marked late.
    #[serde(default = "default_late_grace_minutes")]
    pub late_grace_minutes: i64,
}

impl AttendanceSettings {
    /// The grace period as a duration.
    pub fn late_grace(&self) -> Duration {
        Duration::minutes(self.late_grace_minutes)
    }
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            late_grace_minutes: DEFAULT_LATE_GRACE_MINUTES,
        }
    }
}

fn default_late_grace_minutes() -> i64 {
    DEFAULT_LATE_GRACE_MINUTES
}

/// How roster generation orders staff with equal assignment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order staff were added to the engine.
    #[default]
    RosterOrder,
    /// Order by staff id, lexicographically.
    StaffId,
}

/// Roster generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSettings {
    /// Tie-break between equally loaded staff.
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Headcount used when a caller does not supply one.
    #[serde(default = "default_headcount")]
    pub default_headcount: u32,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            default_headcount: DEFAULT_HEADCOUNT,
        }
    }
}

fn default_headcount() -> u32 {
    DEFAULT_HEADCOUNT
}

/// Contents of `engine.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Attendance settings.
    #[serde(default)]
    pub attendance: AttendanceSettings,
    /// Roster settings.
    #[serde(default)]
    pub roster: RosterSettings,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    settings: EngineSettings,
    permissions: PermissionCatalog,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, permissions: PermissionCatalog) -> Self {
        Self {
            settings,
            permissions,
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the attendance settings.
    pub fn attendance(&self) -> &AttendanceSettings {
        &self.settings.attendance
    }

    /// Returns the roster settings.
    pub fn roster(&self) -> &RosterSettings {
        &self.settings.roster
    }

    /// Returns the permission catalog.
    pub fn permissions(&self) -> &PermissionCatalog {
        &self.permissions
    }
}
