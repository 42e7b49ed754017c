//! Configuration loading and management for the Staff Operations Engine.
//!
//! This module loads engine settings (late-arrival grace, roster tie-break,
//! default headcount) and the permission catalog from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use staff_ops_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/restaurant").unwrap().into_config();
//! println!("{} permissions", config.permissions().entries().count());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceSettings, DEFAULT_HEADCOUNT, DEFAULT_LATE_GRACE_MINUTES, EngineConfig,
    EngineSettings, RosterSettings, TieBreak,
};
