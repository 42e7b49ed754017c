//! Staff Operations Engine for restaurant sites
//!
//! This crate manages a site's workforce: roles and permissions, leave
//! requests, shift templates and rosters, daily attendance, salary slips
//! and sales commissions. All state changes go through
//! [`engine::StaffOpsEngine`], which validates each operation, logs it and
//! publishes an [`events::EngineEvent`]. The [`api`] module serves the same
//! operations over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod persistence;
