//! Application state for the Staff Operations API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::StaffOpsEngine;

/// Shared application state.
///
/// Holds the site's engine behind one lock, so operations from concurrent
/// requests are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    /// The engine for this site.
    engine: Arc<Mutex<StaffOpsEngine>>,
}

impl AppState {
    /// Creates a new application state around `engine`.
    pub fn new(engine: StaffOpsEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Locks the engine for one operation.
    ///
    /// A panic in another handler does not leave the engine half-updated,
    /// so a poisoned lock is recovered rather than propagated.
    pub fn engine(&self) -> MutexGuard<'_, StaffOpsEngine> {
        self.engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
