//! HTTP API module for the Staff Operations Engine.
//!
//! This module exposes the engine's operations and KPI snapshots as JSON
//! endpoints. One engine instance serves every request.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AddStaffRequest, AdvanceRequest, ApproveLeaveRequest, AssignShiftRequest, ClockRequest,
    CreateRoleRequest, CreateTemplateRequest, GenerateSlipRequest, MarkAttendanceRequest,
    PayCommissionRequest, RecordCommissionRequest, RejectLeaveRequest, RosterRequest,
    SubmitLeaveRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
