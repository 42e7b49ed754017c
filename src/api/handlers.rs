//! HTTP request handlers for the Staff Operations API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler tags its log lines with a fresh correlation id, applies exactly
//! one engine operation, and maps engine errors through [`ApiErrorResponse`].

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    AssignmentId, CommissionId, CommissionRecord, LeaveId, LeaveRequest, Role, RoleId, RoleUpdate,
    SalaryComponents, SalarySlip, ShiftAssignment, ShiftId, ShiftTemplate, SlipId, StaffMember,
    TemplateUpdate,
};

use super::request::{
    AddStaffRequest, AdvanceRequest, ApproveLeaveRequest, AssignShiftRequest, AssignmentQuery,
    ClockRequest, CreateRoleRequest, CreateTemplateRequest, DateQuery, GenerateSlipRequest,
    LeaveQuery, MarkAttendanceRequest, MonthQuery, NowQuery, OptionalMonthQuery,
    PayCommissionRequest, RecordCommissionRequest, RejectLeaveRequest, RosterRequest,
    SubmitLeaveRequest,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/staff", get(list_staff).post(add_staff))
        .route("/roles", get(list_roles).post(create_role))
        .route("/roles/:id", patch(update_role).delete(delete_role))
        .route("/roles/:id/permissions/:key", post(toggle_permission))
        .route("/leave-requests", get(list_leave).post(submit_leave))
        .route("/leave-requests/kpi", get(leave_kpi))
        .route("/leave-requests/:id/approve", post(approve_leave))
        .route("/leave-requests/:id/reject", post(reject_leave))
        .route("/shifts", get(list_templates).post(create_template))
        .route("/shifts/:id", patch(update_template))
        .route("/shifts/:id/deactivate", post(deactivate_template))
        .route("/assignments", get(list_assignments).post(assign_shift))
        .route("/assignments/roster", post(generate_roster))
        .route("/assignments/advance", post(advance_all))
        .route("/assignments/kpi", get(shift_kpi))
        .route("/assignments/:id/advance", post(advance_assignment))
        .route("/attendance", get(list_attendance))
        .route("/attendance/mark", post(mark_attendance))
        .route("/attendance/clock-in", post(clock_in))
        .route("/attendance/clock-out", post(clock_out))
        .route("/attendance/kpi", get(attendance_kpi))
        .route("/payroll/slips", get(list_slips).post(generate_slip))
        .route("/payroll/slips/:id/send", post(send_slip))
        .route("/payroll/kpi", get(salary_kpi))
        .route("/commissions", get(list_commissions).post(record_commission))
        .route("/commissions/:id/pay", post(pay_commission))
        .route("/commissions/kpi", get(commission_kpi))
        .with_state(state)
}

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type QueryString<T> = Result<Query<T>, QueryRejection>;

/// Unwraps a JSON body, logging and converting rejections.
fn parse_body<T>(payload: JsonBody<T>, correlation_id: Uuid) -> Result<T, ApiErrorResponse> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected request body"
        );
        rejection.into()
    })
}

/// Unwraps a query string, logging and converting rejections.
fn parse_query<T: DeserializeOwned>(query: QueryString<T>, correlation_id: Uuid) -> Result<T, ApiErrorResponse> {
    query.map(|Query(params)| params).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected query string"
        );
        ApiErrorResponse::bad_query(rejection.body_text())
    })
}

/// Turns an engine result into a JSON response.
fn respond<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: EngineResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, status = status.as_u16(), "Request completed");
            (status, Json(body)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

macro_rules! try_or_respond {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(error) => return error.into_response(),
        }
    };
}

// Staff

async fn list_staff(State(state): State<AppState>) -> Response {
    let staff: Vec<StaffMember> = state.engine().staff().to_vec();
    Json(staff).into_response()
}

async fn add_staff(State(state): State<AppState>, payload: JsonBody<AddStaffRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Adding staff member");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().add_staff(request.into());
    respond(correlation_id, StatusCode::CREATED, result)
}

// Roles

async fn list_roles(State(state): State<AppState>) -> Response {
    let roles: Vec<Role> = state.engine().roles().roles().to_vec();
    Json(roles).into_response()
}

async fn create_role(State(state): State<AppState>, payload: JsonBody<CreateRoleRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating role");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .create_role(&request.name, &request.description, request.permissions);
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    payload: JsonBody<RoleUpdate>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, role_id = id, "Updating role");

    let update = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().update_role(id, update);
    respond(correlation_id, StatusCode::OK, result)
}

async fn delete_role(State(state): State<AppState>, Path(id): Path<RoleId>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, role_id = id, "Deleting role");

    let result = state.engine().delete_role(id);
    respond(correlation_id, StatusCode::OK, result)
}

async fn toggle_permission(
    State(state): State<AppState>,
    Path((id, key)): Path<(RoleId, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, role_id = id, key = %key, "Toggling permission");

    let result = state.engine().toggle_permission(id, &key);
    respond(correlation_id, StatusCode::OK, result)
}

// Leave

async fn list_leave(State(state): State<AppState>, query: QueryString<LeaveQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));

    let requests: Vec<LeaveRequest> = state
        .engine()
        .leave()
        .filtered_view(query.status)
        .into_iter()
        .cloned()
        .collect();
    Json(requests).into_response()
}

async fn submit_leave(State(state): State<AppState>, payload: JsonBody<SubmitLeaveRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Submitting leave request");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let applied_date = request.applied_date;
    let result = state.engine().submit_leave(request.into(), applied_date);
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn approve_leave(
    State(state): State<AppState>,
    Path(id): Path<LeaveId>,
    payload: JsonBody<ApproveLeaveRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, leave_id = id, "Approving leave request");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .approve_leave(id, &request.approver, request.approved_date);
    respond(correlation_id, StatusCode::OK, result)
}

async fn reject_leave(
    State(state): State<AppState>,
    Path(id): Path<LeaveId>,
    payload: JsonBody<RejectLeaveRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, leave_id = id, "Rejecting leave request");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().reject_leave(id, &request.reason);
    respond(correlation_id, StatusCode::OK, result)
}

async fn leave_kpi(State(state): State<AppState>) -> Response {
    Json(state.engine().leave_kpi()).into_response()
}

// Shift templates

async fn list_templates(State(state): State<AppState>) -> Response {
    let templates: Vec<ShiftTemplate> = state.engine().scheduler().templates().to_vec();
    Json(templates).into_response()
}

async fn create_template(State(state): State<AppState>, payload: JsonBody<CreateTemplateRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating shift template");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .create_template(&request.name, request.start_time, request.end_time);
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    payload: JsonBody<TemplateUpdate>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, shift_id = id, "Updating shift template");

    let update = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().update_template(id, update);
    respond(correlation_id, StatusCode::OK, result)
}

async fn deactivate_template(State(state): State<AppState>, Path(id): Path<ShiftId>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, shift_id = id, "Deactivating shift template");

    let result = state.engine().deactivate_template(id);
    respond(correlation_id, StatusCode::OK, result)
}

// Assignments

async fn list_assignments(State(state): State<AppState>, query: QueryString<AssignmentQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));

    let assignments: Vec<ShiftAssignment> = state
        .engine()
        .scheduler()
        .assignments()
        .iter()
        .filter(|a| query.date.is_none_or(|date| a.date == date))
        .filter(|a| query.staff_id.as_ref().is_none_or(|id| &a.staff_id == id))
        .cloned()
        .collect();
    Json(assignments).into_response()
}

async fn assign_shift(State(state): State<AppState>, payload: JsonBody<AssignShiftRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Assigning shift");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .assign_shift(&request.staff_id, request.shift_id, request.date);
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn generate_roster(State(state): State<AppState>, payload: JsonBody<RosterRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Generating roster");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result =
        state
            .engine()
            .generate_roster(request.start_date, request.end_date, request.headcount);
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn advance_assignment(
    State(state): State<AppState>,
    Path(id): Path<AssignmentId>,
    payload: JsonBody<AdvanceRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, assignment_id = id, "Advancing assignment");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().advance_assignment(id, request.now);
    respond(correlation_id, StatusCode::OK, result)
}

async fn advance_all(State(state): State<AppState>, payload: JsonBody<AdvanceRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Advancing all assignments");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let changes = state.engine().advance_all(request.now);
    respond(correlation_id, StatusCode::OK, Ok(changes))
}

async fn shift_kpi(State(state): State<AppState>, query: QueryString<NowQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));
    Json(state.engine().shift_kpi(query.now)).into_response()
}

// Attendance

async fn list_attendance(State(state): State<AppState>, query: QueryString<DateQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));

    let records: Vec<_> = state
        .engine()
        .attendance()
        .records_on(query.date)
        .into_iter()
        .cloned()
        .collect();
    Json(records).into_response()
}

async fn mark_attendance(State(state): State<AppState>, payload: JsonBody<MarkAttendanceRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Marking attendance");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .mark_attendance(&request.staff_id, request.date, request.status);
    respond(correlation_id, StatusCode::OK, result)
}

async fn clock_in(State(state): State<AppState>, payload: JsonBody<ClockRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Clocking in");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .clock_in(&request.staff_id, request.date, request.time);
    respond(correlation_id, StatusCode::OK, result)
}

async fn clock_out(State(state): State<AppState>, payload: JsonBody<ClockRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Clocking out");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state
        .engine()
        .clock_out(&request.staff_id, request.date, request.time);
    respond(correlation_id, StatusCode::OK, result)
}

async fn attendance_kpi(State(state): State<AppState>, query: QueryString<DateQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));
    Json(state.engine().attendance_kpi(query.date)).into_response()
}

// Payroll

async fn list_slips(State(state): State<AppState>, query: QueryString<OptionalMonthQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));

    let engine = state.engine();
    let slips: Vec<SalarySlip> = match query.month {
        Some(month) => engine.payroll().slips_for(month).into_iter().cloned().collect(),
        None => engine.payroll().slips().to_vec(),
    };
    Json(slips).into_response()
}

async fn generate_slip(State(state): State<AppState>, payload: JsonBody<GenerateSlipRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Generating salary slip");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let components = SalaryComponents::from(&request);
    let result = state.engine().generate_slip(
        &request.staff_id,
        request.month,
        &components,
        request.generated_date,
    );
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn send_slip(State(state): State<AppState>, Path(id): Path<SlipId>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, slip_id = id, "Sending salary slip");

    let result = state.engine().mark_slip_sent(id);
    respond(correlation_id, StatusCode::OK, result)
}

async fn salary_kpi(State(state): State<AppState>, query: QueryString<MonthQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));
    Json(state.engine().salary_kpi(query.month)).into_response()
}

// Commissions

async fn list_commissions(State(state): State<AppState>, query: QueryString<OptionalMonthQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));

    let engine = state.engine();
    let records: Vec<CommissionRecord> = match query.month {
        Some(month) => engine
            .payroll()
            .commissions_for(month)
            .into_iter()
            .cloned()
            .collect(),
        None => engine.payroll().commissions().to_vec(),
    };
    Json(records).into_response()
}

async fn record_commission(State(state): State<AppState>, payload: JsonBody<RecordCommissionRequest>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Recording commission");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().record_commission(
        &request.staff_id,
        request.sales_amount,
        request.commission_rate,
        request.month,
    );
    respond(correlation_id, StatusCode::CREATED, result)
}

async fn pay_commission(
    State(state): State<AppState>,
    Path(id): Path<CommissionId>,
    payload: JsonBody<PayCommissionRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, commission_id = id, "Paying commission");

    let request = try_or_respond!(parse_body(payload, correlation_id));
    let result = state.engine().pay_commission(id, request.paid_date);
    respond(correlation_id, StatusCode::OK, result)
}

async fn commission_kpi(State(state): State<AppState>, query: QueryString<MonthQuery>) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = try_or_respond!(parse_query(query, correlation_id));
    Json(state.engine().commission_kpi(query.month)).into_response()
}
