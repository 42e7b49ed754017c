//! Leave-approval workflow.
//!
//! ```text
//! PENDING --approve(approver)--> APPROVED
//! PENDING --reject(reason)-----> REJECTED
//! ```
//!
//! APPROVED and REJECTED are terminal. Approved leave is the exclusion
//! constraint the shift scheduler checks before placing staff on a date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveId, LeaveKpi, LeaveRequest, LeaveStatus, LeaveType, inclusive_days};

use super::ids::IdSequence;

/// The caller-supplied part of a new leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSubmission {
    /// The staff member requesting leave.
    pub staff_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Why the leave is requested.
    #[serde(default)]
    pub reason: String,
}

/// Leave requests and their lifecycle.
#[derive(Debug, Clone)]
pub struct LeaveWorkflow {
    requests: Vec<LeaveRequest>,
    ids: IdSequence,
}

impl LeaveWorkflow {
    /// Creates a workflow over an existing request collection.
    pub fn new(requests: Vec<LeaveRequest>) -> Self {
        let ids = IdSequence::starting_after(requests.iter().map(|r| r.id));
        Self { requests, ids }
    }

    /// All requests, in submission order.
    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }

    /// Looks up a request by id.
    pub fn get(&self, id: LeaveId) -> EngineResult<&LeaveRequest> {
        self.requests
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::not_found("leave request", id))
    }

    /// Submits a new request in PENDING.
    ///
    /// `days` is the inclusive calendar span. Fails with `Validation` if the
    /// end date precedes the start date.
    ///
    /// # Example
    ///
    /// ```
    /// use staff_ops_engine::engine::{LeaveSubmission, LeaveWorkflow};
    /// use staff_ops_engine::models::{LeaveStatus, LeaveType};
    /// use chrono::NaiveDate;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
    /// let mut workflow = LeaveWorkflow::new(Vec::new());
    /// let request = workflow
    ///     .submit(
    ///         LeaveSubmission {
    ///             staff_id: "STF-01".to_string(),
    ///             leave_type: LeaveType::Sick,
    ///             start_date: d(15),
    ///             end_date: d(17),
    ///             reason: "Flu".to_string(),
    ///         },
    ///         d(14),
    ///     )
    ///     .unwrap();
    /// assert_eq!(request.days, 3);
    /// assert_eq!(request.status, LeaveStatus::Pending);
    /// ```
    pub fn submit(&mut self, submission: LeaveSubmission, applied_date: NaiveDate) -> EngineResult<&LeaveRequest> {
        if submission.end_date < submission.start_date {
            return Err(EngineError::validation(
                "end_date",
                format!(
                    "{} is before start date {}",
                    submission.end_date, submission.start_date
                ),
            ));
        }

        self.requests.push(LeaveRequest {
            id: self.ids.next_id(),
            days: inclusive_days(submission.start_date, submission.end_date),
            staff_id: submission.staff_id,
            leave_type: submission.leave_type,
            start_date: submission.start_date,
            end_date: submission.end_date,
            reason: submission.reason,
            status: LeaveStatus::Pending,
            applied_date,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
        });
        Ok(&self.requests[self.requests.len() - 1])
    }

    /// Approves a pending request.
    pub fn approve(&mut self, id: LeaveId, approver: &str, on: NaiveDate) -> EngineResult<&LeaveRequest> {
        let request = self.pending_mut(id, LeaveStatus::Approved)?;
        request.status = LeaveStatus::Approved;
        request.approved_by = Some(approver.to_string());
        request.approved_date = Some(on);
        Ok(request)
    }

    /// Rejects a pending request.
    pub fn reject(&mut self, id: LeaveId, reason: &str) -> EngineResult<&LeaveRequest> {
        let request = self.pending_mut(id, LeaveStatus::Rejected)?;
        request.status = LeaveStatus::Rejected;
        request.rejection_reason = Some(reason.to_string());
        Ok(request)
    }

    fn pending_mut(&mut self, id: LeaveId, to: LeaveStatus) -> EngineResult<&mut LeaveRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::not_found("leave request", id))?;

        if request.status != LeaveStatus::Pending {
            return Err(EngineError::invalid_transition(
                "leave request",
                id,
                request.status,
                to,
            ));
        }
        Ok(request)
    }

    /// Requests matching `status`, or all requests when `None`, in
    /// submission order.
    pub fn filtered_view(&self, status: Option<LeaveStatus>) -> Vec<&LeaveRequest> {
        self.requests
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .collect()
    }

    /// The approved request covering `date` for `staff_id`, if any.
    pub fn approved_leave_on(&self, staff_id: &str, date: NaiveDate) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| r.excludes(staff_id, date))
    }

    /// Returns true if `staff_id` has approved leave covering `date`.
    pub fn is_on_approved_leave(&self, staff_id: &str, date: NaiveDate) -> bool {
        self.approved_leave_on(staff_id, date).is_some()
    }

    /// Counts requests by status.
    pub fn kpi(&self) -> LeaveKpi {
        self.requests
            .iter()
            .fold(LeaveKpi::default(), |mut kpi, request| {
                kpi.total += 1;
                match request.status {
                    LeaveStatus::Pending => kpi.pending += 1,
                    LeaveStatus::Approved => {
                        kpi.approved += 1;
                        kpi.approved_days += request.days;
                    }
                    LeaveStatus::Rejected => kpi.rejected += 1,
                }
                kpi
            })
    }
}
