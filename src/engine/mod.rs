//! The staff operations engine.
//!
//! [`StaffOpsEngine`] owns every collection and is the only way to change
//! them. Each operation either applies completely and returns the updated
//! entity, or returns one [`EngineError`] and leaves state untouched.
//! Successful operations are logged at `info`, rejected ones at `warn`, and
//! both are published to subscribed [`EventListener`]s.
//!
//! # Example
//!
//! ```
//! use staff_ops_engine::config::{EngineConfig, EngineSettings};
//! use staff_ops_engine::engine::{LeaveSubmission, StaffOpsEngine, WorkingSet};
//! use staff_ops_engine::models::{LeaveStatus, LeaveType, PermissionCatalog, StaffMember};
//! use chrono::NaiveDate;
//!
//! let config = EngineConfig::new(EngineSettings::default(), PermissionCatalog::default());
//! let mut engine = StaffOpsEngine::new(config, WorkingSet::default());
//! engine.add_staff(StaffMember::new("STF-01", "Asha Rao")).unwrap();
//!
//! let d = |day| NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
//! let request = engine
//!     .submit_leave(
//!         LeaveSubmission {
//!             staff_id: "STF-01".to_string(),
//!             leave_type: LeaveType::Sick,
//!             start_date: d(15),
//!             end_date: d(17),
//!             reason: "Flu".to_string(),
//!         },
//!         d(14),
//!     )
//!     .unwrap();
//!
//! let approved = engine.approve_leave(request.id, "Manager", d(14)).unwrap();
//! assert_eq!(approved.status, LeaveStatus::Approved);
//! ```

mod attendance;
mod ids;
mod leave;
mod payroll;
mod roles;
mod roster;
mod scheduler;
mod working_set;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::events::{EngineEvent, EventListener};
use crate::models::{
    AssignmentId, AttendanceKpi, AttendanceRecord, AttendanceStatus, CommissionId, CommissionKpi,
    CommissionRecord, LeaveId, LeaveKpi, LeaveRequest, MonthKey, Role, RoleId, RoleUpdate,
    SalaryComponents, SalaryKpi, SalarySlip, ShiftAssignment, ShiftId, ShiftKpi, ShiftTemplate,
    SlipId, StaffMember, TemplateUpdate,
};
use crate::persistence::{EntityKind, Persistence, StoreError, SyncReport};

pub use attendance::AttendanceTracker;
pub use leave::{LeaveSubmission, LeaveWorkflow};
pub use payroll::PayrollEngine;
pub use roles::RoleRegistry;
pub use roster::{RosterReport, Shortfall};
pub use scheduler::{ShiftScheduler, StatusChange};
pub use working_set::WorkingSet;

/// The workforce-operations engine for one site.
pub struct StaffOpsEngine {
    config: EngineConfig,
    staff: Vec<StaffMember>,
    roles: RoleRegistry,
    leave: LeaveWorkflow,
    scheduler: ShiftScheduler,
    attendance: AttendanceTracker,
    payroll: PayrollEngine,
    listeners: Vec<Box<dyn EventListener>>,
}

impl StaffOpsEngine {
    /// Builds an engine over `working_set`. Id sequences resume after the
    /// highest id loaded for each collection.
    pub fn new(config: EngineConfig, working_set: WorkingSet) -> Self {
        let WorkingSet {
            staff,
            roles,
            leave_requests,
            shift_templates,
            shift_assignments,
            attendance,
            salary_slips,
            commissions,
        } = working_set;

        Self {
            roles: RoleRegistry::new(config.permissions().clone(), roles),
            leave: LeaveWorkflow::new(leave_requests),
            scheduler: ShiftScheduler::new(
                shift_templates,
                shift_assignments,
                config.roster().tie_break,
            ),
            attendance: AttendanceTracker::new(attendance, config.attendance()),
            payroll: PayrollEngine::new(salary_slips, commissions),
            staff,
            config,
            listeners: Vec::new(),
        }
    }

    /// Builds an engine from every collection in `store`.
    ///
    /// There is no fallback: the first collection that fails to load fails
    /// the whole call.
    pub fn from_store(config: EngineConfig, store: &dyn Persistence) -> Result<Self, StoreError> {
        let working_set = WorkingSet::load(store)?;
        info!(
            staff = working_set.staff.len(),
            roles = working_set.roles.len(),
            assignments = working_set.shift_assignments.len(),
            "Loaded working set"
        );
        Ok(Self::new(config, working_set))
    }

    /// A snapshot of every collection.
    pub fn working_set(&self) -> WorkingSet {
        WorkingSet {
            staff: self.staff.clone(),
            roles: self.roles.roles().to_vec(),
            leave_requests: self.leave.requests().to_vec(),
            shift_templates: self.scheduler.templates().to_vec(),
            shift_assignments: self.scheduler.assignments().to_vec(),
            attendance: self.attendance.records().to_vec(),
            salary_slips: self.payroll.slips().to_vec(),
            commissions: self.payroll.commissions().to_vec(),
        }
    }

    /// Saves every collection to `store`, continuing past failures.
    pub fn sync(&self, store: &dyn Persistence) -> SyncReport {
        let working_set = self.working_set();
        let mut report = SyncReport::default();
        for kind in EntityKind::ALL {
            match working_set
                .collection(kind)
                .and_then(|value| store.save(kind, &value))
            {
                Ok(()) => report.saved.push(kind),
                Err(error) => {
                    warn!(kind = %kind, error = %error, "Failed to persist collection");
                    report.failed.push((kind, error.to_string()));
                }
            }
        }
        info!(
            saved = report.saved.len(),
            failed = report.failed.len(),
            "Synced working set"
        );
        report
    }

    /// Registers a listener for every subsequent event.
    pub fn subscribe<L: EventListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: &EngineEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

    fn finish<T>(
        &self,
        operation: &str,
        result: EngineResult<T>,
        event: impl FnOnce(&T) -> EngineEvent,
    ) -> EngineResult<T> {
        match result {
            Ok(value) => {
                let event = event(&value);
                info!(operation, event = %event, "Operation applied");
                self.emit(&event);
                Ok(value)
            }
            Err(error) => Err(self.rejected(operation, error)),
        }
    }

    fn rejected(&self, operation: &str, error: EngineError) -> EngineError {
        warn!(operation, error = %error, "Operation rejected");
        self.emit(&EngineEvent::OperationRejected {
            operation: operation.to_string(),
            error: error.to_string(),
        });
        error
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // Staff

    /// The staff roster, in the order members were added.
    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    /// Adds a staff member. Ids must be non-empty and unique; a role
    /// reference must name an existing role.
    pub fn add_staff(&mut self, member: StaffMember) -> EngineResult<StaffMember> {
        let result = self.validate_new_staff(&member).map(|()| {
            self.staff.push(member.clone());
            member
        });
        self.finish("add staff", result, |member| EngineEvent::StaffAdded {
            staff_id: member.id.clone(),
        })
    }

    fn validate_new_staff(&self, member: &StaffMember) -> EngineResult<()> {
        if member.id.trim().is_empty() {
            return Err(EngineError::validation("staff_id", "must not be empty"));
        }
        if member.name.trim().is_empty() {
            return Err(EngineError::validation("name", "must not be empty"));
        }
        if self.staff.iter().any(|s| s.id == member.id) {
            return Err(EngineError::validation(
                "staff_id",
                format!("'{}' already exists", member.id),
            ));
        }
        if let Some(role_id) = member.role_id {
            self.roles.get(role_id)?;
        }
        Ok(())
    }

    fn ensure_staff(&self, staff_id: &str) -> EngineResult<()> {
        if self.staff.iter().any(|s| s.id == staff_id) {
            Ok(())
        } else {
            Err(EngineError::not_found("staff member", staff_id))
        }
    }

    // Roles

    /// The role registry.
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Creates a role. See [`RoleRegistry::create_role`].
    pub fn create_role(
        &mut self,
        name: &str,
        description: &str,
        permissions: Vec<String>,
    ) -> EngineResult<Role> {
        let result = self
            .roles
            .create_role(name, description, permissions)
            .cloned();
        self.finish("create role", result, |role| EngineEvent::RoleCreated {
            role_id: role.id,
            name: role.name.clone(),
        })
    }

    /// Applies a partial role update.
    pub fn update_role(&mut self, id: RoleId, update: RoleUpdate) -> EngineResult<Role> {
        let result = self.roles.update_role(id, update).cloned();
        self.finish("update role", result, |role| EngineEvent::RoleUpdated {
            role_id: role.id,
        })
    }

    /// Deletes a role. Staff still referencing it keep the dangling
    /// reference and are listed in the emitted event.
    pub fn delete_role(&mut self, id: RoleId) -> EngineResult<Role> {
        let result = self.roles.delete_role(id);
        let orphaned_staff: Vec<String> = self
            .staff
            .iter()
            .filter(|s| s.role_id == Some(id))
            .map(|s| s.id.clone())
            .collect();
        if result.is_ok() && !orphaned_staff.is_empty() {
            warn!(
                role_id = id,
                orphaned = ?orphaned_staff,
                "Deleted role is still referenced by staff"
            );
        }
        self.finish("delete role", result, |role| EngineEvent::RoleDeleted {
            role_id: role.id,
            orphaned_staff,
        })
    }

    /// Grants or revokes one permission on a role.
    pub fn toggle_permission(&mut self, role_id: RoleId, key: &str) -> EngineResult<Role> {
        let result = self.roles.toggle_permission(role_id, key).cloned();
        self.finish("toggle permission", result, |role| {
            EngineEvent::PermissionToggled {
                role_id: role.id,
                key: key.to_string(),
                granted: role.has_permission(key),
            }
        })
    }

    // Leave

    /// The leave workflow.
    pub fn leave(&self) -> &LeaveWorkflow {
        &self.leave
    }

    /// Submits a leave request for a known staff member.
    pub fn submit_leave(
        &mut self,
        submission: LeaveSubmission,
        applied_date: NaiveDate,
    ) -> EngineResult<LeaveRequest> {
        let result = self
            .ensure_staff(&submission.staff_id)
            .and_then(|()| self.leave.submit(submission, applied_date).cloned());
        self.finish("submit leave", result, |request| {
            EngineEvent::LeaveSubmitted {
                leave_id: request.id,
                staff_id: request.staff_id.clone(),
                days: request.days,
            }
        })
    }

    /// Approves a pending leave request.
    pub fn approve_leave(
        &mut self,
        id: LeaveId,
        approver: &str,
        on: NaiveDate,
    ) -> EngineResult<LeaveRequest> {
        let result = self.leave.approve(id, approver, on).cloned();
        self.finish("approve leave", result, |request| EngineEvent::LeaveApproved {
            leave_id: request.id,
            staff_id: request.staff_id.clone(),
            approver: approver.to_string(),
        })
    }

    /// Rejects a pending leave request.
    pub fn reject_leave(&mut self, id: LeaveId, reason: &str) -> EngineResult<LeaveRequest> {
        let result = self.leave.reject(id, reason).cloned();
        self.finish("reject leave", result, |request| EngineEvent::LeaveRejected {
            leave_id: request.id,
            staff_id: request.staff_id.clone(),
        })
    }

    /// Leave request counts.
    pub fn leave_kpi(&self) -> LeaveKpi {
        self.leave.kpi()
    }

    // Shifts

    /// The shift scheduler.
    pub fn scheduler(&self) -> &ShiftScheduler {
        &self.scheduler
    }

    /// Creates a shift template.
    pub fn create_template(
        &mut self,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> EngineResult<ShiftTemplate> {
        let result = self
            .scheduler
            .create_template(name, start_time, end_time)
            .cloned();
        self.finish("create shift template", result, |template| {
            EngineEvent::TemplateCreated {
                shift_id: template.id,
                name: template.name.clone(),
            }
        })
    }

    /// Applies a partial template update.
    pub fn update_template(&mut self, id: ShiftId, update: TemplateUpdate) -> EngineResult<ShiftTemplate> {
        let result = self.scheduler.update_template(id, update).cloned();
        self.finish("update shift template", result, |template| {
            EngineEvent::TemplateUpdated {
                shift_id: template.id,
            }
        })
    }

    /// Soft-disables a template.
    pub fn deactivate_template(&mut self, id: ShiftId) -> EngineResult<ShiftTemplate> {
        let result = self.scheduler.deactivate_template(id).cloned();
        self.finish("deactivate shift template", result, |template| {
            EngineEvent::TemplateDeactivated {
                shift_id: template.id,
            }
        })
    }

    /// Places a known staff member on a shift.
    pub fn assign_shift(
        &mut self,
        staff_id: &str,
        shift_id: ShiftId,
        date: NaiveDate,
    ) -> EngineResult<ShiftAssignment> {
        let result = self.ensure_staff(staff_id).and_then(|()| {
            self.scheduler
                .assign(staff_id, shift_id, date, &self.leave)
                .cloned()
        });
        self.finish("assign shift", result, |assignment| {
            EngineEvent::ShiftAssigned {
                assignment_id: assignment.id,
                staff_id: assignment.staff_id.clone(),
                date: assignment.date,
            }
        })
    }

    /// Generates a roster over the staff roster for `start..=end`.
    ///
    /// `headcount` defaults to `roster.default_headcount`.
    pub fn generate_roster(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        headcount: Option<u32>,
    ) -> EngineResult<RosterReport> {
        let headcount = headcount.unwrap_or(self.config.roster().default_headcount);
        let result =
            self.scheduler
                .auto_generate_roster(start, end, headcount, &self.staff, &self.leave);
        self.finish("generate roster", result, |report| {
            EngineEvent::RosterGenerated {
                created: report.created.len(),
                shortfalls: report.shortfalls.len(),
            }
        })
    }

    /// Advances one assignment as of `now`.
    pub fn advance_assignment(
        &mut self,
        id: AssignmentId,
        now: NaiveDateTime,
    ) -> EngineResult<ShiftAssignment> {
        let from = match self.scheduler.assignment(id) {
            Ok(assignment) => assignment.status,
            Err(error) => return Err(self.rejected("advance assignment", error)),
        };
        let assignment = self
            .scheduler
            .advance_status(id, now, &self.attendance)
            .cloned()
            .map_err(|error| self.rejected("advance assignment", error))?;
        if assignment.status != from {
            let event = EngineEvent::AssignmentAdvanced {
                assignment_id: id,
                from,
                to: assignment.status,
            };
            info!(event = %event, "Operation applied");
            self.emit(&event);
        }
        Ok(assignment)
    }

    /// Advances every open assignment as of `now`.
    pub fn advance_all(&mut self, now: NaiveDateTime) -> Vec<StatusChange> {
        let changes = self.scheduler.advance_all(now, &self.attendance);
        for change in &changes {
            let event = EngineEvent::AssignmentAdvanced {
                assignment_id: change.assignment_id,
                from: change.from,
                to: change.to,
            };
            info!(event = %event, "Operation applied");
            self.emit(&event);
        }
        changes
    }

    /// Shift coverage at `now`, with attendance deciding who is on duty.
    pub fn shift_kpi(&self, now: NaiveDateTime) -> ShiftKpi {
        self.scheduler.kpi(now, &self.staff, &self.attendance)
    }

    // Attendance

    /// The attendance tracker.
    pub fn attendance(&self) -> &AttendanceTracker {
        &self.attendance
    }

    /// Sets a known staff member's status for a day.
    pub fn mark_attendance(
        &mut self,
        staff_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> EngineResult<AttendanceRecord> {
        let result = self.ensure_staff(staff_id).and_then(|()| {
            self.attendance
                .mark_attendance(staff_id, date, status)
                .cloned()
        });
        self.finish("mark attendance", result, |record| {
            EngineEvent::AttendanceMarked {
                staff_id: record.staff_id.clone(),
                date: record.date,
                status: record.status,
            }
        })
    }

    /// Records a clock-in.
    pub fn clock_in(
        &mut self,
        staff_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> EngineResult<AttendanceRecord> {
        let result = self
            .ensure_staff(staff_id)
            .and_then(|()| self.attendance.clock_in(staff_id, date, time).cloned());
        self.finish("clock in", result, |record| EngineEvent::ClockedIn {
            staff_id: record.staff_id.clone(),
            date: record.date,
            time,
        })
    }

    /// Records a clock-out. Lateness is judged against the staff member's
    /// earliest assignment that day, if any.
    pub fn clock_out(
        &mut self,
        staff_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> EngineResult<AttendanceRecord> {
        let result = self.ensure_staff(staff_id).and_then(|()| {
            let scheduled_start = self.scheduler.scheduled_start(staff_id, date);
            self.attendance
                .clock_out(staff_id, date, time, scheduled_start)
                .cloned()
        });
        self.finish("clock out", result, |record| EngineEvent::ClockedOut {
            staff_id: record.staff_id.clone(),
            date: record.date,
            total_hours: record.total_hours.unwrap_or_default(),
            status: record.status,
        })
    }

    /// Attendance counts for `date` across the staff roster.
    pub fn attendance_kpi(&self, date: NaiveDate) -> AttendanceKpi {
        self.attendance.kpi(date, &self.staff)
    }

    // Payroll

    /// The payroll engine.
    pub fn payroll(&self) -> &PayrollEngine {
        &self.payroll
    }

    /// Generates a known staff member's slip for `month`, with hours taken
    /// from attendance.
    pub fn generate_slip(
        &mut self,
        staff_id: &str,
        month: MonthKey,
        components: &SalaryComponents,
        generated_date: NaiveDate,
    ) -> EngineResult<SalarySlip> {
        let result = self.ensure_staff(staff_id).and_then(|()| {
            let hours_worked = self.attendance.hours_worked(staff_id, month);
            self.payroll
                .generate_slip(staff_id, month, components, hours_worked, generated_date)
                .cloned()
        });
        self.finish("generate salary slip", result, |slip| {
            EngineEvent::SlipGenerated {
                slip_id: slip.id,
                staff_id: slip.staff_id.clone(),
                month: slip.month,
                net_salary: slip.net_salary,
            }
        })
    }

    /// Marks a generated slip as sent.
    pub fn mark_slip_sent(&mut self, id: SlipId) -> EngineResult<SalarySlip> {
        let result = self.payroll.mark_sent(id).cloned();
        self.finish("send salary slip", result, |slip| EngineEvent::SlipSent {
            slip_id: slip.id,
        })
    }

    /// Records a commission for a known staff member.
    pub fn record_commission(
        &mut self,
        staff_id: &str,
        sales_amount: Decimal,
        rate: Decimal,
        month: MonthKey,
    ) -> EngineResult<CommissionRecord> {
        let result = self.ensure_staff(staff_id).and_then(|()| {
            self.payroll
                .record_commission(staff_id, sales_amount, rate, month)
                .cloned()
        });
        self.finish("record commission", result, |record| {
            EngineEvent::CommissionRecorded {
                commission_id: record.id,
                staff_id: record.staff_id.clone(),
                amount: record.commission_amount,
            }
        })
    }

    /// Marks a commission as paid.
    pub fn pay_commission(&mut self, id: CommissionId, paid_date: NaiveDate) -> EngineResult<CommissionRecord> {
        let result = self.payroll.pay_commission(id, paid_date).cloned();
        self.finish("pay commission", result, |record| {
            EngineEvent::CommissionPaid {
                commission_id: record.id,
            }
        })
    }

    /// Slip rollup for `month`.
    pub fn salary_kpi(&self, month: MonthKey) -> SalaryKpi {
        self.payroll.salary_kpi(month)
    }

    /// Commission rollup for `month`.
    pub fn commission_kpi(&self, month: MonthKey) -> CommissionKpi {
        self.payroll.commission_kpi(month)
    }
}
