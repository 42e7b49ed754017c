//! Shift templates and assignments.
//!
//! Assignment status advances against a caller-supplied "now":
//!
//! ```text
//! SCHEDULED --now in [start,end)--> ACTIVE --now >= end--> COMPLETED
//! SCHEDULED --now >= end, clocked in------------------> COMPLETED
//! SCHEDULED --now >= end, no clock-in-----------------> MISSED
//! ```

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::TieBreak;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssignmentId, AssignmentStatus, NO_CURRENT_SHIFT, ShiftAssignment, ShiftId, ShiftKpi,
    ShiftTemplate, StaffMember, TemplateUpdate, window_on,
};

use super::attendance::AttendanceTracker;
use super::ids::IdSequence;
use super::leave::LeaveWorkflow;

/// One assignment status change made by [`ShiftScheduler::advance_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// The assignment that moved.
    pub assignment_id: AssignmentId,
    /// Status before.
    pub from: AssignmentStatus,
    /// Status after.
    pub to: AssignmentStatus,
}

/// Shift templates, the assignments placed on them, and roster generation.
#[derive(Debug, Clone)]
pub struct ShiftScheduler {
    pub(super) templates: Vec<ShiftTemplate>,
    pub(super) assignments: Vec<ShiftAssignment>,
    template_ids: IdSequence,
    assignment_ids: IdSequence,
    pub(super) tie_break: TieBreak,
}

impl ShiftScheduler {
    /// Creates a scheduler over existing templates and assignments.
    pub fn new(templates: Vec<ShiftTemplate>, assignments: Vec<ShiftAssignment>, tie_break: TieBreak) -> Self {
        let template_ids = IdSequence::starting_after(templates.iter().map(|t| t.id));
        let assignment_ids = IdSequence::starting_after(assignments.iter().map(|a| a.id));
        Self {
            templates,
            assignments,
            template_ids,
            assignment_ids,
            tie_break,
        }
    }

    /// All templates, active or not.
    pub fn templates(&self) -> &[ShiftTemplate] {
        &self.templates
    }

    /// All assignments, in creation order.
    pub fn assignments(&self) -> &[ShiftAssignment] {
        &self.assignments
    }

    /// Looks up a template by id.
    pub fn template(&self, id: ShiftId) -> EngineResult<&ShiftTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::not_found("shift template", id))
    }

    /// Looks up an assignment by id.
    pub fn assignment(&self, id: AssignmentId) -> EngineResult<&ShiftAssignment> {
        self.assignments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| EngineError::not_found("shift assignment", id))
    }

    fn template_mut(&mut self, id: ShiftId) -> EngineResult<&mut ShiftTemplate> {
        self.templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::not_found("shift template", id))
    }

    /// Creates an active template.
    ///
    /// An end time at or before the start time wraps past midnight. Equal
    /// start and end times are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use staff_ops_engine::config::TieBreak;
    /// use staff_ops_engine::engine::ShiftScheduler;
    /// use chrono::NaiveTime;
    /// use rust_decimal::Decimal;
    ///
    /// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    /// let mut scheduler = ShiftScheduler::new(Vec::new(), Vec::new(), TieBreak::RosterOrder);
    /// let night = scheduler.create_template("Night", t(22), t(6)).unwrap();
    /// assert_eq!(night.duration_hours, Decimal::new(8, 0));
    /// ```
    pub fn create_template(&mut self, name: &str, start_time: NaiveTime, end_time: NaiveTime) -> EngineResult<&ShiftTemplate> {
        let name = validate_name(name)?;
        validate_window(start_time, end_time)?;

        let id = self.template_ids.next_id();
        self.templates
            .push(ShiftTemplate::new(id, name, start_time, end_time));
        Ok(&self.templates[self.templates.len() - 1])
    }

    /// Applies a partial update. Existing assignments keep the times they
    /// were created with.
    pub fn update_template(&mut self, id: ShiftId, update: TemplateUpdate) -> EngineResult<&ShiftTemplate> {
        let current = self.template(id)?;
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let start_time = update.start_time.unwrap_or(current.start_time);
        let end_time = update.end_time.unwrap_or(current.end_time);
        validate_window(start_time, end_time)?;

        let template = self.template_mut(id)?;
        if let Some(name) = name {
            template.name = name;
        }
        template.retime(start_time, end_time);
        if let Some(is_active) = update.is_active {
            template.is_active = is_active;
        }
        Ok(template)
    }

    /// Soft-disables a template. Existing assignments are unaffected; new
    /// assignments to it are rejected.
    pub fn deactivate_template(&mut self, id: ShiftId) -> EngineResult<&ShiftTemplate> {
        let template = self.template_mut(id)?;
        template.is_active = false;
        Ok(template)
    }

    /// Places `staff_id` on template `shift_id` for `date`.
    ///
    /// Checked in order: the template exists, it is active, no approved
    /// leave covers the date, and the window does not overlap another of
    /// the staff member's assignments that day.
    pub fn assign(
        &mut self,
        staff_id: &str,
        shift_id: ShiftId,
        date: NaiveDate,
        leave: &LeaveWorkflow,
    ) -> EngineResult<&ShiftAssignment> {
        let template = self.template(shift_id)?;
        if !template.is_active {
            return Err(EngineError::validation(
                "shift_id",
                format!("shift template {} is inactive", shift_id),
            ));
        }
        let (start_time, end_time) = (template.start_time, template.end_time);

        if let Some(request) = leave.approved_leave_on(staff_id, date) {
            return Err(EngineError::LeaveConflict {
                staff_id: staff_id.to_string(),
                date,
                leave_id: request.id,
            });
        }
        if let Some(existing) = self.find_overlap(staff_id, date, start_time, end_time) {
            return Err(EngineError::Conflict {
                staff_id: staff_id.to_string(),
                date,
                existing_assignment: existing.id,
            });
        }

        let index = self.insert_assignment(staff_id, shift_id, date, start_time, end_time);
        Ok(&self.assignments[index])
    }

    pub(super) fn insert_assignment(
        &mut self,
        staff_id: &str,
        shift_id: ShiftId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> usize {
        self.assignments.push(ShiftAssignment {
            id: self.assignment_ids.next_id(),
            staff_id: staff_id.to_string(),
            shift_id,
            date,
            start_time,
            end_time,
            status: AssignmentStatus::Scheduled,
        });
        self.assignments.len() - 1
    }

    /// The first assignment of `staff_id` whose window overlaps
    /// `[start_time, end_time)` on `date`.
    ///
    /// Windows are at most a day long, so only assignments dated the day
    /// before, the day itself, or the day after can overlap.
    pub fn find_overlap(
        &self,
        staff_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Option<&ShiftAssignment> {
        let (start, end) = window_on(date, start_time, end_time);
        self.assignments
            .iter()
            .filter(|a| a.staff_id == staff_id && (a.date - date).num_days().abs() <= 1)
            .find(|a| a.overlaps(start, end))
    }

    /// Earliest assignment start for `staff_id` on `date`.
    pub fn scheduled_start(&self, staff_id: &str, date: NaiveDate) -> Option<NaiveTime> {
        self.assignments
            .iter()
            .filter(|a| a.staff_id == staff_id && a.date == date)
            .map(|a| a.start_time)
            .min()
    }

    /// Moves one assignment along its state machine as of `now`.
    ///
    /// Terminal assignments are returned unchanged.
    pub fn advance_status(
        &mut self,
        id: AssignmentId,
        now: NaiveDateTime,
        attendance: &AttendanceTracker,
    ) -> EngineResult<&ShiftAssignment> {
        let assignment = self
            .assignments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| EngineError::not_found("shift assignment", id))?;

        let clocked_in = attendance.has_clock_in(&assignment.staff_id, assignment.date);
        assignment.status = next_status(assignment, now, clocked_in);
        Ok(assignment)
    }

    /// Advances every non-terminal assignment as of `now` and returns the
    /// changes made.
    pub fn advance_all(&mut self, now: NaiveDateTime, attendance: &AttendanceTracker) -> Vec<StatusChange> {
        let mut changed = Vec::new();
        for assignment in self.assignments.iter_mut().filter(|a| !a.status.is_terminal()) {
            let clocked_in = attendance.has_clock_in(&assignment.staff_id, assignment.date);
            let next = next_status(assignment, now, clocked_in);
            if next != assignment.status {
                changed.push(StatusChange {
                    assignment_id: assignment.id,
                    from: assignment.status,
                    to: next,
                });
                assignment.status = next;
            }
        }
        changed
    }

    /// Shift coverage as of `now` across `staff`.
    ///
    /// A member is on duty when they hold an active assignment covering
    /// `now` and attendance for that assignment's day does not show them
    /// away (see [`AttendanceTracker::is_away`]).
    pub fn kpi(
        &self,
        now: NaiveDateTime,
        staff: &[StaffMember],
        attendance: &AttendanceTracker,
    ) -> ShiftKpi {
        let running: Vec<&ShiftAssignment> = self
            .assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Active && a.covers(now))
            .collect();

        let active_shifts: HashSet<ShiftId> = running.iter().map(|a| a.shift_id).collect();
        let on_duty_ids: HashSet<&str> = running
            .iter()
            .filter(|a| !attendance.is_away(&a.staff_id, a.date))
            .map(|a| a.staff_id.as_str())
            .collect();
        let on_duty = staff
            .iter()
            .filter(|member| on_duty_ids.contains(member.id.as_str()))
            .count() as u32;

        let current_shift = running
            .iter()
            .min_by_key(|a| (a.window().0, a.shift_id))
            .and_then(|a| self.template(a.shift_id).ok())
            .map_or_else(|| NO_CURRENT_SHIFT.to_string(), |t| t.name.clone());

        ShiftKpi {
            active_shifts: active_shifts.len() as u32,
            on_duty,
            off_duty: staff.len() as u32 - on_duty,
            current_shift,
            total_templates: self.templates.len() as u32,
            scheduled_today: self
                .assignments
                .iter()
                .filter(|a| a.date == now.date() && a.status == AssignmentStatus::Scheduled)
                .count() as u32,
        }
    }
}

fn next_status(assignment: &ShiftAssignment, now: NaiveDateTime, clocked_in: bool) -> AssignmentStatus {
    let (start, end) = assignment.window();
    match assignment.status {
        AssignmentStatus::Scheduled if now >= end && clocked_in => AssignmentStatus::Completed,
        AssignmentStatus::Scheduled if now >= end => AssignmentStatus::Missed,
        AssignmentStatus::Scheduled if now >= start => AssignmentStatus::Active,
        AssignmentStatus::Active if now >= end => AssignmentStatus::Completed,
        status => status,
    }
}

fn validate_name(name: &str) -> EngineResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_window(start_time: NaiveTime, end_time: NaiveTime) -> EngineResult<()> {
    if start_time == end_time {
        return Err(EngineError::validation(
            "end_time",
            "must differ from start time",
        ));
    }
    Ok(())
}
