//! Roster generation.
//!
//! Fills every active template on every date of a range up to a target
//! headcount. Candidates are staff with no approved leave that day and no
//! overlapping assignment, ordered by how many assignments they already
//! hold in the range and then by the configured tie-break.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TieBreak;
use crate::error::{EngineError, EngineResult};
use crate::models::{ShiftAssignment, ShiftId, StaffMember};

use super::leave::LeaveWorkflow;
use super::scheduler::ShiftScheduler;

/// A template/date pair that could not be filled to the target headcount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// The date that is short.
    pub date: NaiveDate,
    /// The template that is short.
    pub shift_id: ShiftId,
    /// The template's name.
    pub shift_name: String,
    /// The target headcount.
    pub required: u32,
    /// Assignments in place after generation.
    pub filled: u32,
}

/// The outcome of a roster generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterReport {
    /// Assignments created by this run, in creation order.
    pub created: Vec<ShiftAssignment>,
    /// Slots left below the target headcount.
    pub shortfalls: Vec<Shortfall>,
}

impl RosterReport {
    /// Returns true if every slot reached the target headcount.
    pub fn is_fully_staffed(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

impl ShiftScheduler {
    /// Generates SCHEDULED assignments for `start..=end`.
    ///
    /// Assignments that already exist for a template and date count toward
    /// `headcount`. Slots that cannot be filled are reported as shortfalls;
    /// they never fail the run.
    pub fn auto_generate_roster(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        headcount: u32,
        staff: &[StaffMember],
        leave: &LeaveWorkflow,
    ) -> EngineResult<RosterReport> {
        if end < start {
            return Err(EngineError::validation(
                "end_date",
                format!("{} is before start date {}", end, start),
            ));
        }
        if headcount == 0 {
            return Err(EngineError::validation("headcount", "must be at least 1"));
        }

        let mut templates: Vec<_> = self
            .templates
            .iter()
            .filter(|t| t.is_active)
            .map(|t| (t.id, t.name.clone(), t.start_time, t.end_time))
            .collect();
        templates.sort_by_key(|(id, _, start_time, _)| (*start_time, *id));

        let mut load: Vec<u32> = staff
            .iter()
            .map(|member| {
                self.assignments
                    .iter()
                    .filter(|a| a.staff_id == member.id && a.date >= start && a.date <= end)
                    .count() as u32
            })
            .collect();

        let mut report = RosterReport::default();
        for date in start.iter_days().take_while(|date| *date <= end) {
            for (shift_id, shift_name, start_time, end_time) in &templates {
                let mut filled = self
                    .assignments
                    .iter()
                    .filter(|a| a.shift_id == *shift_id && a.date == date)
                    .count() as u32;
                if filled >= headcount {
                    continue;
                }

                let mut candidates: Vec<usize> = (0..staff.len())
                    .filter(|&i| !leave.is_on_approved_leave(&staff[i].id, date))
                    .filter(|&i| {
                        self.find_overlap(&staff[i].id, date, *start_time, *end_time)
                            .is_none()
                    })
                    .collect();
                candidates.sort_by(|&a, &b| {
                    load[a].cmp(&load[b]).then_with(|| match self.tie_break {
                        TieBreak::RosterOrder => a.cmp(&b),
                        TieBreak::StaffId => staff[a].id.cmp(&staff[b].id),
                    })
                });

                for i in candidates.into_iter().take((headcount - filled) as usize) {
                    let index =
                        self.insert_assignment(&staff[i].id, *shift_id, date, *start_time, *end_time);
                    load[i] += 1;
                    filled += 1;
                    debug!(
                        staff_id = %staff[i].id,
                        shift = %shift_name,
                        date = %date,
                        load = load[i],
                        "Rostered staff"
                    );
                    report.created.push(self.assignments[index].clone());
                }

                if filled < headcount {
                    debug!(
                        shift = %shift_name,
                        date = %date,
                        required = headcount,
                        filled,
                        "Roster slot short"
                    );
                    report.shortfalls.push(Shortfall {
                        date,
                        shift_id: *shift_id,
                        shift_name: shift_name.clone(),
                        required: headcount,
                        filled,
                    });
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LeaveSubmission;
    use crate::models::{AssignmentStatus, LeaveType};
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn staff(ids: &[&str]) -> Vec<StaffMember> {
        ids.iter().map(|id| StaffMember::new(*id, *id)).collect()
    }

    fn scheduler(tie_break: TieBreak) -> ShiftScheduler {
        let mut scheduler = ShiftScheduler::new(Vec::new(), Vec::new(), tie_break);
        scheduler.create_template("Lunch", t(11), t(15)).unwrap();
        scheduler.create_template("Dinner", t(17), t(22)).unwrap();
        scheduler
    }

    fn approved_leave(staff_id: &str, start: NaiveDate, end: NaiveDate) -> LeaveWorkflow {
        let mut leave = LeaveWorkflow::new(Vec::new());
        leave
            .submit(
                LeaveSubmission {
                    staff_id: staff_id.to_string(),
                    leave_type: LeaveType::Earned,
                    start_date: start,
                    end_date: end,
                    reason: String::new(),
                },
                start,
            )
            .unwrap();
        leave.approve(1, "Manager", start).unwrap();
        leave
    }

    #[test]
    fn test_fills_every_slot() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let roster = staff(&["STF-01", "STF-02", "STF-03", "STF-04"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(2), 2, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();

        assert_eq!(report.created.len(), 8);
        assert!(report.is_fully_staffed());
        assert!(
            report
                .created
                .iter()
                .all(|a| a.status == AssignmentStatus::Scheduled)
        );
    }

    #[test]
    fn test_balances_load() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let roster = staff(&["STF-01", "STF-02", "STF-03", "STF-04"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(2), 2, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();

        for member in &roster {
            let count = report
                .created
                .iter()
                .filter(|a| a.staff_id == member.id)
                .count();
            assert_eq!(count, 2, "{} should hold two shifts", member.id);
        }
    }

    #[test]
    fn test_roster_order_tie_break() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let roster = staff(&["STF-09", "STF-01"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(1), 1, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();
        assert_eq!(report.created[0].staff_id, "STF-09");
        assert_eq!(report.created[1].staff_id, "STF-01");
    }

    #[test]
    fn test_staff_id_tie_break() {
        let mut scheduler = scheduler(TieBreak::StaffId);
        let roster = staff(&["STF-09", "STF-01"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(1), 1, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();
        assert_eq!(report.created[0].staff_id, "STF-01");
    }

    #[test]
    fn test_skips_staff_on_approved_leave() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let roster = staff(&["STF-01", "STF-02"]);
        let leave = approved_leave("STF-01", d(1), d(3));
        let report = scheduler
            .auto_generate_roster(d(1), d(3), 1, &roster, &leave)
            .unwrap();

        assert!(report.created.iter().all(|a| a.staff_id != "STF-01"));
        assert_eq!(report.created.len(), 6);
    }

    #[test]
    fn test_reports_shortfalls() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let roster = staff(&["STF-01"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(1), 2, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.shortfalls.len(), 2);
        assert_eq!(report.shortfalls[0].shift_name, "Lunch");
        assert_eq!(report.shortfalls[0].filled, 1);
        assert_eq!(report.shortfalls[0].required, 2);
    }

    #[test]
    fn test_existing_assignments_count_toward_headcount() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let leave = LeaveWorkflow::new(Vec::new());
        scheduler.assign("STF-02", 1, d(1), &leave).unwrap();

        let roster = staff(&["STF-01", "STF-02"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(1), 1, &roster, &leave)
            .unwrap();

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].shift_id, 2);
        assert_eq!(report.created[0].staff_id, "STF-01");
    }

    #[test]
    fn test_never_creates_overlaps() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        scheduler.create_template("Brunch", t(10), t(13)).unwrap();
        let roster = staff(&["STF-01", "STF-02"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(1), 2, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();

        for a in scheduler.assignments() {
            for b in scheduler.assignments() {
                if a.id != b.id && a.staff_id == b.staff_id {
                    let (start, end) = b.window();
                    assert!(!a.overlaps(start, end), "{:?} overlaps {:?}", a, b);
                }
            }
        }
        assert!(!report.is_fully_staffed());
    }

    #[test]
    fn test_skips_inactive_templates() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        scheduler.deactivate_template(2).unwrap();
        let roster = staff(&["STF-01"]);
        let report = scheduler
            .auto_generate_roster(d(1), d(1), 1, &roster, &LeaveWorkflow::new(Vec::new()))
            .unwrap();
        assert!(report.created.iter().all(|a| a.shift_id == 1));
    }

    #[test]
    fn test_rejects_reversed_range() {
        let mut scheduler = scheduler(TieBreak::RosterOrder);
        let result = scheduler.auto_generate_roster(
            d(2),
            d(1),
            1,
            &staff(&["STF-01"]),
            &LeaveWorkflow::new(Vec::new()),
        );
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }
}
