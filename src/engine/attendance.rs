//! Daily attendance tracking.
//!
//! One record per staff member per day. Records are created by the first
//! mark or clock-in of the day and are never deleted.

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::config::AttendanceSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceKpi, AttendanceRecord, AttendanceStatus, MonthKey, StaffMember, decimal_hours,
};

use super::ids::IdSequence;

/// Attendance records and clock events.
#[derive(Debug, Clone)]
pub struct AttendanceTracker {
    records: Vec<AttendanceRecord>,
    ids: IdSequence,
    late_grace: Duration,
}

impl AttendanceTracker {
    /// Creates a tracker over existing records.
    pub fn new(records: Vec<AttendanceRecord>, settings: &AttendanceSettings) -> Self {
        let ids = IdSequence::starting_after(records.iter().map(|r| r.id));
        Self {
            records,
            ids,
            late_grace: settings.late_grace(),
        }
    }

    /// All records, in creation order.
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Records for one day.
    pub fn records_on(&self, date: NaiveDate) -> Vec<&AttendanceRecord> {
        self.records.iter().filter(|r| r.date == date).collect()
    }

    /// The record for `staff_id` on `date`, if any.
    pub fn record(&self, staff_id: &str, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.is_for(staff_id, date))
    }

    /// Returns true if `staff_id` clocked in on `date`.
    pub fn has_clock_in(&self, staff_id: &str, date: NaiveDate) -> bool {
        self.record(staff_id, date)
            .is_some_and(|r| r.clock_in.is_some())
    }

    /// Returns true if the day's record keeps `staff_id` off the floor:
    /// marked absent or on leave, or already clocked out. Unmarked days are
    /// not away.
    pub fn is_away(&self, staff_id: &str, date: NaiveDate) -> bool {
        self.record(staff_id, date).is_some_and(|r| {
            r.clock_out.is_some() || r.status.excludes_clock_out()
        })
    }

    fn position(&self, staff_id: &str, date: NaiveDate) -> Option<usize> {
        self.records.iter().position(|r| r.is_for(staff_id, date))
    }

    fn insert(&mut self, staff_id: &str, date: NaiveDate, status: AttendanceStatus) -> usize {
        self.records.push(AttendanceRecord {
            id: self.ids.next_id(),
            staff_id: staff_id.to_string(),
            date,
            clock_in: None,
            clock_out: None,
            status,
            total_hours: None,
            notes: String::new(),
        });
        self.records.len() - 1
    }

    /// Sets the day's status, creating the record if needed.
    ///
    /// Last write wins. ABSENT and ON_LEAVE cannot be recorded over a day
    /// that already has a clock-out.
    pub fn mark_attendance(
        &mut self,
        staff_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> EngineResult<&AttendanceRecord> {
        let index = match self.position(staff_id, date) {
            Some(index) => {
                let record = &mut self.records[index];
                if record.clock_out.is_some() && status.excludes_clock_out() {
                    return Err(EngineError::validation(
                        "status",
                        format!(
                            "{} conflicts with the clock-out recorded for {} on {}",
                            status, staff_id, date
                        ),
                    ));
                }
                record.status = status;
                index
            }
            None => self.insert(staff_id, date, status),
        };
        Ok(&self.records[index])
    }

    /// Records the day's clock-in.
    ///
    /// A day previously marked ABSENT or ON_LEAVE becomes PRESENT.
    pub fn clock_in(&mut self, staff_id: &str, date: NaiveDate, time: NaiveTime) -> EngineResult<&AttendanceRecord> {
        let index = match self.position(staff_id, date) {
            Some(index) if self.records[index].clock_in.is_some() => {
                return Err(EngineError::DuplicateClockIn {
                    staff_id: staff_id.to_string(),
                    date,
                });
            }
            Some(index) => index,
            None => self.insert(staff_id, date, AttendanceStatus::Present),
        };

        let record = &mut self.records[index];
        record.clock_in = Some(time);
        if record.status.excludes_clock_out() {
            record.status = AttendanceStatus::Present;
        }
        Ok(record)
    }

    /// Records the day's clock-out and derives `total_hours` and status.
    ///
    /// The status becomes LATE when the clock-in came more than the grace
    /// period after `scheduled_start`, PRESENT otherwise. Without a
    /// scheduled start the day is PRESENT.
    pub fn clock_out(
        &mut self,
        staff_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        scheduled_start: Option<NaiveTime>,
    ) -> EngineResult<&AttendanceRecord> {
        let late_grace = self.late_grace;
        let record = self
            .position(staff_id, date)
            .map(|index| &mut self.records[index])
            .ok_or_else(|| no_clock_in(staff_id, date))?;

        let clock_in = record.clock_in.ok_or_else(|| no_clock_in(staff_id, date))?;
        if record.clock_out.is_some() {
            return Err(EngineError::validation(
                "clock_out",
                format!("{} already clocked out on {}", staff_id, date),
            ));
        }
        if time < clock_in {
            return Err(EngineError::validation(
                "clock_out",
                format!("{} is before clock-in at {}", time, clock_in),
            ));
        }

        record.clock_out = Some(time);
        record.total_hours = Some(decimal_hours((time - clock_in).num_minutes()));
        record.status = match scheduled_start {
            Some(start) if clock_in - start > late_grace => AttendanceStatus::Late,
            _ => AttendanceStatus::Present,
        };
        Ok(record)
    }

    /// Status counts for `date`; `unmarked` counts roster members with no
    /// record that day.
    pub fn kpi(&self, date: NaiveDate, staff: &[StaffMember]) -> AttendanceKpi {
        let mut kpi = AttendanceKpi {
            date,
            present: 0,
            absent: 0,
            late: 0,
            half_day: 0,
            on_leave: 0,
            unmarked: 0,
        };

        for record in self.records.iter().filter(|r| r.date == date) {
            match record.status {
                AttendanceStatus::Present => kpi.present += 1,
                AttendanceStatus::Absent => kpi.absent += 1,
                AttendanceStatus::Late => kpi.late += 1,
                AttendanceStatus::HalfDay => kpi.half_day += 1,
                AttendanceStatus::OnLeave => kpi.on_leave += 1,
            }
        }
        kpi.unmarked = staff
            .iter()
            .filter(|member| self.record(&member.id, date).is_none())
            .count() as u32;
        kpi
    }

    /// Sum of `total_hours` for `staff_id` over `month`.
    pub fn hours_worked(&self, staff_id: &str, month: MonthKey) -> Decimal {
        self.records
            .iter()
            .filter(|r| r.staff_id == staff_id && month.contains(r.date))
            .filter_map(|r| r.total_hours)
            .sum()
    }
}

fn no_clock_in(staff_id: &str, date: NaiveDate) -> EngineError {
    EngineError::validation(
        "clock_out",
        format!("{} has no clock-in on {}", staff_id, date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn tracker() -> AttendanceTracker {
        AttendanceTracker::new(Vec::new(), &AttendanceSettings::default())
    }

    #[test]
    fn test_mark_creates_then_overwrites() {
        let mut tracker = tracker();
        tracker
            .mark_attendance("STF-01", d(2), AttendanceStatus::Absent)
            .unwrap();
        let record = tracker
            .mark_attendance("STF-01", d(2), AttendanceStatus::HalfDay)
            .unwrap();

        assert_eq!(record.status, AttendanceStatus::HalfDay);
        assert_eq!(tracker.records().len(), 1);
    }

    #[test]
    fn test_mark_absent_after_clock_out_is_rejected() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        tracker.clock_out("STF-01", d(2), t(17, 0), None).unwrap();

        let result = tracker.mark_attendance("STF-01", d(2), AttendanceStatus::Absent);
        assert!(matches!(result, Err(EngineError::Validation { .. })));

        let result = tracker.mark_attendance("STF-01", d(2), AttendanceStatus::OnLeave);
        assert!(matches!(result, Err(EngineError::Validation { .. })));

        assert_eq!(
            tracker.record("STF-01", d(2)).unwrap().status,
            AttendanceStatus::Present
        );
    }

    #[test]
    fn test_mark_half_day_after_clock_out_is_allowed() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        tracker.clock_out("STF-01", d(2), t(13, 0), None).unwrap();
        let record = tracker
            .mark_attendance("STF-01", d(2), AttendanceStatus::HalfDay)
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_clock_in_creates_present_record() {
        let mut tracker = tracker();
        let record = tracker.clock_in("STF-01", d(2), t(9, 5)).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.clock_in, Some(t(9, 5)));
        assert!(tracker.has_clock_in("STF-01", d(2)));
        assert!(!tracker.has_clock_in("STF-01", d(3)));
    }

    #[test]
    fn test_second_clock_in_is_duplicate() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();

        match tracker.clock_in("STF-01", d(2), t(9, 30)) {
            Err(EngineError::DuplicateClockIn { staff_id, date }) => {
                assert_eq!(staff_id, "STF-01");
                assert_eq!(date, d(2));
            }
            other => panic!("Expected DuplicateClockIn, got {:?}", other),
        }
        assert_eq!(tracker.record("STF-01", d(2)).unwrap().clock_in, Some(t(9, 0)));
    }

    #[test]
    fn test_clock_in_over_absent_mark() {
        let mut tracker = tracker();
        tracker
            .mark_attendance("STF-01", d(2), AttendanceStatus::Absent)
            .unwrap();
        let record = tracker.clock_in("STF-01", d(2), t(10, 0)).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(tracker.records().len(), 1);
    }

    #[test]
    fn test_clock_out_computes_hours() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        let record = tracker.clock_out("STF-01", d(2), t(17, 30), None).unwrap();
        assert_eq!(record.total_hours, Some(dec("8.5")));
        assert_eq!(record.clock_out, Some(t(17, 30)));
    }

    #[test]
    fn test_clock_out_rounds_to_two_places() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        let record = tracker.clock_out("STF-01", d(2), t(9, 20), None).unwrap();
        assert_eq!(record.total_hours, Some(dec("0.33")));
    }

    #[test]
    fn test_clock_out_without_clock_in() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.clock_out("STF-01", d(2), t(17, 0), None),
            Err(EngineError::Validation { .. })
        ));

        tracker
            .mark_attendance("STF-01", d(2), AttendanceStatus::Present)
            .unwrap();
        assert!(matches!(
            tracker.clock_out("STF-01", d(2), t(17, 0), None),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_clock_out_before_clock_in() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        let result = tracker.clock_out("STF-01", d(2), t(8, 59), None);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
        assert!(tracker.record("STF-01", d(2)).unwrap().clock_out.is_none());
    }

    #[test]
    fn test_second_clock_out_is_rejected() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        tracker.clock_out("STF-01", d(2), t(17, 0), None).unwrap();
        let result = tracker.clock_out("STF-01", d(2), t(18, 0), None);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
        assert_eq!(
            tracker.record("STF-01", d(2)).unwrap().total_hours,
            Some(dec("8"))
        );
    }

    #[test]
    fn test_late_after_grace() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 16)).unwrap();
        let record = tracker
            .clock_out("STF-01", d(2), t(17, 0), Some(t(9, 0)))
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_within_grace_is_present() {
        let mut tracker = tracker();
        tracker.clock_in("STF-01", d(2), t(9, 15)).unwrap();
        let record = tracker
            .clock_out("STF-01", d(2), t(17, 0), Some(t(9, 0)))
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_configured_grace() {
        let settings = AttendanceSettings {
            late_grace_minutes: 5,
        };
        let mut tracker = AttendanceTracker::new(Vec::new(), &settings);
        tracker.clock_in("STF-01", d(2), t(9, 6)).unwrap();
        let record = tracker
            .clock_out("STF-01", d(2), t(17, 0), Some(t(9, 0)))
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_kpi_counts_and_unmarked() {
        let mut tracker = tracker();
        tracker
            .mark_attendance("STF-01", d(2), AttendanceStatus::Present)
            .unwrap();
        tracker
            .mark_attendance("STF-02", d(2), AttendanceStatus::OnLeave)
            .unwrap();
        tracker
            .mark_attendance("STF-03", d(2), AttendanceStatus::Late)
            .unwrap();
        tracker
            .mark_attendance("STF-01", d(3), AttendanceStatus::Absent)
            .unwrap();

        let staff = vec![
            StaffMember::new("STF-01", "Asha"),
            StaffMember::new("STF-02", "Ben"),
            StaffMember::new("STF-03", "Chen"),
            StaffMember::new("STF-04", "Dara"),
        ];
        let kpi = tracker.kpi(d(2), &staff);
        assert_eq!(kpi.present, 1);
        assert_eq!(kpi.on_leave, 1);
        assert_eq!(kpi.late, 1);
        assert_eq!(kpi.absent, 0);
        assert_eq!(kpi.unmarked, 1);
    }

    #[test]
    fn test_hours_worked_sums_month() {
        let mut tracker = tracker();
        for day in [2, 3] {
            tracker.clock_in("STF-01", d(day), t(9, 0)).unwrap();
            tracker.clock_out("STF-01", d(day), t(13, 30), None).unwrap();
        }
        let april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        tracker.clock_in("STF-01", april, t(9, 0)).unwrap();
        tracker.clock_out("STF-01", april, t(17, 0), None).unwrap();

        let march = MonthKey::from_str("2026-03").unwrap();
        assert_eq!(tracker.hours_worked("STF-01", march), dec("9"));
        assert_eq!(tracker.hours_worked("STF-02", march), Decimal::ZERO);
    }

    #[test]
    fn test_ids_resume_after_loaded_records() {
        let loaded = AttendanceRecord {
            id: 41,
            staff_id: "STF-09".to_string(),
            date: d(1),
            clock_in: None,
            clock_out: None,
            status: AttendanceStatus::Absent,
            total_hours: None,
            notes: String::new(),
        };
        let mut tracker = AttendanceTracker::new(vec![loaded], &AttendanceSettings::default());
        let record = tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        assert_eq!(record.id, 42);
    }

    #[test]
    fn test_is_away() {
        let mut tracker = tracker();
        assert!(!tracker.is_away("STF-01", d(2)));

        tracker.clock_in("STF-01", d(2), t(9, 0)).unwrap();
        assert!(!tracker.is_away("STF-01", d(2)));
        tracker.clock_out("STF-01", d(2), t(17, 0), None).unwrap();
        assert!(tracker.is_away("STF-01", d(2)));

        tracker
            .mark_attendance("STF-02", d(2), AttendanceStatus::OnLeave)
            .unwrap();
        assert!(tracker.is_away("STF-02", d(2)));
        tracker
            .mark_attendance("STF-03", d(2), AttendanceStatus::HalfDay)
            .unwrap();
        assert!(!tracker.is_away("STF-03", d(2)));
    }
}
