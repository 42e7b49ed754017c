//! Salary slips and commissions.
//!
//! ```text
//! slip:        (generate) --> GENERATED --mark_sent--> SENT
//! commission:  PENDING --pay--> PAID
//! ```
//!
//! A slip's commission is the sum of the staff member's commission records
//! for the slip month at the time the slip is generated.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CommissionId, CommissionKpi, CommissionRecord, CommissionStatus, MonthKey, SalaryComponents,
    SalaryKpi, SalarySlip, SlipId, SlipStatus, commission_amount,
};

use super::ids::IdSequence;

/// Salary slips and commission records.
#[derive(Debug, Clone)]
pub struct PayrollEngine {
    slips: Vec<SalarySlip>,
    commissions: Vec<CommissionRecord>,
    slip_ids: IdSequence,
    commission_ids: IdSequence,
}

impl PayrollEngine {
    /// Creates a payroll engine over existing slips and commissions.
    pub fn new(slips: Vec<SalarySlip>, commissions: Vec<CommissionRecord>) -> Self {
        let slip_ids = IdSequence::starting_after(slips.iter().map(|s| s.id));
        let commission_ids = IdSequence::starting_after(commissions.iter().map(|c| c.id));
        Self {
            slips,
            commissions,
            slip_ids,
            commission_ids,
        }
    }

    /// All salary slips.
    pub fn slips(&self) -> &[SalarySlip] {
        &self.slips
    }

    /// All commission records.
    pub fn commissions(&self) -> &[CommissionRecord] {
        &self.commissions
    }

    /// Slips for one month.
    pub fn slips_for(&self, month: MonthKey) -> Vec<&SalarySlip> {
        self.slips.iter().filter(|s| s.month == month).collect()
    }

    /// Commission records for one month.
    pub fn commissions_for(&self, month: MonthKey) -> Vec<&CommissionRecord> {
        self.commissions.iter().filter(|c| c.month == month).collect()
    }

    /// Sum of `staff_id`'s commission amounts for `month`.
    pub fn commission_total(&self, staff_id: &str, month: MonthKey) -> EngineResult<Decimal> {
        self.commissions
            .iter()
            .filter(|c| c.staff_id == staff_id && c.month == month)
            .try_fold(Decimal::ZERO, |total, c| {
                total.checked_add(c.commission_amount)
            })
            .ok_or_else(|| EngineError::validation("commission", "amount out of range"))
    }

    /// Generates the slip for `(staff_id, month)`.
    ///
    /// A slip already present for the pair is overwritten in place and keeps
    /// its id, whatever its status.
    ///
    /// # Example
    ///
    /// ```
    /// use staff_ops_engine::engine::PayrollEngine;
    /// use staff_ops_engine::models::{MonthKey, SalaryComponents, SlipStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let month: MonthKey = "2026-03".parse().unwrap();
    /// let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
    /// payroll
    ///     .record_commission("STF-03", Decimal::new(10000, 0), Decimal::new(5, 0), month)
    ///     .unwrap();
    ///
    /// let components = SalaryComponents {
    ///     basic_salary: Decimal::new(3000, 0),
    ///     tax: Decimal::new(300, 0),
    ///     ..Default::default()
    /// };
    /// let generated = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    /// let slip = payroll
    ///     .generate_slip("STF-03", month, &components, Decimal::ZERO, generated)
    ///     .unwrap();
    /// assert_eq!(slip.commission, Decimal::new(500, 0));
    /// assert_eq!(slip.net_salary, Decimal::new(3200, 0));
    /// assert_eq!(slip.status, SlipStatus::Generated);
    /// ```
    pub fn generate_slip(
        &mut self,
        staff_id: &str,
        month: MonthKey,
        components: &SalaryComponents,
        hours_worked: Decimal,
        generated_date: NaiveDate,
    ) -> EngineResult<&SalarySlip> {
        if let Some(field) = components.first_negative() {
            return Err(EngineError::validation(field, "must not be negative"));
        }

        let commission = self.commission_total(staff_id, month)?;
        let totals = components.totals(commission)?;
        let existing = self
            .slips
            .iter()
            .position(|s| s.staff_id == staff_id && s.month == month);
        let id = match existing {
            Some(index) => self.slips[index].id,
            None => self.slip_ids.next_id(),
        };

        let slip = SalarySlip {
            id,
            staff_id: staff_id.to_string(),
            month,
            basic_salary: components.basic_salary,
            hra: components.hra,
            commission,
            bonus: components.bonus,
            gross_salary: totals.gross,
            pf: components.pf,
            tax: components.tax,
            deductions: totals.deductions,
            net_salary: totals.net,
            hours_worked,
            status: SlipStatus::Generated,
            generated_date: Some(generated_date),
        };
        let index = match existing {
            Some(index) => {
                self.slips[index] = slip;
                index
            }
            None => {
                self.slips.push(slip);
                self.slips.len() - 1
            }
        };
        Ok(&self.slips[index])
    }

    /// Marks a generated slip as sent.
    pub fn mark_sent(&mut self, id: SlipId) -> EngineResult<&SalarySlip> {
        let slip = self
            .slips
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::not_found("salary slip", id))?;

        if slip.status != SlipStatus::Generated {
            return Err(EngineError::invalid_transition(
                "salary slip",
                id,
                slip.status,
                SlipStatus::Sent,
            ));
        }
        slip.status = SlipStatus::Sent;
        Ok(slip)
    }

    /// Records a PENDING commission of `rate` percent on `sales_amount`.
    pub fn record_commission(
        &mut self,
        staff_id: &str,
        sales_amount: Decimal,
        rate: Decimal,
        month: MonthKey,
    ) -> EngineResult<&CommissionRecord> {
        if sales_amount < Decimal::ZERO {
            return Err(EngineError::validation(
                "sales_amount",
                "must not be negative",
            ));
        }
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(EngineError::validation(
                "commission_rate",
                format!("{} is outside 0-100", rate),
            ));
        }

        let amount = commission_amount(sales_amount, rate)?;
        self.commissions.push(CommissionRecord {
            id: self.commission_ids.next_id(),
            staff_id: staff_id.to_string(),
            sales_amount,
            commission_rate: rate,
            commission_amount: amount,
            month,
            status: CommissionStatus::Pending,
            paid_date: None,
        });
        Ok(&self.commissions[self.commissions.len() - 1])
    }

    /// Marks a pending commission as paid on `paid_date`.
    pub fn pay_commission(&mut self, id: CommissionId, paid_date: NaiveDate) -> EngineResult<&CommissionRecord> {
        let record = self
            .commissions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::not_found("commission", id))?;

        if record.status != CommissionStatus::Pending {
            return Err(EngineError::invalid_transition(
                "commission",
                id,
                record.status,
                CommissionStatus::Paid,
            ));
        }
        record.status = CommissionStatus::Paid;
        record.paid_date = Some(paid_date);
        Ok(record)
    }

    /// Slip counts and totals for `month`. Totals saturate at the `Decimal`
    /// bounds.
    pub fn salary_kpi(&self, month: MonthKey) -> SalaryKpi {
        let mut kpi = SalaryKpi {
            month,
            slips: 0,
            pending: 0,
            generated: 0,
            sent: 0,
            total_gross: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_net: Decimal::ZERO,
        };
        for slip in self.slips.iter().filter(|s| s.month == month) {
            kpi.slips += 1;
            match slip.status {
                SlipStatus::Pending => kpi.pending += 1,
                SlipStatus::Generated => kpi.generated += 1,
                SlipStatus::Sent => kpi.sent += 1,
            }
            kpi.total_gross = kpi.total_gross.saturating_add(slip.gross_salary);
            kpi.total_deductions = kpi.total_deductions.saturating_add(slip.deductions);
            kpi.total_net = kpi.total_net.saturating_add(slip.net_salary);
        }
        kpi
    }

    /// Commission counts and totals for `month`. Totals saturate at the
    /// `Decimal` bounds.
    pub fn commission_kpi(&self, month: MonthKey) -> CommissionKpi {
        let mut kpi = CommissionKpi {
            month,
            records: 0,
            total_amount: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
        };
        for record in self.commissions.iter().filter(|c| c.month == month) {
            kpi.records += 1;
            kpi.total_amount = kpi.total_amount.saturating_add(record.commission_amount);
            match record.status {
                CommissionStatus::Pending => {
                    kpi.pending_amount = kpi.pending_amount.saturating_add(record.commission_amount)
                }
                CommissionStatus::Paid => {
                    kpi.paid_amount = kpi.paid_amount.saturating_add(record.commission_amount)
                }
            }
        }
        kpi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::from_str(s).unwrap()
    }

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn components() -> SalaryComponents {
        SalaryComponents {
            basic_salary: dec("3000.00"),
            hra: dec("600.00"),
            bonus: dec("150.00"),
            pf: dec("360.00"),
            tax: dec("240.50"),
        }
    }

    #[test]
    fn test_record_commission_five_percent() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let record = payroll
            .record_commission("STF-03", dec("10000"), dec("5"), month("2026-03"))
            .unwrap();
        assert_eq!(record.commission_amount, dec("500.00"));
        assert_eq!(record.status, CommissionStatus::Pending);
        assert!(record.paid_date.is_none());
    }

    #[test]
    fn test_record_commission_rejects_bad_input() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        assert!(matches!(
            payroll.record_commission("STF-03", dec("-1"), dec("5"), march),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            payroll.record_commission("STF-03", dec("100"), dec("100.01"), march),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            payroll.record_commission("STF-03", dec("100"), dec("-0.5"), march),
            Err(EngineError::Validation { .. })
        ));
        assert!(payroll.commissions().is_empty());
    }

    #[test]
    fn test_rate_bounds_are_inclusive() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        assert!(payroll.record_commission("STF-03", dec("80"), dec("0"), march).is_ok());
        let record = payroll
            .record_commission("STF-03", dec("80"), dec("100"), march)
            .unwrap();
        assert_eq!(record.commission_amount, dec("80.00"));
    }

    #[test]
    fn test_pay_commission_once() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        payroll
            .record_commission("STF-03", dec("10000"), dec("5"), month("2026-03"))
            .unwrap();

        let record = payroll.pay_commission(1, make_date(2026, 4, 1)).unwrap();
        assert_eq!(record.status, CommissionStatus::Paid);
        assert_eq!(record.paid_date, Some(make_date(2026, 4, 1)));

        let again = payroll.pay_commission(1, make_date(2026, 4, 2));
        assert!(matches!(again, Err(EngineError::InvalidTransition { .. })));
        assert_eq!(payroll.commissions()[0].paid_date, Some(make_date(2026, 4, 1)));
    }

    #[test]
    fn test_pay_unknown_commission() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        assert!(matches!(
            payroll.pay_commission(3, make_date(2026, 4, 1)),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_generate_slip_derives_totals() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        payroll
            .record_commission("STF-01", dec("2000"), dec("2.5"), march)
            .unwrap();
        payroll
            .record_commission("STF-01", dec("1000"), dec("3"), march)
            .unwrap();
        payroll
            .record_commission("STF-01", dec("5000"), dec("10"), month("2026-02"))
            .unwrap();
        payroll
            .record_commission("STF-02", dec("5000"), dec("10"), march)
            .unwrap();

        let slip = payroll
            .generate_slip("STF-01", march, &components(), dec("160"), make_date(2026, 3, 31))
            .unwrap();

        assert_eq!(slip.commission, dec("80.00"));
        assert_eq!(slip.gross_salary, dec("3830.00"));
        assert_eq!(slip.deductions, dec("600.50"));
        assert_eq!(slip.net_salary, dec("3229.50"));
        assert_eq!(slip.hours_worked, dec("160"));
        assert_eq!(slip.status, SlipStatus::Generated);
        assert_eq!(slip.generated_date, Some(make_date(2026, 3, 31)));
    }

    #[test]
    fn test_regenerate_overwrites_and_keeps_id() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        payroll
            .generate_slip("STF-01", march, &components(), Decimal::ZERO, make_date(2026, 3, 30))
            .unwrap();
        payroll
            .generate_slip("STF-02", march, &components(), Decimal::ZERO, make_date(2026, 3, 30))
            .unwrap();
        payroll.mark_sent(1).unwrap();

        let mut raised = components();
        raised.basic_salary = dec("3500.00");
        let slip = payroll
            .generate_slip("STF-01", march, &raised, Decimal::ZERO, make_date(2026, 3, 31))
            .unwrap();

        assert_eq!(slip.id, 1);
        assert_eq!(slip.basic_salary, dec("3500.00"));
        assert_eq!(slip.status, SlipStatus::Generated);
        assert_eq!(payroll.slips().len(), 2);
    }

    #[test]
    fn test_generate_slip_rejects_negative_component() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let mut bad = components();
        bad.pf = dec("-10");
        let result =
            payroll.generate_slip("STF-01", month("2026-03"), &bad, Decimal::ZERO, make_date(2026, 3, 31));
        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "pf"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert!(payroll.slips().is_empty());
    }

    #[test]
    fn test_mark_sent_only_from_generated() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        payroll
            .generate_slip("STF-01", month("2026-03"), &components(), Decimal::ZERO, make_date(2026, 3, 31))
            .unwrap();

        assert_eq!(payroll.mark_sent(1).unwrap().status, SlipStatus::Sent);
        assert!(matches!(
            payroll.mark_sent(1),
            Err(EngineError::InvalidTransition { .. })
        ));
        assert!(matches!(
            payroll.mark_sent(2),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_salary_kpi_rollup() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        for staff_id in ["STF-01", "STF-02"] {
            payroll
                .generate_slip(staff_id, march, &components(), Decimal::ZERO, make_date(2026, 3, 31))
                .unwrap();
        }
        payroll
            .generate_slip("STF-01", month("2026-04"), &components(), Decimal::ZERO, make_date(2026, 4, 30))
            .unwrap();
        payroll.mark_sent(2).unwrap();

        let kpi = payroll.salary_kpi(march);
        assert_eq!(kpi.slips, 2);
        assert_eq!(kpi.generated, 1);
        assert_eq!(kpi.sent, 1);
        assert_eq!(kpi.total_gross, dec("7500.00"));
        assert_eq!(kpi.total_deductions, dec("1201.00"));
        assert_eq!(kpi.total_net, dec("6299.00"));
    }

    #[test]
    fn test_commission_kpi_rollup() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        payroll
            .record_commission("STF-03", dec("10000"), dec("5"), march)
            .unwrap();
        payroll
            .record_commission("STF-04", dec("2000"), dec("4"), march)
            .unwrap();
        payroll.pay_commission(1, make_date(2026, 4, 1)).unwrap();

        let kpi = payroll.commission_kpi(march);
        assert_eq!(kpi.records, 2);
        assert_eq!(kpi.total_amount, dec("580.00"));
        assert_eq!(kpi.paid_amount, dec("500.00"));
        assert_eq!(kpi.pending_amount, dec("80.00"));
    }

    #[test]
    fn test_commission_overflow_is_rejected_without_recording() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let sales = Decimal::from_i128_with_scale(10_i128.pow(27), 0);

        let err = payroll
            .record_commission("STF-01", sales, dec("100"), month("2026-03"))
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "sales_amount"));
        assert!(payroll.commissions().is_empty());

        // the id was not consumed
        let record = payroll
            .record_commission("STF-01", dec("100"), dec("10"), month("2026-03"))
            .unwrap();
        assert_eq!(record.id, 1);
    }

    #[test]
    fn test_slip_overflow_is_rejected_without_storing() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let huge = SalaryComponents {
            basic_salary: Decimal::MAX,
            hra: Decimal::MAX,
            ..Default::default()
        };

        let err = payroll
            .generate_slip("STF-01", month("2026-03"), &huge, Decimal::ZERO, make_date(2026, 3, 31))
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "gross_salary"));
        assert!(payroll.slips().is_empty());
    }

    #[test]
    fn test_salary_kpi_saturates_instead_of_overflowing() {
        let mut payroll = PayrollEngine::new(Vec::new(), Vec::new());
        let march = month("2026-03");
        let large = SalaryComponents {
            basic_salary: Decimal::MAX,
            ..Default::default()
        };
        for staff_id in ["STF-01", "STF-02"] {
            payroll
                .generate_slip(staff_id, march, &large, Decimal::ZERO, make_date(2026, 3, 31))
                .unwrap();
        }

        let kpi = payroll.salary_kpi(march);
        assert_eq!(kpi.slips, 2);
        assert_eq!(kpi.total_gross, Decimal::MAX);
    }
}
