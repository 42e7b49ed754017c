//! Salary slip and commission models.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{CommissionId, MonthKey, SlipId};

/// Rounds a monetary amount to two decimal places, half-up.
///
/// # Example
///
/// ```
/// use staff_ops_engine::models::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round2(Decimal::from_str("2.344").unwrap()), Decimal::from_str("2.34").unwrap());
/// ```
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Lifecycle state of a salary slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlipStatus {
    /// Placeholder slip not yet computed.
    Pending,
    /// Computed and ready to send.
    Generated,
    /// Delivered to the staff member.
    Sent,
}

impl fmt::Display for SlipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlipStatus::Pending => "pending",
            SlipStatus::Generated => "generated",
            SlipStatus::Sent => "sent",
        })
    }
}

/// A monthly salary slip for one staff member.
///
/// `gross_salary`, `deductions` and `net_salary` are derived from the
/// components; use [`SalaryComponents::totals`] to compute them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySlip {
    /// Unique identifier. Kept when the slip is regenerated.
    pub id: SlipId,
    /// The staff member paid.
    pub staff_id: String,
    /// The month the slip covers.
    pub month: MonthKey,
    /// Basic salary.
    pub basic_salary: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Sum of the month's commission records.
    pub commission: Decimal,
    /// Discretionary bonus.
    pub bonus: Decimal,
    /// basic + hra + commission + bonus.
    pub gross_salary: Decimal,
    /// Provident fund deduction.
    pub pf: Decimal,
    /// Tax deduction.
    pub tax: Decimal,
    /// pf + tax.
    pub deductions: Decimal,
    /// gross - deductions.
    pub net_salary: Decimal,
    /// Hours recorded by attendance during the month.
    #[serde(default)]
    pub hours_worked: Decimal,
    /// Lifecycle state.
    pub status: SlipStatus,
    /// When the slip was last generated.
    #[serde(default)]
    pub generated_date: Option<NaiveDate>,
}

/// The caller-supplied salary components for a slip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Basic salary.
    pub basic_salary: Decimal,
    /// House rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Discretionary bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Provident fund deduction.
    #[serde(default)]
    pub pf: Decimal,
    /// Tax deduction.
    #[serde(default)]
    pub tax: Decimal,
}

/// Derived slip totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlipTotals {
    /// basic + hra + commission + bonus.
    pub gross: Decimal,
    /// pf + tax.
    pub deductions: Decimal,
    /// gross - deductions.
    pub net: Decimal,
}

impl SalaryComponents {
    /// Derives gross, deductions and net for a given commission.
    ///
    /// Fails with `Validation` when a total does not fit in a `Decimal`.
    ///
    /// # Example
    ///
    /// ```
    /// use staff_ops_engine::models::SalaryComponents;
    /// use rust_decimal::Decimal;
    ///
    /// let components = SalaryComponents {
    ///     basic_salary: Decimal::new(30000, 0),
    ///     hra: Decimal::new(6000, 0),
    ///     bonus: Decimal::new(1000, 0),
    ///     pf: Decimal::new(3600, 0),
    ///     tax: Decimal::new(2000, 0),
    /// };
    /// let totals = components.totals(Decimal::new(500, 0)).unwrap();
    /// assert_eq!(totals.gross, Decimal::new(37500, 0));
    /// assert_eq!(totals.deductions, Decimal::new(5600, 0));
    /// assert_eq!(totals.net, Decimal::new(31900, 0));
    /// ```
    pub fn totals(&self, commission: Decimal) -> EngineResult<SlipTotals> {
        let gross = self
            .basic_salary
            .checked_add(self.hra)
            .and_then(|sum| sum.checked_add(commission))
            .and_then(|sum| sum.checked_add(self.bonus))
            .ok_or_else(|| out_of_range("gross_salary"))?;
        let deductions = self
            .pf
            .checked_add(self.tax)
            .ok_or_else(|| out_of_range("deductions"))?;
        let net = gross
            .checked_sub(deductions)
            .ok_or_else(|| out_of_range("net_salary"))?;
        Ok(SlipTotals {
            gross,
            deductions,
            net,
        })
    }

    /// Returns the name of the first negative component, if any.
    pub fn first_negative(&self) -> Option<&'static str> {
        [
            ("basic_salary", self.basic_salary),
            ("hra", self.hra),
            ("bonus", self.bonus),
            ("pf", self.pf),
            ("tax", self.tax),
        ]
        .into_iter()
        .find(|(_, value)| value.is_sign_negative() && !value.is_zero())
        .map(|(name, _)| name)
    }
}

/// Lifecycle state of a commission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    /// Earned, not yet paid.
    Pending,
    /// Paid out. Terminal.
    Paid,
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Paid => "paid",
        })
    }
}

/// Commission earned by a staff member on sales in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRecord {
    /// Unique identifier.
    pub id: CommissionId,
    /// The staff member earning the commission.
    pub staff_id: String,
    /// Sales the commission is computed on.
    pub sales_amount: Decimal,
    /// Commission percentage, 0-100.
    pub commission_rate: Decimal,
    /// round2(sales_amount * commission_rate / 100).
    pub commission_amount: Decimal,
    /// The month the sales were made in.
    pub month: MonthKey,
    /// Lifecycle state.
    pub status: CommissionStatus,
    /// When the commission was paid. Set only when paid.
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

/// Computes a commission amount from sales and a percentage rate.
///
/// Fails with `Validation` on `sales_amount` when the product does not fit
/// in a `Decimal`.
pub fn commission_amount(sales_amount: Decimal, rate: Decimal) -> EngineResult<Decimal> {
    sales_amount
        .checked_mul(rate)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .map(round2)
        .ok_or_else(|| out_of_range("sales_amount"))
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::validation(field, "amount out of range")
}
