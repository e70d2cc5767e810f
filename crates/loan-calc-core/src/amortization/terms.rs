//! Loan terms: the immutable input of every schedule calculation.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

/// Insurance premium applied when a caller opts in without naming a rate
/// (0.5% of the outstanding balance per year).
pub const STANDARD_INSURANCE_RATE: Rate = dec!(0.005);

pub(crate) fn default_periods_per_year() -> u32 {
    12
}

/// A single switch to a new annual rate part-way through the term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateChange {
    /// Number of periods paid at the original rate.
    pub after_periods: u32,
    pub new_annual_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a fraction (0.075 = 7.5%).
    pub annual_rate: Rate,
    pub term_years: u32,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// Due date of the first payment.
    pub start_date: NaiveDate,
    /// Additional principal paid every period.
    #[serde(default)]
    pub extra_payment: Money,
    /// One-time principal reduction at issuance.
    #[serde(default)]
    pub lump_sum: Money,
    #[serde(default)]
    pub insurance_rate_annual: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_change: Option<RateChange>,
}

impl LoanTerms {
    /// Plain level-payment loan, paid monthly, with no extras.
    pub fn new(principal: Money, annual_rate: Rate, term_years: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
            periods_per_year: default_periods_per_year(),
            start_date,
            extra_payment: Decimal::ZERO,
            lump_sum: Decimal::ZERO,
            insurance_rate_annual: Decimal::ZERO,
            rate_change: None,
        }
    }

    pub fn validate(&self) -> LoanCalcResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LoanCalcError::invalid("principal", "Principal must be positive"));
        }
        if self.term_years == 0 {
            return Err(LoanCalcError::invalid("term_years", "Term must be at least one year"));
        }
        if self.periods_per_year == 0 {
            return Err(LoanCalcError::invalid(
                "periods_per_year",
                "Periods per year must be > 0",
            ));
        }
        let non_negative = [
            ("annual_rate", self.annual_rate),
            ("extra_payment", self.extra_payment),
            ("lump_sum", self.lump_sum),
            ("insurance_rate_annual", self.insurance_rate_annual),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(LoanCalcError::invalid(field, "Cannot be negative"));
            }
        }
        if let Some(change) = &self.rate_change {
            if change.after_periods == 0 {
                return Err(LoanCalcError::invalid(
                    "rate_change.after_periods",
                    "Rate change must follow at least one period",
                ));
            }
            if change.new_annual_rate < Decimal::ZERO {
                return Err(LoanCalcError::invalid(
                    "rate_change.new_annual_rate",
                    "Cannot be negative",
                ));
            }
        }
        self.total_periods().map(|_| ())
    }

    /// Nominal number of periods, `term_years * periods_per_year`.
    pub fn total_periods(&self) -> LoanCalcResult<u32> {
        self.term_years
            .checked_mul(self.periods_per_year)
            .ok_or_else(|| LoanCalcError::invalid("term_years", "Total period count overflows"))
    }

    /// Calendar months between consecutive due dates.
    pub fn months_per_period(&self) -> u32 {
        match self.periods_per_year {
            12 => 1,
            4 => 3,
            _ => 12,
        }
    }

    /// Due date one period after `date`. Month-end dates clamp, and the
    /// clamped day carries forward (Jan 31, Feb 28, Mar 28).
    pub fn next_due_date(&self, date: NaiveDate) -> LoanCalcResult<NaiveDate> {
        date.checked_add_months(Months::new(self.months_per_period()))
            .ok_or_else(|| {
                LoanCalcError::DateError(format!(
                    "due date after {date} falls outside the supported date range"
                ))
            })
    }

    /// Latest due date a full-term schedule can reach. Chained due dates
    /// never fall after it.
    pub fn nominal_maturity(&self) -> LoanCalcResult<NaiveDate> {
        let total_periods = self.total_periods()?;
        let offset = total_periods
            .saturating_sub(1)
            .checked_mul(self.months_per_period())
            .ok_or_else(|| {
                LoanCalcError::DateError(format!("{total_periods} periods overflow the month offset"))
            })?;
        self.start_date
            .checked_add_months(Months::new(offset))
            .ok_or_else(|| {
                LoanCalcError::DateError(format!(
                    "maturity after {total_periods} periods falls outside the supported date range"
                ))
            })
    }

    /// Same loan without the extra payment or lump sum.
    pub fn baseline(&self) -> Self {
        Self {
            extra_payment: Decimal::ZERO,
            lump_sum: Decimal::ZERO,
            ..self.clone()
        }
    }
}
