//! Period-by-period amortisation schedule.
//!
//! The generator carries full decimal precision between periods and rounds
//! only the emitted records. Over-payments are never errors: the balance is
//! clamped at zero, the final period is truncated, and the schedule ends.

use chrono::NaiveDate;
use log::{debug, trace, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::payment::{compute_payment, periodic_rate};
use super::terms::{LoanTerms, RateChange};
use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

/// Overshoot below this is rounding slack, not an over-payment.
const CENT: Decimal = dec!(0.01);

/// A remaining balance below this rounds to 0.00 and is treated as settled.
const HALF_CENT: Decimal = dec!(0.005);

/// Upper bound on the up-front row allocation (a 100-year monthly loan).
const MAX_RESERVED_PERIODS: u32 = 1200;

/// One row of the amortisation table. Amounts are rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: u32,
    pub date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
    pub insurance: Money,
    pub total_payment: Money,
    /// Remaining balance after this period's payment.
    pub balance: Money,
}

/// How the schedule was cut short by paying more than was owed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverPayoff {
    /// The lump sum alone settled the loan; no periods are due.
    LumpSum { excess: Money },
    /// The payment in `period` exceeded the remaining balance by `excess`
    /// and was truncated.
    FinalPeriod { period: u32, excess: Money },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Scheduled payment at the original rate, full precision.
    pub periodic_payment: Money,
    /// Payment recomputed when the rate change took effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_payment: Option<Money>,
    pub periods: Vec<PeriodRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_payoff: Option<OverPayoff>,
}

impl AmortizationSchedule {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn last(&self) -> Option<&PeriodRecord> {
        self.periods.last()
    }
}

/// Loop-carried state between periods.
#[derive(Debug, Clone, Copy)]
struct AmortizationState {
    balance: Money,
    periodic_rate: Rate,
    payment: Money,
    /// Due date of the period about to accrue.
    date: NaiveDate,
}

/// Full-precision amounts for one period.
#[derive(Debug, Clone, Copy)]
struct PeriodFlow {
    principal: Money,
    interest: Money,
    insurance: Money,
    total_payment: Money,
    /// Amount by which the raw payment exceeded the balance.
    overshoot: Money,
}

fn in_range(value: Option<Decimal>, field: &str) -> LoanCalcResult<Decimal> {
    value.ok_or_else(|| LoanCalcError::invalid(field, "Amount exceeds decimal range"))
}

impl AmortizationState {
    /// Switch to the new rate and re-level the payment over what is left.
    fn reprice(
        &mut self,
        change: &RateChange,
        periods_per_year: u32,
        remaining_periods: u32,
    ) -> LoanCalcResult<()> {
        self.periodic_rate = periodic_rate(change.new_annual_rate, periods_per_year)?;
        self.payment = compute_payment(self.balance, self.periodic_rate, remaining_periods)?;
        debug!(
            "rate change to {} after {} periods: payment {} over {} remaining periods",
            change.new_annual_rate, change.after_periods, self.payment, remaining_periods
        );
        Ok(())
    }

    fn accrue(
        &mut self,
        extra_payment: Money,
        insurance_rate: Rate,
        final_period: bool,
    ) -> LoanCalcResult<PeriodFlow> {
        let interest = in_range(self.balance.checked_mul(self.periodic_rate), "annual_rate")?;
        let insurance = in_range(
            self.balance.checked_mul(insurance_rate),
            "insurance_rate_annual",
        )?;
        let mut principal = in_range(self.payment.checked_sub(interest), "annual_rate")?;
        if extra_payment > Decimal::ZERO {
            principal = in_range(principal.checked_add(extra_payment), "extra_payment")?;
        }
        let mut total_payment = in_range(
            principal
                .checked_add(interest)
                .and_then(|t| t.checked_add(insurance)),
            "principal",
        )?;
        let mut overshoot = Decimal::ZERO;

        self.balance = in_range(self.balance.checked_sub(principal), "extra_payment")?;
        if self.balance < Decimal::ZERO {
            overshoot = -self.balance;
            principal -= overshoot;
            total_payment -= overshoot;
            self.balance = Decimal::ZERO;
        } else if self.balance > Decimal::ZERO && (final_period || self.balance < HALF_CENT) {
            // Slack from the unrounded payment, or a remainder that would
            // display as 0.00, settles with this instalment.
            debug!("sweeping residual balance {} into current period", self.balance);
            principal += self.balance;
            total_payment = in_range(total_payment.checked_add(self.balance), "principal")?;
            self.balance = Decimal::ZERO;
        }

        Ok(PeriodFlow {
            principal,
            interest,
            insurance,
            total_payment,
            overshoot,
        })
    }
}

impl PeriodFlow {
    fn into_record(self, period: u32, date: NaiveDate, balance: Money) -> PeriodRecord {
        PeriodRecord {
            period,
            date,
            principal: self.principal.round_dp(2),
            interest: self.interest.round_dp(2),
            insurance: self.insurance.round_dp(2),
            total_payment: self.total_payment.round_dp(2),
            balance: balance.round_dp(2),
        }
    }
}

/// Build the amortisation table for `terms`.
///
/// The scheduled payment is levelled over the full principal and term; a
/// lump sum shortens the loan instead of lowering the instalment.
pub fn generate_schedule(terms: &LoanTerms) -> LoanCalcResult<AmortizationSchedule> {
    terms.validate()?;
    let total_periods = terms.total_periods()?;
    // Reject terms whose due dates leave chrono's range before any work.
    terms.nominal_maturity()?;
    let rate = periodic_rate(terms.annual_rate, terms.periods_per_year)?;
    let periodic_payment = compute_payment(terms.principal, rate, total_periods)?;
    let insurance_rate = terms.insurance_rate_annual / Decimal::from(terms.periods_per_year);

    let mut schedule = AmortizationSchedule {
        periodic_payment,
        adjusted_payment: None,
        periods: Vec::new(),
        over_payoff: None,
    };

    let opening_balance = terms.principal - terms.lump_sum;
    if opening_balance <= Decimal::ZERO {
        let excess = -opening_balance;
        warn!("lump sum {} settles principal {} outright", terms.lump_sum, terms.principal);
        schedule.over_payoff = Some(OverPayoff::LumpSum { excess });
        return Ok(schedule);
    }

    let mut state = AmortizationState {
        balance: opening_balance,
        periodic_rate: rate,
        payment: periodic_payment,
        date: terms.start_date,
    };
    schedule
        .periods
        .reserve(total_periods.min(MAX_RESERVED_PERIODS) as usize);

    for period in 1..=total_periods {
        if let Some(change) = &terms.rate_change {
            if period - 1 == change.after_periods {
                state.reprice(change, terms.periods_per_year, total_periods - change.after_periods)?;
                schedule.adjusted_payment = Some(state.payment);
            }
        }

        let flow = state.accrue(terms.extra_payment, insurance_rate, period == total_periods)?;
        if flow.overshoot >= CENT {
            debug!("period {period} payment truncated by {}", flow.overshoot);
            schedule.over_payoff = Some(OverPayoff::FinalPeriod {
                period,
                excess: flow.overshoot,
            });
        }

        let record = flow.into_record(period, state.date, state.balance);
        trace!("{record:?}");
        schedule.periods.push(record);

        if state.balance <= Decimal::ZERO || period == total_periods {
            break;
        }
        state.date = terms.next_due_date(state.date)?;
    }

    Ok(schedule)
}
