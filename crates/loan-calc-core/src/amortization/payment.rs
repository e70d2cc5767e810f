//! Level-payment (annuity) calculator.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::terms::default_periods_per_year;
use crate::error::LoanCalcError;
use crate::format::human_currency;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

/// Periodic rate for an annual rate paid `periods_per_year` times a year.
pub fn periodic_rate(annual_rate: Rate, periods_per_year: u32) -> LoanCalcResult<Rate> {
    if periods_per_year == 0 {
        return Err(LoanCalcError::invalid(
            "periods_per_year",
            "Periods per year must be > 0",
        ));
    }
    Ok(annual_rate / Decimal::from(periods_per_year))
}

/// Fixed payment that fully amortises `principal` over `total_periods` at
/// `periodic_rate`. The result is not rounded.
pub fn compute_payment(
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
) -> LoanCalcResult<Money> {
    if total_periods == 0 {
        return Err(LoanCalcError::invalid(
            "total_periods",
            "Number of periods must be > 0",
        ));
    }
    if principal <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("principal", "Principal must be positive"));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }

    let n = Decimal::from(total_periods);
    if periodic_rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = (Decimal::ONE + periodic_rate)
        .checked_powi(i64::from(total_periods))
        .ok_or_else(|| {
            LoanCalcError::invalid(
                "periodic_rate",
                format!("Compounding over {total_periods} periods exceeds decimal range"),
            )
        })?;

    // 1 - (1 + r)^-n
    let discount = Decimal::ONE - Decimal::ONE / factor;
    if discount <= Decimal::ZERO {
        // Rate is below decimal resolution; (1 + r) collapsed to 1.
        debug!("periodic rate {periodic_rate} below precision, using straight-line payment");
        return Ok(principal / n);
    }

    principal
        .checked_mul(periodic_rate)
        .and_then(|interest| interest.checked_div(discount))
        .ok_or_else(|| LoanCalcError::invalid("principal", "Payment exceeds decimal range"))
}

/// Input for a standalone payment calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub periodic_rate: Rate,
    pub total_periods: u32,
    /// Full-precision payment.
    pub periodic_payment: Money,
    pub rounded_payment: Money,
    pub formatted_payment: String,
    /// Sum of all scheduled payments, before extras and insurance.
    pub total_of_payments: Money,
}

pub fn calculate_payment(input: &PaymentInput) -> LoanCalcResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();

    if input.annual_rate < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "annual_rate",
            "Annual rate cannot be negative",
        ));
    }
    if input.term_years == 0 {
        return Err(LoanCalcError::invalid("term_years", "Term must be at least one year"));
    }
    let total_periods = input
        .term_years
        .checked_mul(input.periods_per_year)
        .ok_or_else(|| LoanCalcError::invalid("term_years", "Total period count overflows"))?;
    let rate = periodic_rate(input.annual_rate, input.periods_per_year)?;
    let payment = compute_payment(input.principal, rate, total_periods)?;
    let total_of_payments = payment
        .checked_mul(Decimal::from(total_periods))
        .ok_or_else(|| LoanCalcError::invalid("principal", "Total of payments exceeds decimal range"))?;

    let mut warnings = Vec::new();
    if input.annual_rate > Decimal::ONE {
        warnings.push(format!(
            "Annual rate {} exceeds 100%; expected a fraction such as 0.075",
            input.annual_rate
        ));
    }

    let output = PaymentOutput {
        periodic_rate: rate,
        total_periods,
        periodic_payment: payment,
        rounded_payment: payment.round_dp(2),
        formatted_payment: human_currency(payment),
        total_of_payments: total_of_payments.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity (PMT)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
