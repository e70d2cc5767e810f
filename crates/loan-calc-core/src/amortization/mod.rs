//! Loan amortisation: level-payment calculation, schedule generation and
//! the analyses built on top of a schedule.

pub mod payment;
pub mod schedule;
pub mod summary;
pub mod terms;
pub mod what_if;

pub use payment::{calculate_payment, compute_payment, periodic_rate, PaymentInput, PaymentOutput};
pub use schedule::{generate_schedule, AmortizationSchedule, OverPayoff, PeriodRecord};
pub use summary::{summarize, CumulativePoint, ScheduleSummary, YearlyTotals};
pub use terms::{LoanTerms, RateChange, STANDARD_INSURANCE_RATE};
pub use what_if::{compare_what_if, WhatIfComparison};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::format::human_currency;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

/// Schedule plus the figures a loan overview page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub periodic_payment: Money,
    pub formatted_payment: String,
    pub formatted_total_payment: String,
    pub formatted_total_interest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_payoff: Option<OverPayoff>,
    pub summary: ScheduleSummary,
    pub periods: Vec<PeriodRecord>,
}

/// Generate and summarise the schedule for `terms`.
pub fn analyze_loan(terms: &LoanTerms) -> LoanCalcResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let schedule = generate_schedule(terms)?;
    let summary = summarize(&schedule)?;
    let warnings = schedule_warnings(terms, &schedule)?;

    let analysis = LoanAnalysis {
        periodic_payment: summary.periodic_payment,
        formatted_payment: human_currency(schedule.periodic_payment),
        formatted_total_payment: human_currency(summary.total_payment),
        formatted_total_interest: human_currency(summary.total_interest),
        over_payoff: schedule.over_payoff,
        summary,
        periods: schedule.periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation with extra, lump-sum and insurance components",
        terms,
        warnings,
        elapsed,
        analysis,
    ))
}

fn schedule_warnings(terms: &LoanTerms, schedule: &AmortizationSchedule) -> LoanCalcResult<Vec<String>> {
    let mut warnings = Vec::new();

    match schedule.over_payoff {
        Some(OverPayoff::LumpSum { excess }) => warnings.push(format!(
            "Lump sum of {} settles the principal of {} outright (excess {}); no periodic payments are due",
            terms.lump_sum, terms.principal, excess
        )),
        Some(OverPayoff::FinalPeriod { period, excess }) => warnings.push(format!(
            "Payment in period {period} exceeded the remaining balance by {}; final payment truncated",
            excess.round_dp(2)
        )),
        None => {}
    }

    if let Some(change) = &terms.rate_change {
        let total_periods = terms.total_periods()?;
        if change.after_periods >= total_periods {
            warnings.push(format!(
                "Rate change after {} periods never applies to a {}-period loan",
                change.after_periods, total_periods
            ));
        } else if schedule.adjusted_payment.is_none() && !schedule.is_empty() {
            warnings.push(format!(
                "Loan is paid off in {} periods, before the rate change after {} periods",
                schedule.len(),
                change.after_periods
            ));
        }
    }

    if terms.annual_rate > Decimal::ONE {
        warnings.push(format!(
            "Annual rate {} exceeds 100%; expected a fraction such as 0.075",
            terms.annual_rate
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn terms() -> LoanTerms {
        LoanTerms::new(
            dec!(500_000),
            dec!(0.075),
            20,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_analyze_loan_overview_figures() {
        let out = analyze_loan(&terms()).unwrap();
        let a = &out.result;
        assert_eq!(a.periodic_payment, dec!(4027.97));
        assert_eq!(a.formatted_payment, "₹4,028");
        assert_eq!(a.periods.len(), 240);
        assert_eq!(a.summary.number_of_periods, 240);
        assert!(out.warnings.is_empty());
        assert_eq!(out.assumptions["term_years"], 20);
    }

    #[test]
    fn test_analyze_loan_warns_on_lump_sum_payoff() {
        let mut t = terms();
        t.lump_sum = dec!(600_000);
        let out = analyze_loan(&t).unwrap();
        assert!(out.result.periods.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("outright"));
    }

    #[test]
    fn test_analyze_loan_warns_on_unreachable_rate_change() {
        let mut t = terms();
        t.rate_change = Some(RateChange {
            after_periods: 240,
            new_annual_rate: dec!(0.09),
        });
        let out = analyze_loan(&t).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("never applies"));
    }

    #[test]
    fn test_analyze_loan_warns_when_paid_off_before_rate_change() {
        let mut t = terms();
        t.lump_sum = dec!(450_000);
        t.rate_change = Some(RateChange {
            after_periods: 200,
            new_annual_rate: dec!(0.09),
        });
        let out = analyze_loan(&t).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("before the rate change")));
    }
}
