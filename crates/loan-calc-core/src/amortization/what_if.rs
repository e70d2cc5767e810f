//! What-if comparison: the loan as given against the same loan without its
//! extra payment and lump sum.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::generate_schedule;
use super::summary::{summarize, ScheduleSummary};
use super::terms::LoanTerms;
use crate::format::human_currency;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfComparison {
    /// Periods the scenario finishes ahead of the baseline.
    pub periods_saved: u32,
    pub interest_saved: Money,
    pub total_payment_saved: Money,
    pub formatted_interest_saved: String,
    pub baseline_payoff_date: Option<NaiveDate>,
    pub scenario_payoff_date: Option<NaiveDate>,
    pub baseline: ScheduleSummary,
    pub scenario: ScheduleSummary,
}

pub fn compare_what_if(terms: &LoanTerms) -> LoanCalcResult<ComputationOutput<WhatIfComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let scenario = summarize(&generate_schedule(terms)?)?;
    let baseline = summarize(&generate_schedule(&terms.baseline())?)?;

    if terms.extra_payment.is_zero() && terms.lump_sum.is_zero() {
        warnings.push(
            "No extra payment or lump sum given; scenario is identical to the baseline".into(),
        );
    }

    let periods_saved = baseline
        .number_of_periods
        .saturating_sub(scenario.number_of_periods);
    let interest_saved = baseline.total_interest - scenario.total_interest;
    debug!("what-if: {periods_saved} periods and {interest_saved} interest saved");

    let comparison = WhatIfComparison {
        periods_saved,
        interest_saved,
        total_payment_saved: baseline.total_payment - scenario.total_payment,
        formatted_interest_saved: human_currency(interest_saved),
        baseline_payoff_date: baseline.payoff_date,
        scenario_payoff_date: scenario.payoff_date,
        baseline,
        scenario,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortisation what-if: scenario vs. baseline without extra or lump-sum payments",
        terms,
        warnings,
        elapsed,
        comparison,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms() -> LoanTerms {
        LoanTerms::new(
            dec!(300_000),
            dec!(0.07),
            25,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        )
    }

    #[test]
    fn test_extra_payment_saves_time_and_interest() {
        let mut t = terms();
        t.extra_payment = dec!(500);
        let out = compare_what_if(&t).unwrap();
        let cmp = &out.result;
        assert!(cmp.periods_saved > 0);
        assert!(cmp.interest_saved > Decimal::ZERO);
        assert!(cmp.scenario_payoff_date < cmp.baseline_payoff_date);
        assert_eq!(cmp.baseline.number_of_periods, 300);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_lump_sum_alone_shortens_loan() {
        let mut t = terms();
        t.lump_sum = dec!(50_000);
        let cmp = compare_what_if(&t).unwrap().result;
        assert!(cmp.periods_saved > 0);
        assert!(cmp.interest_saved > Decimal::ZERO);
    }

    #[test]
    fn test_no_extras_is_a_trivial_comparison() {
        let out = compare_what_if(&terms()).unwrap();
        assert_eq!(out.result.periods_saved, 0);
        assert_eq!(out.result.interest_saved, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }
}
