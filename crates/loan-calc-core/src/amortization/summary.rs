//! Aggregates derived from a schedule: totals, calendar-year breakdown and
//! running principal/interest.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::schedule::AmortizationSchedule;
use crate::error::LoanCalcError;
use crate::types::Money;
use crate::LoanCalcResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub year: i32,
    pub principal: Money,
    pub interest: Money,
    pub insurance: Money,
    pub total_payment: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub period: u32,
    pub date: NaiveDate,
    pub principal_paid: Money,
    pub interest_paid: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Scheduled payment at the original rate, rounded to 2 dp.
    pub periodic_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_payment: Option<Money>,
    pub number_of_periods: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_insurance: Money,
    pub total_payment: Money,
    pub payoff_date: Option<NaiveDate>,
    pub yearly: Vec<YearlyTotals>,
    pub cumulative: Vec<CumulativePoint>,
}

fn add(total: &mut Money, amount: Money) -> LoanCalcResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| LoanCalcError::invalid("principal", "Schedule totals exceed decimal range"))?;
    Ok(())
}

/// Summarise the rounded period records of `schedule`.
pub fn summarize(schedule: &AmortizationSchedule) -> LoanCalcResult<ScheduleSummary> {
    let mut total_principal = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_insurance = Decimal::ZERO;
    let mut total_payment = Decimal::ZERO;
    let mut yearly: BTreeMap<i32, YearlyTotals> = BTreeMap::new();
    let mut cumulative = Vec::with_capacity(schedule.len());

    for p in &schedule.periods {
        add(&mut total_principal, p.principal)?;
        add(&mut total_interest, p.interest)?;
        add(&mut total_insurance, p.insurance)?;
        add(&mut total_payment, p.total_payment)?;

        let year = p.date.year();
        let entry = yearly.entry(year).or_insert_with(|| YearlyTotals {
            year,
            principal: Decimal::ZERO,
            interest: Decimal::ZERO,
            insurance: Decimal::ZERO,
            total_payment: Decimal::ZERO,
        });
        add(&mut entry.principal, p.principal)?;
        add(&mut entry.interest, p.interest)?;
        add(&mut entry.insurance, p.insurance)?;
        add(&mut entry.total_payment, p.total_payment)?;

        cumulative.push(CumulativePoint {
            period: p.period,
            date: p.date,
            principal_paid: total_principal,
            interest_paid: total_interest,
        });
    }

    Ok(ScheduleSummary {
        periodic_payment: schedule.periodic_payment.round_dp(2),
        adjusted_payment: schedule.adjusted_payment.map(|p| p.round_dp(2)),
        number_of_periods: schedule.len() as u32,
        total_principal,
        total_interest,
        total_insurance,
        total_payment,
        payoff_date: schedule.last().map(|p| p.date),
        yearly: yearly.into_values().collect(),
        cumulative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::generate_schedule;
    use crate::amortization::terms::LoanTerms;
    use rust_decimal_macros::dec;

    fn schedule() -> AmortizationSchedule {
        let terms = LoanTerms::new(
            dec!(120_000),
            dec!(0.06),
            5,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        );
        generate_schedule(&terms).unwrap()
    }

    #[test]
    fn test_totals_add_up() {
        let s = schedule();
        let summary = summarize(&s).unwrap();
        assert_eq!(summary.number_of_periods, 60);
        // Rows are rounded independently, so allow a cent per row.
        let parts = summary.total_principal + summary.total_interest + summary.total_insurance;
        assert!((summary.total_payment - parts).abs() <= dec!(0.60));
        assert!((summary.total_principal - dec!(120_000)).abs() <= dec!(0.60));
        assert_eq!(summary.payoff_date, NaiveDate::from_ymd_opt(2030, 6, 1));
    }

    #[test]
    fn test_yearly_buckets_follow_calendar_years() {
        let summary = summarize(&schedule()).unwrap();
        let years: Vec<i32> = summary.yearly.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027, 2028, 2029, 2030]);
        let interest: Decimal = summary.yearly.iter().map(|y| y.interest).sum();
        assert_eq!(interest, summary.total_interest);
        // Interest falls each year as the balance amortises.
        assert!(summary.yearly[1].interest > summary.yearly[2].interest);
    }

    #[test]
    fn test_cumulative_is_running_total() {
        let s = schedule();
        let summary = summarize(&s).unwrap();
        assert_eq!(summary.cumulative.len(), s.len());
        assert_eq!(summary.cumulative[0].principal_paid, s.periods[0].principal);
        let last = summary.cumulative.last().unwrap();
        assert_eq!(last.principal_paid, summary.total_principal);
        assert_eq!(last.interest_paid, summary.total_interest);
    }

    #[test]
    fn test_empty_schedule_summary() {
        let empty = AmortizationSchedule {
            periodic_payment: dec!(100),
            adjusted_payment: None,
            periods: Vec::new(),
            over_payoff: None,
        };
        let summary = summarize(&empty).unwrap();
        assert_eq!(summary.number_of_periods, 0);
        assert_eq!(summary.total_payment, Decimal::ZERO);
        assert!(summary.payoff_date.is_none());
        assert!(summary.yearly.is_empty());
    }

    #[test]
    fn test_totals_beyond_decimal_range_are_rejected() {
        let mut s = schedule();
        s.periods.truncate(2);
        for p in &mut s.periods {
            p.total_payment = Decimal::MAX;
        }
        assert!(matches!(
            summarize(&s),
            Err(LoanCalcError::InvalidTerm { .. })
        ));
    }
}
