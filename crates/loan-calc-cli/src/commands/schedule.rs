use chrono::{Local, NaiveDate};
use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::amortization::{
    self, LoanTerms, RateChange, STANDARD_INSURANCE_RATE,
};

use crate::input;

/// Loan terms shared by the schedule and what-if commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal (0.075 = 7.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term-years")]
    pub years: Option<u32>,

    /// Payments per year (12 monthly, 4 quarterly, anything else steps yearly)
    #[arg(long, default_value_t = 12)]
    pub periods_per_year: u32,

    /// Due date of the first payment, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Additional principal paid every period
    #[arg(long, alias = "extra")]
    pub extra_payment: Option<Decimal>,

    /// One-time principal reduction at issuance
    #[arg(long, alias = "lump")]
    pub lump_sum: Option<Decimal>,

    /// Add insurance at the standard 0.5% annual rate
    #[arg(long, conflicts_with = "insurance_rate")]
    pub insurance: bool,

    /// Annual insurance rate on the outstanding balance
    #[arg(long)]
    pub insurance_rate: Option<Decimal>,

    /// Switch rates after this many periods (requires --new-rate)
    #[arg(long, requires = "new_rate")]
    pub rate_change_after: Option<u32>,

    /// Annual rate applied after the rate change
    #[arg(long, requires = "rate_change_after")]
    pub new_rate: Option<Decimal>,
}

impl LoanArgs {
    fn into_terms(self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        let insurance_rate_annual = match (self.insurance, self.insurance_rate) {
            (_, Some(rate)) => rate,
            (true, None) => STANDARD_INSURANCE_RATE,
            (false, None) => Decimal::ZERO,
        };
        let rate_change = match (self.rate_change_after, self.new_rate) {
            (Some(after_periods), Some(new_annual_rate)) => Some(RateChange {
                after_periods,
                new_annual_rate,
            }),
            _ => None,
        };

        Ok(LoanTerms {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: self
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_years: self.years.ok_or("--years is required (or provide --input)")?,
            periods_per_year: self.periods_per_year,
            start_date: self
                .start_date
                .unwrap_or_else(|| Local::now().date_naive()),
            extra_payment: self.extra_payment.unwrap_or(Decimal::ZERO),
            lump_sum: self.lump_sum.unwrap_or(Decimal::ZERO),
            insurance_rate_annual,
            rate_change,
        })
    }
}

fn resolve_terms(args: LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        args.into_terms()?
    };
    debug!("resolved loan terms: {terms:?}");
    Ok(terms)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(args)?;
    let result = amortization::analyze_loan(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_what_if(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(args)?;
    let result = amortization::compare_what_if(&terms)?;
    Ok(serde_json::to_value(result)?)
}
