use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::amortization::payment::{self, PaymentInput};

use crate::input;

/// Arguments for the level-payment calculation
#[derive(Args)]
pub struct PaymentArgs {
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

    /// Payments per year
    #[arg(long, default_value_t = 12)]
    pub periods_per_year: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            term_years: args.years.ok_or("--years is required (or provide --input)")?,
            periods_per_year: args.periods_per_year,
        }
    };
    let result = payment::calculate_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}
