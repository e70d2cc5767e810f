mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::payment::PaymentArgs;
use commands::schedule::LoanArgs;

/// Loan payment and amortization schedule calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan payment and amortization schedule calculations",
    long_about = "A CLI for computing level loan payments and full amortization \
                  schedules with decimal precision. Supports extra periodic payments, \
                  a one-time lump sum, insurance premiums, a single mid-term rate \
                  change, and what-if comparison against the plain loan."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the fixed periodic payment (EMI)
    Payment(PaymentArgs),
    /// Generate the full amortization schedule
    Schedule(LoanArgs),
    /// Compare a loan with extra/lump-sum payments against the plain loan
    WhatIf(LoanArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::WhatIf(args) => commands::schedule::run_what_if(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
