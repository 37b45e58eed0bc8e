use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use amort_core::schedule::{build_schedule, LoanRequest, PaymentScheme};

use crate::input;

/// Arguments for the schedule calculation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a JSON or YAML request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Loan term in months
    #[arg(long, alias = "term")]
    pub term_months: Option<u32>,

    /// Nominal annual interest rate in percent (12 means 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Payment scheme: "Annuity" selects the annuity scheme, any other
    /// value falls back to differentiated
    #[arg(long, default_value = "Differentiated")]
    pub scheme: String,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LoanRequest = if let Some(ref path) = args.input {
        input::file::read_request(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanRequest {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            annual_rate_percent: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            scheme: PaymentScheme::from_token(&args.scheme),
        }
    };

    // build_schedule validates the request; malformed input never reaches
    // the engine.
    let output = build_schedule(&request)?;
    Ok(serde_json::to_value(&output)?)
}
