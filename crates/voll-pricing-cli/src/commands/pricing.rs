use clap::Args;
use serde_json::Value;

use voll_pricing_core::pricing::{self, CalculatedResults};

use crate::input;

/// Arguments for a full pricing report
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON or YAML pricing inputs (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the session price breakdown
#[derive(Args)]
pub struct BreakdownArgs {
    /// Path to JSON or YAML pricing inputs (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = input::load_inputs(args.input.as_deref())?;
    let report = pricing::analyze_pricing(&inputs)?;
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    Ok(serde_json::to_value(report)?)
}

pub fn run_breakdown(args: BreakdownArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = input::load_inputs(args.input.as_deref())?;
    match pricing::calculate_pricing(&inputs) {
        CalculatedResults::Valid(results) => match pricing::price_composition(&results) {
            Some(composition) => Ok(serde_json::to_value(composition)?),
            None => Err("price breakdown is too large to compute".into()),
        },
        CalculatedResults::Invalid(invalid) => Err(invalid.message().into()),
    }
}
