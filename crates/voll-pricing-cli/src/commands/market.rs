use clap::Args;
use serde_json::Value;

use voll_pricing_core::market;
use voll_pricing_core::pricing::calculate_pricing;

use crate::input;

/// Arguments for the competitor comparison
#[derive(Args)]
pub struct MarketArgs {
    /// Path to JSON or YAML pricing inputs (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_market(args: MarketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = input::load_inputs(args.input.as_deref())?;
    let results = calculate_pricing(&inputs);
    let comparison = market::analyze_market(&inputs, &results)?;
    Ok(serde_json::to_value(comparison)?)
}
