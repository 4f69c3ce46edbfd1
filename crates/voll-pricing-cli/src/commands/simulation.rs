use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use voll_pricing_core::pricing::{CalculatedResults, PackageTier};
use voll_pricing_core::simulation::{PricingSession, SimulationInputs, SimulationResults};

use crate::input;

/// Arguments for a what-if simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON or YAML pricing inputs (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly price of the once-a-week plan (defaults to the computed package)
    #[arg(long = "package-1x")]
    pub package_1x: Option<Decimal>,

    /// Monthly price of the twice-a-week plan
    #[arg(long = "package-2x")]
    pub package_2x: Option<Decimal>,

    /// Monthly price of the three-times-a-week plan
    #[arg(long = "package-3x")]
    pub package_3x: Option<Decimal>,

    /// Occupancy rate in percent (defaults to the configured rate)
    #[arg(long)]
    pub occupancy: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationOutput<'a> {
    calculation: &'a CalculatedResults,
    simulation_inputs: &'a SimulationInputs,
    simulation: Option<&'a SimulationResults>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = input::load_inputs(args.input.as_deref())?;
    let mut session = PricingSession::new(inputs);

    let overrides = [
        (PackageTier::OncePerWeek, args.package_1x),
        (PackageTier::TwicePerWeek, args.package_2x),
        (PackageTier::ThreePerWeek, args.package_3x),
    ];
    for (tier, price) in overrides {
        if let Some(price) = price {
            session.set_package_price(tier, price.max(Decimal::ZERO));
        }
    }
    if let Some(rate) = args.occupancy {
        session.set_occupancy_rate(rate.max(Decimal::ZERO));
    }
    if session.simulate().is_none() {
        tracing::warn!("pricing configuration is invalid; nothing to simulate");
    }

    let output = SimulationOutput {
        calculation: session.results(),
        simulation_inputs: session.simulation_inputs(),
        simulation: session.simulation(),
    };
    Ok(serde_json::to_value(output)?)
}
