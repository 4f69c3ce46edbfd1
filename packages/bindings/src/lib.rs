use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use voll_pricing_core::market;
use voll_pricing_core::pricing::{self, CalculatedResults, PricingInputs};
use voll_pricing_core::simulation::{self, SimulationInputs, SimulationResults};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse and sanitize pricing inputs sent by the front end.
fn parse_inputs(input_json: &str) -> NapiResult<PricingInputs> {
    let inputs: PricingInputs = serde_json::from_str(input_json).map_err(to_napi_error)?;
    Ok(inputs.sanitized())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_pricing(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let results = pricing::calculate_pricing(&inputs);
    serde_json::to_string(&results).map_err(to_napi_error)
}

#[napi]
pub fn price_composition(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    match pricing::calculate_pricing(&inputs) {
        CalculatedResults::Valid(results) => {
            serde_json::to_string(&pricing::price_composition(&results)).map_err(to_napi_error)
        }
        CalculatedResults::Invalid(_) => Ok("null".to_string()),
    }
}

#[napi]
pub fn analyze_pricing(input_json: String) -> NapiResult<String> {
    let inputs: PricingInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pricing::analyze_pricing(&inputs).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationResponse {
    simulation_inputs: SimulationInputs,
    simulation: Option<SimulationResults>,
}

/// Simulate with the given overrides, or with canonical defaults when
/// `simulation_json` is omitted.
#[napi]
pub fn simulate_pricing(input_json: String, simulation_json: Option<String>) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let results = pricing::calculate_pricing(&inputs);
    let simulation_inputs = match simulation_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => SimulationInputs::defaults_for(&inputs, &results),
    };
    let simulation = results
        .valid()
        .and_then(|r| simulation::simulate(&inputs.capacity, r, &simulation_inputs));
    serde_json::to_string(&SimulationResponse {
        simulation_inputs,
        simulation,
    })
    .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_market(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let results = pricing::calculate_pricing(&inputs);
    let comparison = market::analyze_market(&inputs, &results).map_err(to_napi_error)?;
    serde_json::to_string(&comparison).map_err(to_napi_error)
}
