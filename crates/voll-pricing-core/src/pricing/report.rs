use serde::Serialize;
use std::time::Instant;

use super::composition::{price_composition, PriceComposition};
use super::engine::{calculate_pricing, CalculatedResults};
use super::inputs::PricingInputs;
#[cfg(feature = "market")]
use crate::market::{analyze_market, MarketComparison};
use crate::types::{with_metadata, ComputationOutput};
use crate::PricingResult;

/// Everything the pricing screen shows for one set of inputs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingReport {
    pub calculation: CalculatedResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<PriceComposition>,
    #[cfg(feature = "market")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketComparison>,
}

/// Sanitize the inputs, price them, decompose the price and compare it with
/// the market, collecting warnings for configurations worth a second look.
pub fn analyze_pricing(inputs: &PricingInputs) -> PricingResult<ComputationOutput<PricingReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let clean = inputs.sanitized();
    if &clean != inputs {
        warnings.push("Negative values were treated as zero.".to_string());
    }

    let calculation = calculate_pricing(&clean);

    let composition = match &calculation {
        CalculatedResults::Valid(results) => {
            if clean.capacity.working_days.count() == 0 {
                warnings.push("No working days selected; no sessions can be sold.".to_string());
            }
            if results.real_sessions_per_month.is_zero() {
                warnings.push(
                    "Zero sessions per month at the configured capacity and occupancy; \
                     price per session set to 0."
                        .to_string(),
                );
            }
            if results.total_fixed_costs.is_zero() {
                warnings.push("Fixed costs are zero; every price will be 0.".to_string());
            }
            let composition = price_composition(results);
            if composition.is_none() {
                warnings.push("Price breakdown is too large to compute.".to_string());
            }
            composition
        }
        CalculatedResults::Invalid(invalid) => {
            warnings.push(invalid.message());
            None
        }
    };

    #[cfg(feature = "market")]
    let market = if clean.market_analysis.competitors.is_empty() {
        None
    } else {
        Some(analyze_market(&clean, &calculation)?)
    };

    let report = PricingReport {
        calculation,
        composition,
        #[cfg(feature = "market")]
        market,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Cost-plus session pricing with break-even and reserve planning",
        &clean,
        warnings,
        elapsed,
        report,
    ))
}
