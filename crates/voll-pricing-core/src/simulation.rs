//! What-if simulation over package prices and occupancy.
//!
//! A simulation never touches the canonical [`CalculatedResults`]; it reads
//! the canonical cost structure and recomputes revenue and margin for
//! prices and occupancy the owner is trying out.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::pricing::{
    calculate_pricing, theoretical_sessions, CalculatedResults, Capacity, PackageTier, Packages,
    PricingInputs, PricingResults,
};
use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Owner-edited values the simulation runs on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInputs {
    pub packages: Packages,
    pub occupancy_rate: Percent,
}

impl SimulationInputs {
    /// Canonical packages and the configured occupancy.
    pub fn defaults_for(inputs: &PricingInputs, results: &CalculatedResults) -> Self {
        Self {
            packages: results
                .valid()
                .map(|r| r.packages.clone())
                .unwrap_or_default(),
            occupancy_rate: inputs.capacity.occupancy_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults {
    /// Mean of the three per-session equivalents (unweighted)
    pub average_session_price: Money,
    pub simulated_sessions_per_month: Decimal,
    pub new_revenue: Money,
    /// Revenue minus fixed and variable costs. The reserve is not deducted.
    pub new_profit_value: Money,
    /// Profit as a percentage of revenue, 0 without revenue
    pub new_profit_margin: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recompute revenue and margin for simulated package prices and occupancy.
/// `None` when a figure leaves the Decimal range.
pub fn simulate(
    capacity: &Capacity,
    results: &PricingResults,
    sim: &SimulationInputs,
) -> Option<SimulationResults> {
    let per_session_sum = PackageTier::ALL.iter().try_fold(Decimal::ZERO, |acc, tier| {
        acc.checked_add(sim.packages.get(*tier) / tier.sessions_per_month())
    })?;
    let average_session_price = per_session_sum / Decimal::from(PackageTier::ALL.len() as u32);

    let simulated_sessions_per_month =
        theoretical_sessions(capacity)?.checked_mul(sim.occupancy_rate / dec!(100))?;

    let new_revenue = average_session_price.checked_mul(simulated_sessions_per_month)?;
    let new_profit_value = new_revenue
        .checked_sub(results.total_fixed_costs)?
        .checked_sub(new_revenue.checked_mul(results.variable_costs_pct)?)?;
    let new_profit_margin = if new_revenue > Decimal::ZERO {
        new_profit_value.checked_div(new_revenue)?.checked_mul(dec!(100))?
    } else {
        Decimal::ZERO
    };

    Some(SimulationResults {
        average_session_price,
        simulated_sessions_per_month,
        new_revenue,
        new_profit_value,
        new_profit_margin,
    })
}

// ---------------------------------------------------------------------------
// PricingSession: canonical results plus a resettable simulation
// ---------------------------------------------------------------------------

/// Holds one input/output pair and the owner's simulation overrides.
///
/// Changing the inputs recomputes the canonical results and resets the
/// overrides to the new canonical packages and configured occupancy.
/// Overrides persist until then.
#[derive(Debug, Clone)]
pub struct PricingSession {
    inputs: PricingInputs,
    results: CalculatedResults,
    overrides: SimulationInputs,
    simulation: Option<SimulationResults>,
}

impl PricingSession {
    pub fn new(inputs: PricingInputs) -> Self {
        let results = calculate_pricing(&inputs);
        let overrides = SimulationInputs::defaults_for(&inputs, &results);
        Self {
            inputs,
            results,
            overrides,
            simulation: None,
        }
    }

    pub fn inputs(&self) -> &PricingInputs {
        &self.inputs
    }

    pub fn results(&self) -> &CalculatedResults {
        &self.results
    }

    pub fn simulation_inputs(&self) -> &SimulationInputs {
        &self.overrides
    }

    pub fn simulation(&self) -> Option<&SimulationResults> {
        self.simulation.as_ref()
    }

    /// True once a simulation has been computed for the current inputs.
    pub fn is_simulating(&self) -> bool {
        self.simulation.is_some()
    }

    /// Replace the inputs. Identical inputs keep results and overrides.
    /// Returns whether anything was recomputed.
    pub fn update_inputs(&mut self, inputs: PricingInputs) -> bool {
        if inputs == self.inputs {
            return false;
        }
        *self = PricingSession::new(inputs);
        tracing::debug!(valid = self.results.is_valid(), "pricing recomputed");
        true
    }

    pub fn set_package_price(
        &mut self,
        tier: PackageTier,
        price: Money,
    ) -> Option<&SimulationResults> {
        self.overrides.packages.set(tier, price);
        self.simulate()
    }

    pub fn set_occupancy_rate(&mut self, rate: Percent) -> Option<&SimulationResults> {
        self.overrides.occupancy_rate = rate;
        self.simulate()
    }

    /// Run the simulation on the current overrides. `None` while the
    /// canonical configuration is invalid or the overrides are out of range.
    pub fn simulate(&mut self) -> Option<&SimulationResults> {
        let results = self.results.valid()?;
        self.simulation = simulate(&self.inputs.capacity, results, &self.overrides);
        if self.simulation.is_none() {
            tracing::debug!("simulation out of range");
        }
        self.simulation.as_ref()
    }

    /// Drop the overrides and go back to canonical values.
    pub fn reset_simulation(&mut self) {
        self.overrides = SimulationInputs::defaults_for(&self.inputs, &self.results);
        self.simulation = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// 21.65 sessions a month at full occupancy, fixed costs 1000, 10% variable.
    fn inputs() -> PricingInputs {
        let mut inputs = PricingInputs::default();
        inputs.fixed_costs.rent = dec!(1000);
        inputs.variable_costs.taxes = dec!(10);
        inputs.variable_costs.emergency_reserve_contribution = dec!(5);
        inputs.profit_margin = dec!(10);
        inputs.capacity.clients_per_hour = dec!(1);
        inputs.capacity.hours_per_day = dec!(1);
        inputs.capacity.occupancy_rate = dec!(100);
        inputs
    }

    fn packages(p1: Decimal, p2: Decimal, p3: Decimal) -> Packages {
        Packages {
            once_per_week: p1,
            twice_per_week: p2,
            three_per_week: p3,
        }
    }

    #[test]
    fn test_unweighted_average_price() {
        let inputs = inputs();
        let results = calculate_pricing(&inputs);
        let sim = SimulationInputs {
            packages: packages(dec!(250), dec!(360), dec!(520)),
            occupancy_rate: dec!(100),
        };
        let out = simulate(&inputs.capacity, results.valid().unwrap(), &sim).unwrap();
        // (50 + 40 + 40) / 3
        assert_eq!(out.average_session_price, dec!(130) / dec!(3));
    }

    #[test]
    fn test_revenue_and_profit() {
        let inputs = inputs();
        let results = calculate_pricing(&inputs);
        let sim = SimulationInputs {
            packages: packages(dec!(200), dec!(360), dec!(520)),
            occupancy_rate: dec!(100),
        };
        let out = simulate(&inputs.capacity, results.valid().unwrap(), &sim).unwrap();
        assert_eq!(out.average_session_price, dec!(40));
        assert_eq!(out.simulated_sessions_per_month, dec!(21.65));
        assert_eq!(out.new_revenue, dec!(866));
        // 866 - 1000 - 86.6; reserve not deducted
        assert_eq!(out.new_profit_value, dec!(-220.6));
        assert_eq!(out.new_profit_margin, dec!(-220.6) / dec!(866) * dec!(100));
    }

    #[test]
    fn test_zero_occupancy_has_zero_margin() {
        let inputs = inputs();
        let results = calculate_pricing(&inputs);
        let sim = SimulationInputs {
            packages: packages(dec!(200), dec!(360), dec!(520)),
            occupancy_rate: dec!(0),
        };
        let out = simulate(&inputs.capacity, results.valid().unwrap(), &sim).unwrap();
        assert_eq!(out.new_revenue, Decimal::ZERO);
        assert_eq!(out.new_profit_margin, Decimal::ZERO);
        assert_eq!(out.new_profit_value, dec!(-1000));
    }

    #[test]
    fn test_session_defaults_follow_canonical_results() {
        let session = PricingSession::new(inputs());
        let canonical = session.results().valid().unwrap().packages.clone();
        assert_eq!(session.simulation_inputs().packages, canonical);
        assert_eq!(session.simulation_inputs().occupancy_rate, dec!(100));
        assert!(!session.is_simulating());
    }

    #[test]
    fn test_canonical_simulation_reproduces_target_revenue_at_same_occupancy() {
        let mut session = PricingSession::new(inputs());
        let target = session.results().valid().unwrap().target_revenue;
        let out = session.simulate().unwrap().clone();
        // With canonical packages every per-session equivalent equals the
        // session price, so revenue lands on target.
        assert!((out.new_revenue - target).abs() < dec!(0.000001));
        assert!(session.is_simulating());
    }

    #[test]
    fn test_override_does_not_touch_canonical_packages() {
        let mut session = PricingSession::new(inputs());
        let before = session.results().clone();
        session.set_package_price(PackageTier::TwicePerWeek, dec!(999));
        session.set_occupancy_rate(dec!(40));
        assert_eq!(session.results(), &before);
        assert_eq!(session.simulation_inputs().packages.twice_per_week, dec!(999));
    }

    #[test]
    fn test_input_change_resets_overrides() {
        let mut session = PricingSession::new(inputs());
        session.set_package_price(PackageTier::OncePerWeek, dec!(1));
        assert!(session.is_simulating());

        let mut changed = inputs();
        changed.fixed_costs.rent = dec!(2000);
        changed.capacity.occupancy_rate = dec!(80);
        assert!(session.update_inputs(changed));

        let canonical = session.results().valid().unwrap().packages.clone();
        assert_eq!(session.simulation_inputs().packages, canonical);
        assert_eq!(session.simulation_inputs().occupancy_rate, dec!(80));
        assert!(!session.is_simulating());
    }

    #[test]
    fn test_same_inputs_keep_overrides() {
        let mut session = PricingSession::new(inputs());
        session.set_occupancy_rate(dec!(50));
        assert!(!session.update_inputs(inputs()));
        assert_eq!(session.simulation_inputs().occupancy_rate, dec!(50));
    }

    #[test]
    fn test_reset_simulation() {
        let mut session = PricingSession::new(inputs());
        session.set_occupancy_rate(dec!(50));
        session.reset_simulation();
        assert_eq!(session.simulation_inputs().occupancy_rate, dec!(100));
        assert!(session.simulation().is_none());
    }

    #[test]
    fn test_out_of_range_prices_do_not_simulate() {
        let mut session = PricingSession::new(inputs());
        assert!(session.simulate().is_some());
        let mut huge = inputs();
        huge.capacity.clients_per_hour = dec!(1000000000000);
        session.update_inputs(huge);
        assert!(session
            .set_package_price(PackageTier::OncePerWeek, Decimal::MAX)
            .is_none());
        assert!(!session.is_simulating());
    }

    #[test]
    fn test_invalid_configuration_cannot_simulate() {
        let mut bad = inputs();
        bad.profit_margin = dec!(85);
        let mut session = PricingSession::new(bad);
        assert!(session.simulate().is_none());
        assert_eq!(session.simulation_inputs().packages, Packages::default());
    }
}
