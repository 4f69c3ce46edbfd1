use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::PricingResults;
use crate::types::Money;

/// How one session's price splits into what it pays for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComposition {
    /// Fixed costs spread over the sold sessions
    pub fixed_cost_share: Money,
    /// Card fee, taxes and depreciation
    pub variable_cost_share: Money,
    /// Emergency fund contribution
    pub reserve_share: Money,
    pub profit_share: Money,
    /// Sum of the four shares; equals the session price
    pub total: Money,
}

/// Decompose the session price into fixed, variable, reserve and profit
/// shares. The shares add back up to `price_per_session`. `None` when a
/// share leaves the Decimal range.
pub fn price_composition(results: &PricingResults) -> Option<PriceComposition> {
    let price = results.price_per_session;

    let fixed_cost_share = if results.real_sessions_per_month.is_zero() {
        Decimal::ZERO
    } else {
        results
            .total_fixed_costs
            .checked_div(results.real_sessions_per_month)?
    };
    let variable_cost_share = price.checked_mul(results.variable_costs_pct)?;
    let reserve_share = price.checked_mul(results.reserve_pct)?;
    let profit_share = price.checked_mul(results.profit_pct)?;

    let total = fixed_cost_share
        .checked_add(variable_cost_share)?
        .checked_add(reserve_share)?
        .checked_add(profit_share)?;

    Some(PriceComposition {
        fixed_cost_share,
        variable_cost_share,
        reserve_share,
        profit_share,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::engine::calculate_pricing;
    use crate::pricing::inputs::PricingInputs;
    use rust_decimal_macros::dec;

    fn inputs() -> PricingInputs {
        let mut inputs = PricingInputs::default();
        inputs.fixed_costs.rent = dec!(4000);
        inputs.fixed_costs.owner_salary = dec!(2500);
        inputs.variable_costs.credit_card_fee = dec!(4);
        inputs.variable_costs.taxes = dec!(8);
        inputs.variable_costs.emergency_reserve_contribution = dec!(5);
        inputs.profit_margin = dec!(15);
        inputs.capacity.clients_per_hour = dec!(4);
        inputs.capacity.hours_per_day = dec!(10);
        inputs.capacity.occupancy_rate = dec!(55);
        inputs
    }

    #[test]
    fn test_shares_add_up_to_price() {
        let results = calculate_pricing(&inputs());
        let r = results.valid().unwrap();
        let c = price_composition(r).unwrap();
        assert!((c.total - r.price_per_session).abs() < dec!(0.000001));
    }

    #[test]
    fn test_share_values() {
        let results = calculate_pricing(&inputs());
        let r = results.valid().unwrap();
        let c = price_composition(r).unwrap();
        assert_eq!(c.variable_cost_share, r.price_per_session * dec!(0.12));
        assert_eq!(c.reserve_share, r.price_per_session * dec!(0.05));
        assert_eq!(c.profit_share, r.price_per_session * dec!(0.15));
        assert_eq!(c.fixed_cost_share, dec!(6500) / r.real_sessions_per_month);
    }

    #[test]
    fn test_no_sessions_gives_zero_shares() {
        let mut i = inputs();
        i.capacity.occupancy_rate = dec!(0);
        let results = calculate_pricing(&i);
        let c = price_composition(results.valid().unwrap()).unwrap();
        assert_eq!(c.total, Decimal::ZERO);
    }
}
