//! Competitor comparison for the twice-a-week plan.
//!
//! The survey never feeds the price formula; it only places the computed
//! package against what nearby studios charge.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::pricing::{CalculatedResults, Competitor, PricingInputs};
use crate::types::{Money, Rate};
use crate::PricingResult;

/// Competitors accepted in one survey.
pub const MAX_COMPETITORS: usize = 5;

/// Differences within ±10% of the market average count as in line.
pub const IN_LINE_BAND: Rate = dec!(0.10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketPosition {
    BelowMarket,
    InLine,
    AboveMarket,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketComparison {
    pub competitor_count: usize,
    /// Competitors with a price filled in
    pub priced_competitors: usize,
    pub average_price_twice_a_week: Option<Money>,
    pub min_price_twice_a_week: Option<Money>,
    pub max_price_twice_a_week: Option<Money>,
    /// The studio's own 2x/week package, when pricing is defined
    pub own_price_twice_a_week: Option<Money>,
    /// (own − average) / average
    pub difference_pct: Option<Rate>,
    pub position: MarketPosition,
    pub nearest_competitor: Option<String>,
}

/// Compare the studio's 2x/week package with the surveyed competitors.
pub fn analyze_market(
    inputs: &PricingInputs,
    results: &CalculatedResults,
) -> PricingResult<MarketComparison> {
    let competitors = &inputs.market_analysis.competitors;
    if competitors.len() > MAX_COMPETITORS {
        return Err(PricingError::InvalidInput {
            field: "marketAnalysis.competitors".into(),
            reason: format!(
                "At most {} competitors can be compared, got {}.",
                MAX_COMPETITORS,
                competitors.len()
            ),
        });
    }

    let prices: Vec<Money> = competitors
        .iter()
        .map(|c| c.price_twice_a_week)
        .filter(|p| *p > Decimal::ZERO)
        .collect();

    let average = if prices.is_empty() {
        None
    } else {
        let sum = prices
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))
            .ok_or_else(|| PricingError::InvalidInput {
                field: "marketAnalysis.competitors".into(),
                reason: "Competitor prices are too large to average.".into(),
            })?;
        Some(sum / Decimal::from(prices.len() as u32))
    };
    let min = prices.iter().copied().min();
    let max = prices.iter().copied().max();

    let own = results
        .valid()
        .map(|r| r.packages.twice_per_week)
        .filter(|p| *p > Decimal::ZERO);

    let difference_pct = match (own, average) {
        (Some(own), Some(avg)) => own.checked_sub(avg).and_then(|d| d.checked_div(avg)),
        _ => None,
    };

    let position = match difference_pct {
        None => MarketPosition::NoData,
        Some(diff) if diff < -IN_LINE_BAND => MarketPosition::BelowMarket,
        Some(diff) if diff > IN_LINE_BAND => MarketPosition::AboveMarket,
        Some(_) => MarketPosition::InLine,
    };

    Ok(MarketComparison {
        competitor_count: competitors.len(),
        priced_competitors: prices.len(),
        average_price_twice_a_week: average,
        min_price_twice_a_week: min,
        max_price_twice_a_week: max,
        own_price_twice_a_week: own,
        difference_pct,
        position,
        nearest_competitor: nearest(competitors),
    })
}

fn nearest(competitors: &[Competitor]) -> Option<String> {
    competitors
        .iter()
        .filter(|c| !c.name.trim().is_empty() && c.distance > Decimal::ZERO)
        .min_by(|a, b| a.distance.cmp(&b.distance))
        .map(|c| c.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{calculate_pricing, ValuePerception};

    fn competitor(name: &str, distance: Decimal, price: Decimal) -> Competitor {
        Competitor {
            name: name.to_string(),
            distance,
            price_twice_a_week: price,
            value_perception: ValuePerception::Medium,
        }
    }

    /// 21.65 sessions a month at 200 each, so the 2x package is 1800.
    fn inputs_with(competitors: Vec<Competitor>) -> PricingInputs {
        let mut inputs = PricingInputs::default();
        inputs.fixed_costs.rent = dec!(4330);
        inputs.capacity.clients_per_hour = dec!(1);
        inputs.capacity.hours_per_day = dec!(1);
        inputs.capacity.occupancy_rate = dec!(100);
        inputs.market_analysis.competitors = competitors;
        inputs
    }

    #[test]
    fn test_position_above_market() {
        let inputs = inputs_with(vec![
            competitor("A", dec!(1.5), dec!(300)),
            competitor("B", dec!(0.8), dec!(320)),
        ]);
        let results = calculate_pricing(&inputs);
        let m = analyze_market(&inputs, &results).unwrap();
        assert_eq!(m.average_price_twice_a_week, Some(dec!(310)));
        assert_eq!(m.min_price_twice_a_week, Some(dec!(300)));
        assert_eq!(m.max_price_twice_a_week, Some(dec!(320)));
        assert_eq!(m.nearest_competitor.as_deref(), Some("B"));
        assert_eq!(m.own_price_twice_a_week, Some(dec!(1800)));
        assert_eq!(m.position, MarketPosition::AboveMarket);
    }

    #[test]
    fn test_position_in_line_and_below() {
        let inputs = inputs_with(vec![competitor("A", dec!(1), dec!(1700))]);
        let results = calculate_pricing(&inputs);
        let m = analyze_market(&inputs, &results).unwrap();
        assert_eq!(m.position, MarketPosition::InLine);

        let inputs = inputs_with(vec![competitor("A", dec!(1), dec!(2500))]);
        let results = calculate_pricing(&inputs);
        let m = analyze_market(&inputs, &results).unwrap();
        assert_eq!(m.position, MarketPosition::BelowMarket);
    }

    #[test]
    fn test_unpriced_competitors_are_ignored() {
        let inputs = inputs_with(vec![
            competitor("A", dec!(1), dec!(0)),
            competitor("", dec!(0), dec!(0)),
        ]);
        let results = calculate_pricing(&inputs);
        let m = analyze_market(&inputs, &results).unwrap();
        assert_eq!(m.competitor_count, 2);
        assert_eq!(m.priced_competitors, 0);
        assert_eq!(m.average_price_twice_a_week, None);
        assert_eq!(m.position, MarketPosition::NoData);
    }

    #[test]
    fn test_too_many_competitors() {
        let inputs = inputs_with(
            (0..6)
                .map(|i| competitor(&format!("S{}", i), dec!(1), dec!(300)))
                .collect(),
        );
        let results = calculate_pricing(&inputs);
        assert!(matches!(
            analyze_market(&inputs, &results),
            Err(PricingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_out_of_range_competitor_prices() {
        let inputs = inputs_with(vec![
            competitor("A", dec!(1), Decimal::MAX),
            competitor("B", dec!(2), Decimal::MAX),
        ]);
        let results = calculate_pricing(&inputs);
        assert!(matches!(
            analyze_market(&inputs, &results),
            Err(PricingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_invalid_pricing_has_no_position() {
        let mut inputs = inputs_with(vec![competitor("A", dec!(1), dec!(300))]);
        inputs.profit_margin = dec!(100);
        let results = calculate_pricing(&inputs);
        let m = analyze_market(&inputs, &results).unwrap();
        assert_eq!(m.own_price_twice_a_week, None);
        assert_eq!(m.position, MarketPosition::NoData);
    }
}
