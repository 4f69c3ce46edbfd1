use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::studio::StudioInfo;
use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Pricing inputs: what the studio owner fills in
// ---------------------------------------------------------------------------

/// Everything the pricing calculator needs for one calculation.
///
/// Field names follow the camelCase JSON saved by the web front end, so a
/// stored calculation deserializes unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInputs {
    /// Studio identification, optionally pre-filled from the owner profile
    #[serde(default)]
    pub studio_info: StudioInfo,
    /// Monthly fixed expenses
    #[serde(default)]
    pub fixed_costs: FixedCosts,
    /// Revenue-proportional costs, as percentages
    #[serde(default)]
    pub variable_costs: VariableCosts,
    /// Target profit as a percentage of revenue
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub profit_margin: Percent,
    /// Session capacity of the studio
    #[serde(default)]
    pub capacity: Capacity,
    /// Competitor survey (informational)
    #[serde(default)]
    pub market_analysis: MarketAnalysis,
}

/// Monthly fixed expense buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCosts {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub rent: Money,
    /// Water, power, internet
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub utilities: Money,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub accounting: Money,
    /// Owner pro-labore
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub owner_salary: Money,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub staff_salary: Money,
    /// Cleaning supplies, towels, small equipment
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub consumables: Money,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub marketing: Money,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub other: Money,
}

impl FixedCosts {
    /// Sum of every bucket, `None` when it leaves the Decimal range.
    pub fn total(&self) -> Option<Money> {
        self.buckets()
            .iter()
            .try_fold(Decimal::ZERO, |acc, bucket| acc.checked_add(*bucket))
    }

    fn buckets(&self) -> [Money; 8] {
        [
            self.rent,
            self.utilities,
            self.accounting,
            self.owner_salary,
            self.staff_salary,
            self.consumables,
            self.marketing,
            self.other,
        ]
    }
}

/// Costs charged as a percentage of revenue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCosts {
    /// Card / payment processor fee
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub credit_card_fee: Percent,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub taxes: Percent,
    /// Equipment depreciation
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub depreciation: Percent,
    /// Share of revenue set aside for the emergency fund
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub emergency_reserve_contribution: Percent,
}

impl VariableCosts {
    /// Fee + taxes + depreciation, in percent. The reserve is kept apart.
    pub fn operating_pct(&self) -> Option<Percent> {
        self.credit_card_fee
            .checked_add(self.taxes)?
            .checked_add(self.depreciation)
    }
}

/// Opening days, Monday to Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDays {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub monday: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub tuesday: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub wednesday: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub thursday: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub friday: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub saturday: bool,
}

impl Default for WorkingDays {
    /// Monday to Friday.
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
        }
    }
}

impl WorkingDays {
    pub fn none() -> Self {
        Self {
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
        }
    }

    /// Number of open days per week.
    pub fn count(&self) -> u32 {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
        ]
        .iter()
        .filter(|open| **open)
        .count() as u32
    }
}

/// Session capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    /// Clients served at the same time in one hour
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub clients_per_hour: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub hours_per_day: Decimal,
    #[serde(default)]
    pub working_days: WorkingDays,
    /// Share of theoretical slots actually sold, in percent
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub occupancy_rate: Percent,
}

/// How the market perceives a competitor's value for money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValuePerception {
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// One surveyed competitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[serde(default)]
    pub name: String,
    /// Distance from the studio in km
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub distance: Decimal,
    /// Monthly price of the twice-a-week plan
    #[serde(default, alias = "price2x", deserialize_with = "lenient::decimal")]
    pub price_twice_a_week: Money,
    #[serde(default)]
    pub value_perception: ValuePerception,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

// ---------------------------------------------------------------------------
// Sanitization
// ---------------------------------------------------------------------------

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

impl PricingInputs {
    /// Copy with every negative amount, percentage and capacity figure
    /// coerced to zero. The engine itself never rejects negatives.
    pub fn sanitized(&self) -> PricingInputs {
        let fc = &self.fixed_costs;
        let vc = &self.variable_costs;
        let cap = &self.capacity;
        PricingInputs {
            studio_info: self.studio_info.clone(),
            fixed_costs: FixedCosts {
                rent: non_negative(fc.rent),
                utilities: non_negative(fc.utilities),
                accounting: non_negative(fc.accounting),
                owner_salary: non_negative(fc.owner_salary),
                staff_salary: non_negative(fc.staff_salary),
                consumables: non_negative(fc.consumables),
                marketing: non_negative(fc.marketing),
                other: non_negative(fc.other),
            },
            variable_costs: VariableCosts {
                credit_card_fee: non_negative(vc.credit_card_fee),
                taxes: non_negative(vc.taxes),
                depreciation: non_negative(vc.depreciation),
                emergency_reserve_contribution: non_negative(vc.emergency_reserve_contribution),
            },
            profit_margin: non_negative(self.profit_margin),
            capacity: Capacity {
                clients_per_hour: non_negative(cap.clients_per_hour),
                hours_per_day: non_negative(cap.hours_per_day),
                working_days: cap.working_days.clone(),
                occupancy_rate: non_negative(cap.occupancy_rate),
            },
            market_analysis: MarketAnalysis {
                competitors: self
                    .market_analysis
                    .competitors
                    .iter()
                    .map(|c| Competitor {
                        distance: non_negative(c.distance),
                        price_twice_a_week: non_negative(c.price_twice_a_week),
                        ..c.clone()
                    })
                    .collect(),
            },
        }
    }
}
