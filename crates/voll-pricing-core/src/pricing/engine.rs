use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};

use super::inputs::{Capacity, PricingInputs, WorkingDays};
use crate::types::{Money, Percent, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Weeks per month used to turn weekly opening days into monthly days.
/// A flat approximation, not a calendar count.
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);

/// Payroll share of target revenue in the financial plan.
pub const PAYROLL_SHARE: Rate = dec!(0.40);
/// Operational expenses share of target revenue.
pub const OPERATIONAL_SHARE: Rate = dec!(0.30);
/// Reserve share of target revenue.
pub const RESERVE_SHARE: Rate = dec!(0.20);
/// Working capital share of target revenue.
pub const WORKING_CAPITAL_SHARE: Rate = dec!(0.10);

/// Months of fixed costs the emergency fund should cover.
pub const EMERGENCY_RESERVE_MONTHS: Decimal = dec!(6);

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

/// Monthly plan keyed to a weekly class frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageTier {
    #[serde(rename = "1x")]
    OncePerWeek,
    #[serde(rename = "2x")]
    TwicePerWeek,
    #[serde(rename = "3x")]
    ThreePerWeek,
}

impl PackageTier {
    pub const ALL: [PackageTier; 3] = [
        PackageTier::OncePerWeek,
        PackageTier::TwicePerWeek,
        PackageTier::ThreePerWeek,
    ];

    /// Sessions per month a plan is priced for: 5, 9 and 13.
    pub fn sessions_per_month(self) -> Decimal {
        match self {
            PackageTier::OncePerWeek => dec!(5),
            PackageTier::TwicePerWeek => dec!(9),
            PackageTier::ThreePerWeek => dec!(13),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageTier::OncePerWeek => "1x",
            PackageTier::TwicePerWeek => "2x",
            PackageTier::ThreePerWeek => "3x",
        }
    }
}

/// Monthly package prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packages {
    #[serde(rename = "1x")]
    pub once_per_week: Money,
    #[serde(rename = "2x")]
    pub twice_per_week: Money,
    #[serde(rename = "3x")]
    pub three_per_week: Money,
}

impl Packages {
    /// Price each tier as a fixed multiple of one session. `None` when a
    /// package leaves the Decimal range.
    pub fn from_session_price(price: Money) -> Option<Self> {
        let priced = |tier: PackageTier| price.checked_mul(tier.sessions_per_month());
        Some(Self {
            once_per_week: priced(PackageTier::OncePerWeek)?,
            twice_per_week: priced(PackageTier::TwicePerWeek)?,
            three_per_week: priced(PackageTier::ThreePerWeek)?,
        })
    }

    pub fn get(&self, tier: PackageTier) -> Money {
        match tier {
            PackageTier::OncePerWeek => self.once_per_week,
            PackageTier::TwicePerWeek => self.twice_per_week,
            PackageTier::ThreePerWeek => self.three_per_week,
        }
    }

    pub fn set(&mut self, tier: PackageTier, price: Money) {
        match tier {
            PackageTier::OncePerWeek => self.once_per_week = price,
            PackageTier::TwicePerWeek => self.twice_per_week = price,
            PackageTier::ThreePerWeek => self.three_per_week = price,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Minimum activity that covers costs with zero profit. The reserve
/// contribution is still funded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEven {
    pub sessions: Decimal,
    pub revenue: Money,
}

/// Presentation split of target revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPlanning {
    pub payroll: Money,
    pub operational: Money,
    pub reserve: Money,
    pub working_capital: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyReserve {
    /// Six months of fixed costs
    pub target: Money,
    pub monthly_savings_12_months: Money,
    pub monthly_savings_24_months: Money,
}

/// Output of a valid pricing calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResults {
    pub total_fixed_costs: Money,
    /// Fee + taxes + depreciation as a fraction of revenue
    pub variable_costs_pct: Rate,
    pub profit_pct: Rate,
    pub reserve_pct: Rate,
    /// Revenue covering fixed and variable costs, reserve and target profit
    pub target_revenue: Money,
    pub working_days_per_month: Decimal,
    pub theoretical_sessions: Decimal,
    pub real_sessions_per_month: Decimal,
    pub price_per_session: Money,
    pub packages: Packages,
    pub break_even: BreakEven,
    pub financial_planning: FinancialPlanning,
    pub emergency_reserve: EmergencyReserve,
}

/// Why a configuration cannot be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidReason {
    /// Variable costs, reserve and margin take 100% of revenue or more
    PercentagesExceedRevenue,
    /// An intermediate figure left the Decimal range
    OutOfRange,
}

/// Inputs that leave no revenue to price with, or figures too large to
/// compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidConfiguration {
    pub reason: InvalidReason,
    /// Variable costs + reserve + profit, in percent of revenue (saturating)
    pub committed_pct: Percent,
    /// 1 - variable - profit - reserve, 0 when the percentages overflow
    pub denominator_profit: Rate,
    /// 1 - variable - reserve, 0 when the percentages overflow
    pub denominator_break_even: Rate,
}

impl InvalidConfiguration {
    /// One-line explanation for reports and CLI errors.
    pub fn message(&self) -> String {
        match self.reason {
            InvalidReason::PercentagesExceedRevenue => format!(
                "Variable costs, reserve and profit margin add up to {}% of revenue; \
                 pricing is undefined until they total less than 100%.",
                self.committed_pct.normalize()
            ),
            InvalidReason::OutOfRange => {
                "Inputs are too large to price; check costs and capacity for typos.".to_string()
            }
        }
    }
}

/// Outcome of [`calculate_pricing`]. Callers branch on validity before
/// reading any figure; on the wire it carries an `isValid` flag.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatedResults {
    Valid(PricingResults),
    Invalid(InvalidConfiguration),
}

impl CalculatedResults {
    pub fn is_valid(&self) -> bool {
        matches!(self, CalculatedResults::Valid(_))
    }

    pub fn valid(&self) -> Option<&PricingResults> {
        match self {
            CalculatedResults::Valid(results) => Some(results),
            CalculatedResults::Invalid(_) => None,
        }
    }
}

impl Serialize for CalculatedResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            is_valid: bool,
            #[serde(flatten)]
            results: Option<&'a PricingResults>,
            #[serde(flatten)]
            invalid: Option<&'a InvalidConfiguration>,
        }

        let wire = match self {
            CalculatedResults::Valid(results) => Wire {
                is_valid: true,
                results: Some(results),
                invalid: None,
            },
            CalculatedResults::Invalid(invalid) => Wire {
                is_valid: false,
                results: None,
                invalid: Some(invalid),
            },
        };
        wire.serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Capacity helpers
// ---------------------------------------------------------------------------

/// Open days per month: open weekdays × 4.33.
pub fn working_days_per_month(days: &WorkingDays) -> Decimal {
    Decimal::from(days.count()) * WEEKS_PER_MONTH
}

/// Session slots per month at full occupancy. `None` when the product
/// leaves the Decimal range.
pub fn theoretical_sessions(capacity: &Capacity) -> Option<Decimal> {
    capacity
        .clients_per_hour
        .checked_mul(capacity.hours_per_day)?
        .checked_mul(working_days_per_month(&capacity.working_days))
}

fn pct_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// Revenue fractions committed by the configuration.
struct Rates {
    variable: Rate,
    profit: Rate,
    reserve: Rate,
    denominator_profit: Rate,
    denominator_break_even: Rate,
}

impl Rates {
    fn from_inputs(inputs: &PricingInputs) -> Option<Self> {
        let variable = pct_to_rate(inputs.variable_costs.operating_pct()?);
        let profit = pct_to_rate(inputs.profit_margin);
        let reserve = pct_to_rate(inputs.variable_costs.emergency_reserve_contribution);
        let denominator_break_even = Decimal::ONE.checked_sub(variable)?.checked_sub(reserve)?;
        let denominator_profit = denominator_break_even.checked_sub(profit)?;
        Some(Self {
            variable,
            profit,
            reserve,
            denominator_profit,
            denominator_break_even,
        })
    }
}

fn committed_pct(inputs: &PricingInputs) -> Percent {
    let vc = &inputs.variable_costs;
    [
        vc.credit_card_fee,
        vc.taxes,
        vc.depreciation,
        vc.emergency_reserve_contribution,
        inputs.profit_margin,
    ]
    .iter()
    .fold(Decimal::ZERO, |acc, pct| acc.saturating_add(*pct))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a studio session from its cost structure, margin target and capacity.
///
/// Target revenue solves `revenue = fixed + revenue × (variable + profit + reserve)`;
/// break-even revenue drops the profit term. Percentages that consume all
/// revenue, or figures outside the Decimal range, yield
/// [`CalculatedResults::Invalid`]. A studio with no sellable sessions
/// prices at zero instead of dividing by zero. Never panics.
pub fn calculate_pricing(inputs: &PricingInputs) -> CalculatedResults {
    let committed_pct = committed_pct(inputs);

    let Some(rates) = Rates::from_inputs(inputs) else {
        tracing::debug!(%committed_pct, "pricing undefined: percentages out of range");
        return CalculatedResults::Invalid(InvalidConfiguration {
            reason: InvalidReason::OutOfRange,
            committed_pct,
            denominator_profit: Decimal::ZERO,
            denominator_break_even: Decimal::ZERO,
        });
    };

    if rates.denominator_profit <= Decimal::ZERO || rates.denominator_break_even <= Decimal::ZERO {
        tracing::debug!(
            %committed_pct,
            denominator_profit = %rates.denominator_profit,
            denominator_break_even = %rates.denominator_break_even,
            "pricing undefined: percentages consume all revenue"
        );
        return CalculatedResults::Invalid(InvalidConfiguration {
            reason: InvalidReason::PercentagesExceedRevenue,
            committed_pct,
            denominator_profit: rates.denominator_profit,
            denominator_break_even: rates.denominator_break_even,
        });
    }

    match price_studio(inputs, &rates) {
        Some(results) => CalculatedResults::Valid(results),
        None => {
            tracing::debug!("pricing undefined: a figure left the Decimal range");
            CalculatedResults::Invalid(InvalidConfiguration {
                reason: InvalidReason::OutOfRange,
                committed_pct,
                denominator_profit: rates.denominator_profit,
                denominator_break_even: rates.denominator_break_even,
            })
        }
    }
}

/// The pricing chain on positive denominators. Every operation that can
/// grow a figure is checked; `None` means overflow.
fn price_studio(inputs: &PricingInputs, rates: &Rates) -> Option<PricingResults> {
    let total_fixed_costs = inputs.fixed_costs.total()?;

    let target_revenue = total_fixed_costs.checked_div(rates.denominator_profit)?;
    let break_even_revenue = total_fixed_costs.checked_div(rates.denominator_break_even)?;

    let working_days_per_month = working_days_per_month(&inputs.capacity.working_days);
    let theoretical_sessions = theoretical_sessions(&inputs.capacity)?;
    let real_sessions_per_month =
        theoretical_sessions.checked_mul(pct_to_rate(inputs.capacity.occupancy_rate))?;

    let price_per_session = if real_sessions_per_month.is_zero() {
        tracing::debug!("no sellable sessions; price per session set to 0");
        Decimal::ZERO
    } else {
        target_revenue.checked_div(real_sessions_per_month)?
    };

    let break_even_sessions = if price_per_session > Decimal::ZERO {
        break_even_revenue.checked_div(price_per_session)?
    } else {
        Decimal::ZERO
    };

    let share = |rate: Rate| target_revenue.checked_mul(rate);
    let financial_planning = FinancialPlanning {
        payroll: share(PAYROLL_SHARE)?,
        operational: share(OPERATIONAL_SHARE)?,
        reserve: share(RESERVE_SHARE)?,
        working_capital: share(WORKING_CAPITAL_SHARE)?,
    };

    let reserve_target = total_fixed_costs.checked_mul(EMERGENCY_RESERVE_MONTHS)?;
    let emergency_reserve = EmergencyReserve {
        target: reserve_target,
        monthly_savings_12_months: reserve_target / dec!(12),
        monthly_savings_24_months: reserve_target / dec!(24),
    };

    Some(PricingResults {
        total_fixed_costs,
        variable_costs_pct: rates.variable,
        profit_pct: rates.profit,
        reserve_pct: rates.reserve,
        target_revenue,
        working_days_per_month,
        theoretical_sessions,
        real_sessions_per_month,
        price_per_session,
        packages: Packages::from_session_price(price_per_session)?,
        break_even: BreakEven {
            sessions: break_even_sessions,
            revenue: break_even_revenue,
        },
        financial_planning,
        emergency_reserve,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::inputs::{FixedCosts, VariableCosts};
    use rust_decimal_macros::dec;

    fn studio_inputs() -> PricingInputs {
        PricingInputs {
            fixed_costs: FixedCosts {
                rent: dec!(1500),
                utilities: dec!(500),
                accounting: dec!(300),
                owner_salary: dec!(3000),
                staff_salary: dec!(2000),
                consumables: dec!(200),
                marketing: dec!(300),
                other: dec!(0),
            },
            variable_costs: VariableCosts {
                credit_card_fee: dec!(5),
                taxes: dec!(6),
                depreciation: dec!(1),
                emergency_reserve_contribution: dec!(10),
            },
            profit_margin: dec!(20),
            capacity: Capacity {
                clients_per_hour: dec!(3),
                hours_per_day: dec!(8),
                working_days: WorkingDays::default(),
                occupancy_rate: dec!(70),
            },
            ..Default::default()
        }
    }

    fn valid(inputs: &PricingInputs) -> PricingResults {
        match calculate_pricing(inputs) {
            CalculatedResults::Valid(r) => r,
            CalculatedResults::Invalid(i) => panic!("expected valid pricing, got {:?}", i),
        }
    }

    #[test]
    fn test_capacity_chain() {
        let r = valid(&studio_inputs());
        assert_eq!(r.working_days_per_month, dec!(21.65));
        assert_eq!(r.theoretical_sessions, dec!(519.6));
        assert_eq!(r.real_sessions_per_month, dec!(363.72));
    }

    #[test]
    fn test_percentages_as_fractions() {
        let r = valid(&studio_inputs());
        assert_eq!(r.variable_costs_pct, dec!(0.12));
        assert_eq!(r.profit_pct, dec!(0.20));
        assert_eq!(r.reserve_pct, dec!(0.10));
    }

    #[test]
    fn test_target_and_break_even_revenue() {
        let r = valid(&studio_inputs());
        assert_eq!(r.total_fixed_costs, dec!(7800));
        // 7800 / 0.58
        assert!((r.target_revenue - dec!(13448.28)).abs() < dec!(0.01));
        // 7800 / 0.78
        assert_eq!(r.break_even.revenue, dec!(10000));
    }

    #[test]
    fn test_break_even_sessions() {
        let r = valid(&studio_inputs());
        let expected = r.break_even.revenue / r.price_per_session;
        assert_eq!(r.break_even.sessions, expected);
        assert!(r.break_even.sessions < r.real_sessions_per_month);
    }

    #[test]
    fn test_packages_are_session_multiples() {
        let r = valid(&studio_inputs());
        assert_eq!(r.packages.once_per_week, r.price_per_session * dec!(5));
        assert_eq!(r.packages.twice_per_week, r.price_per_session * dec!(9));
        assert_eq!(r.packages.three_per_week, r.price_per_session * dec!(13));
    }

    #[test]
    fn test_financial_planning_split() {
        let r = valid(&studio_inputs());
        let fp = &r.financial_planning;
        assert_eq!(fp.payroll, r.target_revenue * dec!(0.4));
        assert_eq!(fp.operational, r.target_revenue * dec!(0.3));
        assert_eq!(fp.reserve, r.target_revenue * dec!(0.2));
        assert_eq!(fp.working_capital, r.target_revenue * dec!(0.1));
    }

    #[test]
    fn test_emergency_reserve() {
        let r = valid(&studio_inputs());
        assert_eq!(r.emergency_reserve.target, dec!(46800));
        assert_eq!(r.emergency_reserve.monthly_savings_12_months, dec!(3900));
        assert_eq!(r.emergency_reserve.monthly_savings_24_months, dec!(1950));
    }

    #[test]
    fn test_invalid_when_profit_denominator_not_positive() {
        let mut inputs = studio_inputs();
        inputs.profit_margin = dec!(78);
        match calculate_pricing(&inputs) {
            CalculatedResults::Invalid(i) => {
                assert_eq!(i.reason, InvalidReason::PercentagesExceedRevenue);
                assert_eq!(i.committed_pct, dec!(100));
                assert_eq!(i.denominator_profit, Decimal::ZERO);
                assert_eq!(i.denominator_break_even, dec!(0.78));
            }
            CalculatedResults::Valid(_) => panic!("expected invalid configuration"),
        }
    }

    #[test]
    fn test_invalid_when_break_even_denominator_not_positive() {
        let mut inputs = studio_inputs();
        inputs.profit_margin = dec!(0);
        inputs.variable_costs.emergency_reserve_contribution = dec!(88);
        assert!(!calculate_pricing(&inputs).is_valid());
    }

    #[test]
    fn test_zero_working_days_prices_at_zero() {
        let mut inputs = studio_inputs();
        inputs.capacity.working_days = WorkingDays::none();
        let r = valid(&inputs);
        assert_eq!(r.real_sessions_per_month, Decimal::ZERO);
        assert_eq!(r.price_per_session, Decimal::ZERO);
        assert_eq!(r.break_even.sessions, Decimal::ZERO);
        assert_eq!(r.packages, Packages::default());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(calculate_pricing(&studio_inputs())).unwrap();
        assert_eq!(value["isValid"], serde_json::json!(true));
        assert!(value.get("pricePerSession").is_some());
        assert!(value["packages"].get("2x").is_some());
        assert!(value["breakEven"].get("sessions").is_some());

        let mut inputs = studio_inputs();
        inputs.profit_margin = dec!(90);
        let value = serde_json::to_value(calculate_pricing(&inputs)).unwrap();
        assert_eq!(value["isValid"], serde_json::json!(false));
        assert!(value.get("pricePerSession").is_none());
        assert!(value.get("committedPct").is_some());
    }

    #[test]
    fn test_out_of_range_capacity_is_invalid() {
        let mut inputs = studio_inputs();
        inputs.capacity.clients_per_hour = dec!(1000000000000000);
        inputs.capacity.hours_per_day = dec!(1000000000000000);
        match calculate_pricing(&inputs) {
            CalculatedResults::Invalid(i) => {
                assert_eq!(i.reason, InvalidReason::OutOfRange);
                assert_eq!(i.denominator_profit, dec!(0.58));
            }
            CalculatedResults::Valid(_) => panic!("expected out-of-range configuration"),
        }
    }

    #[test]
    fn test_out_of_range_percentages_are_invalid() {
        let mut inputs = studio_inputs();
        inputs.variable_costs.credit_card_fee = Decimal::MAX;
        inputs.variable_costs.taxes = Decimal::MAX;
        let out = calculate_pricing(&inputs);
        match &out {
            CalculatedResults::Invalid(i) => {
                assert_eq!(i.reason, InvalidReason::OutOfRange);
                assert_eq!(i.committed_pct, Decimal::MAX);
            }
            CalculatedResults::Valid(_) => panic!("expected out-of-range configuration"),
        }
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["reason"], serde_json::json!("outOfRange"));
    }

    #[test]
    fn test_tier_lookup() {
        let mut p = Packages::from_session_price(dec!(10)).unwrap();
        assert_eq!(p.get(PackageTier::TwicePerWeek), dec!(90));
        p.set(PackageTier::ThreePerWeek, dec!(100));
        assert_eq!(p.three_per_week, dec!(100));
        assert_eq!(PackageTier::OncePerWeek.label(), "1x");
    }
}
