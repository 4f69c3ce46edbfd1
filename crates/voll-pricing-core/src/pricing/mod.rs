//! Studio pricing: inputs, the break-even engine, price composition and
//! the report envelope used by the CLI and the Node bindings.

pub mod composition;
pub mod engine;
pub mod inputs;
pub mod lenient;
pub mod report;

pub use composition::{price_composition, PriceComposition};
pub use engine::{
    calculate_pricing, theoretical_sessions, working_days_per_month, BreakEven, CalculatedResults,
    EmergencyReserve, FinancialPlanning, InvalidConfiguration, InvalidReason, PackageTier,
    Packages, PricingResults,
};
pub use inputs::{
    Capacity, Competitor, FixedCosts, MarketAnalysis, PricingInputs, ValuePerception,
    VariableCosts, WorkingDays,
};
pub use report::{analyze_pricing, PricingReport};
