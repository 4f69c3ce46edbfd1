pub mod error;
pub mod types;

pub mod pricing;
pub mod studio;

#[cfg(feature = "simulation")]
pub mod simulation;

#[cfg(feature = "market")]
pub mod market;

#[cfg(feature = "snapshots")]
pub mod snapshots;

pub use error::PricingError;
pub use types::*;

/// Standard result type for all pricing operations
pub type PricingResult<T> = Result<T, PricingError>;
