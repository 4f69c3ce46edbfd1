pub mod market;
pub mod pricing;
pub mod sensitivity;
pub mod simulation;
pub mod snapshots;
