//! Domain models and services for exterior cleaning quotes

pub mod model;
pub mod service;

pub use model::pricing_tables::clamp_complexity;
pub use model::{ComplexityMultiplier, PricingTables, SmartEstimatorTable};
pub use service::{calculate_quote, smart_estimate};
