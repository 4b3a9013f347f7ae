//! Domain services

pub mod pricing;
pub mod smart_estimator;

pub use pricing::{calculate_quote, round_to_cents};
pub use smart_estimator::{smart_estimate, SMART_ESTIMATE_NOTES};
