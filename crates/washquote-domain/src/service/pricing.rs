//! Quote calculation

use crate::model::PricingTables;
use washquote_types::{Quote, ServiceType};

/// Round a currency amount to two decimal places
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Price a job from its estimated area and complexity
///
/// # Formula
/// total = round(max(min_job_fee, area_sqft x rate x factor(complexity)), 2)
///
/// `rate` falls back to `tables.default_rate` for services without an entry.
pub fn calculate_quote(
    tables: &PricingTables,
    service: &ServiceType,
    area_sqft: f64,
    complexity: f64,
) -> Quote {
    let rate = tables.rate_for(service);
    let complexity_factor = tables.complexity_factor(complexity);
    let subtotal = (area_sqft * rate * complexity_factor).max(tables.min_job_fee);

    Quote {
        rate,
        complexity_factor,
        total: round_to_cents(subtotal),
    }
}
