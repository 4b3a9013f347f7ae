//! Smart Estimator - static fallback when AI analysis is unavailable

use crate::model::SmartEstimatorTable;
use washquote_types::{EstimationMethod, ServiceType, SurfaceEstimate};

pub const SMART_ESTIMATE_NOTES: &str = "AI analysis was unavailable. \
     Estimate based on typical property dimensions for this service type; \
     final price may change after an on-site review.";

/// Estimate from the lookup table alone
pub fn smart_estimate(table: &SmartEstimatorTable, service: &ServiceType) -> SurfaceEstimate {
    SurfaceEstimate {
        area_sqft: table.area_for(service),
        complexity: table.complexity,
        notes: SMART_ESTIMATE_NOTES.to_string(),
        method: EstimationMethod::Smart,
    }
}
