//! Lookup table behind the Smart Estimator fallback

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use washquote_types::ServiceType;

/// Typical cleanable areas per service, used when the vision model is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartEstimatorTable {
    /// Service tag -> typical area in square feet
    #[serde(default = "default_areas")]
    pub areas: BTreeMap<String, f64>,

    #[serde(default = "default_area_sqft")]
    pub default_area_sqft: f64,

    #[serde(default = "default_complexity")]
    pub complexity: f64,
}

fn default_areas() -> BTreeMap<String, f64> {
    [
        ("house", 1500.0),
        ("windows", 800.0),
        ("roof", 1200.0),
        ("driveway", 400.0),
        ("gutters", 200.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_area_sqft() -> f64 {
    1000.0
}

fn default_complexity() -> f64 {
    2.5
}

impl Default for SmartEstimatorTable {
    fn default() -> Self {
        Self {
            areas: default_areas(),
            default_area_sqft: default_area_sqft(),
            complexity: default_complexity(),
        }
    }
}

impl SmartEstimatorTable {
    pub fn area_for(&self, service: &ServiceType) -> f64 {
        self.areas
            .get(service.as_str())
            .copied()
            .unwrap_or(self.default_area_sqft)
    }
}
