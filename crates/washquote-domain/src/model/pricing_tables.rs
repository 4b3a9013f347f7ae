//! Pricing table definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use washquote_types::ServiceType;

/// Rate applied when a service has no entry in the rate table
pub const DEFAULT_RATE_PER_SQFT: f64 = 0.15;

/// Smallest price ever quoted
pub const MIN_JOB_FEE: f64 = 150.0;

pub const MIN_COMPLEXITY: f64 = 1.0;
pub const MAX_COMPLEXITY: f64 = 5.0;

/// Maps a complexity score to a price factor: `base + (complexity - 1) * step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMultiplier {
    #[serde(default = "default_multiplier_base")]
    pub base: f64,
    #[serde(default = "default_multiplier_step")]
    pub step: f64,
}

fn default_multiplier_base() -> f64 {
    1.0
}

fn default_multiplier_step() -> f64 {
    0.15
}

impl Default for ComplexityMultiplier {
    fn default() -> Self {
        Self {
            base: default_multiplier_base(),
            step: default_multiplier_step(),
        }
    }
}

impl ComplexityMultiplier {
    /// Factor for a complexity score. The score is clamped to [1, 5] first.
    pub fn factor(&self, complexity: f64) -> f64 {
        self.base + (clamp_complexity(complexity) - MIN_COMPLEXITY) * self.step
    }
}

/// Clamp a complexity score into [1, 5]
pub fn clamp_complexity(complexity: f64) -> f64 {
    complexity.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY)
}

/// Per-square-foot rates, minimum fee and complexity multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTables {
    /// Service tag -> rate per square foot
    #[serde(default = "default_rates")]
    pub rates: BTreeMap<String, f64>,

    #[serde(default = "default_rate")]
    pub default_rate: f64,

    #[serde(default = "default_min_job_fee")]
    pub min_job_fee: f64,

    #[serde(default)]
    pub complexity: ComplexityMultiplier,
}

fn default_rates() -> BTreeMap<String, f64> {
    [
        ("house", 0.15),
        ("windows", 0.25),
        ("roof", 0.20),
        ("driveway", 0.18),
        ("gutters", 1.00),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_rate() -> f64 {
    DEFAULT_RATE_PER_SQFT
}

fn default_min_job_fee() -> f64 {
    MIN_JOB_FEE
}

impl Default for PricingTables {
    fn default() -> Self {
        Self {
            rates: default_rates(),
            default_rate: default_rate(),
            min_job_fee: default_min_job_fee(),
            complexity: ComplexityMultiplier::default(),
        }
    }
}

impl PricingTables {
    /// Rate for a service, falling back to `default_rate`
    pub fn rate_for(&self, service: &ServiceType) -> f64 {
        self.rates
            .get(service.as_str())
            .copied()
            .unwrap_or(self.default_rate)
    }

    pub fn complexity_factor(&self, complexity: f64) -> f64 {
        self.complexity.factor(complexity)
    }
}
