//! Pricing table loader from TOML configuration
//!
//! Every key is optional; anything left out keeps the built-in value.
//!
//! ```toml
//! min_job_fee = 150.0
//! default_rate = 0.15
//!
//! [rates]
//! house = 0.15
//! deck = 0.40
//!
//! [complexity]
//! base = 1.0
//! step = 0.15
//!
//! [smart_estimator]
//! default_area_sqft = 1000
//! complexity = 2.5
//!
//! [smart_estimator.areas]
//! deck = 300
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;
use washquote_domain::{PricingTables, SmartEstimatorTable};
use washquote_types::{ConfigError, Error, Result};

/// Container for parsing a pricing TOML file
#[derive(Debug, Deserialize)]
struct PricingFile {
    #[serde(flatten)]
    pricing: PricingTables,

    #[serde(default)]
    smart_estimator: SmartEstimatorTable,
}

fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Pricing and fallback tables loaded from TOML
#[derive(Debug, Clone, Default)]
pub struct PricingLoader {
    pricing: PricingTables,
    smart_estimator: SmartEstimatorTable,
}

impl PricingLoader {
    /// Load tables from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read pricing file {}: {}",
                path.display(),
                e
            )))
        })?;

        let loader = Self::load_from_str(&content)?;
        info!(
            path = %path.display(),
            services = loader.pricing.rates.len(),
            "loaded pricing tables"
        );
        Ok(loader)
    }

    /// Load tables from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let file: PricingFile = toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse pricing TOML: {}",
                e
            )))
        })?;

        let loader = Self {
            pricing: file.pricing,
            smart_estimator: file.smart_estimator,
        };
        loader.validate()?;
        Ok(loader)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |key: String, value: f64| {
            Error::Config(ConfigError::InvalidValue {
                key,
                value: value.to_string(),
            })
        };

        if !is_valid_amount(self.pricing.min_job_fee) {
            return Err(invalid("min_job_fee".to_string(), self.pricing.min_job_fee));
        }
        if !is_valid_amount(self.pricing.default_rate) {
            return Err(invalid("default_rate".to_string(), self.pricing.default_rate));
        }
        for (service, rate) in &self.pricing.rates {
            if !is_valid_amount(*rate) {
                return Err(invalid(format!("rates.{}", service), *rate));
            }
        }
        for (service, area) in &self.smart_estimator.areas {
            if !is_valid_amount(*area) {
                return Err(invalid(format!("smart_estimator.areas.{}", service), *area));
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (PricingTables, SmartEstimatorTable) {
        (self.pricing, self.smart_estimator)
    }
}
