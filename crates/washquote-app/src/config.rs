//! Configuration management for washquote
//!
//! Config stored at: ~/.config/washquote/config.json
//!
//! Precedence: environment variables over the config file over defaults.
//! CLI flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use washquote_domain::{PricingTables, SmartEstimatorTable};
use washquote_infra::PricingLoader;
use washquote_types::{ConfigError, OutputFormat, Result};
use washquote_vision::ai::openai::{DEFAULT_API_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use washquote_vision::OpenAiSettings;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_API_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_BIND: &str = "WASHQUOTE_BIND";
pub const ENV_PRICING_FILE: &str = "WASHQUOTE_PRICING_FILE";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inference API credential; usually supplied through OPENAI_API_KEY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Vision model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Inference API base URL (without /chat/completions)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP listen address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum accepted request body for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Inference call timeout; unset means wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Optional TOML file overriding the pricing tables
    #[serde(default)]
    pub pricing_file: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            api_base_url: default_api_base_url(),
            temperature: default_temperature(),
            bind_address: default_bind_address(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout_secs: None,
            pricing_file: None,
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("washquote");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location plus environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from a file, or defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", path.display(), e))
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(ENV_API_KEY) {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = non_blank(ENV_MODEL) {
            self.model = model;
        }
        if let Some(url) = non_blank(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(bind) = non_blank(ENV_BIND) {
            self.bind_address = bind;
        }
        if let Some(path) = non_blank(ENV_PRICING_FILE) {
            self.pricing_file = Some(PathBuf::from(path));
        }
    }

    /// Configured credential, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Inference connection settings, or `None` without a credential
    pub fn openai_settings(&self) -> Option<OpenAiSettings> {
        self.api_key().map(|key| {
            OpenAiSettings::new(key)
                .with_model(self.model.clone())
                .with_api_base_url(self.api_base_url.clone())
                .with_temperature(self.temperature)
                .with_timeout(self.request_timeout())
        })
    }

    /// Pricing tables from `pricing_file`, or the built-in tables
    pub fn load_pricing(&self) -> Result<(PricingTables, SmartEstimatorTable)> {
        match self.pricing_file {
            Some(ref path) => Ok(PricingLoader::load_from_file(path)?.into_parts()),
            None => Ok(PricingLoader::default().into_parts()),
        }
    }

    fn masked_api_key(&self) -> String {
        let Some(key) = self.api_key() else {
            return "(not set)".to_string();
        };
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 8 {
            return "(set)".to_string();
        }
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Washquote Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "API key:        {}", self.masked_api_key())?;
        writeln!(f, "Model:          {}", self.model)?;
        writeln!(f, "API base URL:   {}", self.api_base_url)?;
        writeln!(f, "Temperature:    {}", self.temperature)?;
        writeln!(f, "Bind address:   {}", self.bind_address)?;
        writeln!(f, "Max upload:     {} bytes", self.max_upload_bytes)?;
        writeln!(
            f,
            "Timeout:        {}",
            self.request_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(
            f,
            "Pricing file:   {}",
            self.pricing_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
