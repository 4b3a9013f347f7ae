//! Application service layer - configuration and use cases

pub mod app;
pub mod config;

pub use app::estimate_service::EstimateService;
pub use config::Config;
