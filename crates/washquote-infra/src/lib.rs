//! Infrastructure layer - file-backed configuration loaders

pub mod pricing_loader;

pub use pricing_loader::PricingLoader;
