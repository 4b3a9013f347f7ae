//! Domain model types

pub mod pricing_tables;
pub mod smart_table;

pub use pricing_tables::{ComplexityMultiplier, PricingTables};
pub use smart_table::SmartEstimatorTable;
