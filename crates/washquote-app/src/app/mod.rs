//! Use cases

pub mod estimate_service;
