//! HTTP surface for photo-based exterior cleaning quotes

pub mod http;

pub use http::{build_router, AppState};
