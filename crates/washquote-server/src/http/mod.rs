//! Router and shared state

pub mod error;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use washquote_app::EstimateService;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EstimateService>,
}

impl AppState {
    pub fn new(service: EstimateService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/estimate", post(handlers::estimate_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
