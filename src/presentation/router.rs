// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{doctor_dashboard, health_check, role_dashboard};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(role_dashboard))
        .route("/doctors/dashboard", get(doctor_dashboard))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
