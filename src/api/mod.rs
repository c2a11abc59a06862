//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/interaction", post(interaction_handler))
        .route("/video", post(video_handler))
        .route("/video/advice", post(video_advice_handler))
        .route("/idle/dismiss", post(dismiss_handler))
        .route("/idle/force", post(force_handler))
        .route("/warning/cancel", post(cancel_warning_handler))
        .route("/language", get(get_language_handler).post(set_language_handler))
        .route("/text-size", get(get_text_size_handler).post(set_text_size_handler))
        .route("/qr", get(qr_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
