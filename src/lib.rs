pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod media;
pub mod middleware;
pub mod notifier;
pub mod profanity;
pub mod retry;
pub mod services;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::middleware::logging::logging_middleware;
use crate::state::AppState;

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api::create_api_router(state))
        .fallback(api::fallback_404)
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
}
