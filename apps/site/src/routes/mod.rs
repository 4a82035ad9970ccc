pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::feedback::handlers;
use crate::render::handlers::handle_index;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(health::health_handler))
        .route("/feedback", post(handlers::handle_submit_form))
        .route("/api/v1/feedback", post(handlers::handle_submit_json))
        .fallback(not_found)
        .with_state(state)
}
