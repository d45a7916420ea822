//! Assembles the axum [`Router`] around a [`ResolutionService`].

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{self, AppState},
    middleware::cors_middleware,
    service::ResolutionService,
};

/// Build the application router with shared state.
pub fn build_router(service: Arc<ResolutionService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/", get(handlers::resolve))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
}
