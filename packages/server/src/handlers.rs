//! HTTP handler for the resolution endpoint.
//!
//! One route: `GET /?api=<url-encoded locator>`. A missing `api` parameter
//! and every resolution failure come back as 400 with the
//! `{"error":true,"message":…}` body; success is the serialised structure.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::service::ResolutionService;

/// Shared application state threaded through handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ResolutionService>,
}

/// Query parameters for `GET /`.
#[derive(Debug, Deserialize, Default)]
pub struct ResolveParams {
    /// URL of the API description to resolve. Arrives URL-encoded; axum's
    /// query extractor decodes it.
    pub api: Option<String>,
}

/// `GET /` — resolve one API description to its structured form.
pub async fn resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<impl IntoResponse, AppError> {
    let locator = params
        .api
        .filter(|api| !api.is_empty())
        .ok_or_else(|| AppError::BadRequest("API file not specified.".into()))?;

    let structure = state.service.resolve(&locator).await?;
    Ok(Json(structure))
}
