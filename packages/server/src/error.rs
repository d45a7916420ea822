//! Application-level error type returned by handlers.
//!
//! Every failure a handler can hit serialises to the endpoint's
//! `{"error":true,"message":…}` JSON body. Resolution failures of any kind
//! (fetch, parse, invalid locator) map to 400, matching the endpoint
//! contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use raml_atlas::wire::ErrorBody;
use raml_atlas::ResolveError;

/// An error a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::BadRequest(message) = self;
        (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        // The endpoint reports all resolution failures as 400 with the
        // failure's message; store failures never reach here (the service
        // degrades them to cache misses or logs them).
        AppError::BadRequest(e.to_string())
    }
}
