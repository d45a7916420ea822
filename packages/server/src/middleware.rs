//! CORS response headers for the resolution endpoint.
//!
//! The endpoint is consumed cross-origin by page code on arbitrary sites, so
//! every response — success or error — carries a permissive CORS policy:
//! any origin, `GET` only, and the custom client-identifier header allowed.

use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

const ALLOWED_HEADERS: &str =
    "Origin, X-Requested-With, Content-Type, Accept, x-client-id";

/// Axum `from_fn` middleware that stamps CORS headers onto every response.
pub async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}
