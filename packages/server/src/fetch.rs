//! Conditional document fetching.
//!
//! One GET per resolution attempt, carrying whatever precondition the stored
//! validator supports: `If-None-Match` when an ETag is known, otherwise
//! `If-Modified-Since` from the last access time. A 304 tells the caller to
//! reuse its stored tree; anything else successful replaces body and
//! validator wholesale. No retries — a failed fetch fails the resolution.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, StatusCode};
use url::Url;

use raml_atlas::wire::{CLIENT_ID, CLIENT_ID_HEADER};
use raml_atlas::{ResolveError, Validator};

/// Result of one conditional fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The origin answered 304; the previously stored result is still valid.
    NotModified,
    /// A fresh body, with the validator to store alongside whatever is
    /// built from it.
    Fresh { body: String, validator: Validator },
}

/// The fetch seam of the resolution pipeline.
///
/// Implemented over HTTP by [`HttpFetcher`]; tests substitute stubs.
#[async_trait]
pub trait ConditionalFetch: Send + Sync + 'static {
    async fn fetch(
        &self,
        locator: &Url,
        validator: Option<&Validator>,
    ) -> Result<FetchOutcome, ResolveError>;
}

/// Build the precondition header for a validator, if it supports one.
///
/// ETag wins over last-access time when both are present.
fn precondition(validator: &Validator) -> Option<(&'static str, String)> {
    if let Some(etag) = &validator.etag {
        return Some(("if-none-match", etag.clone()));
    }
    validator
        .last_access
        .map(|t| ("if-modified-since", httpdate::fmt_http_date(t.into())))
}

/// Fetches documents over HTTP with `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given outbound timeout.
    pub fn new(timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client for document fetches");
        Self { client }
    }

    /// Wrap an existing client (shared with the reference reader).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConditionalFetch for HttpFetcher {
    async fn fetch(
        &self,
        locator: &Url,
        validator: Option<&Validator>,
    ) -> Result<FetchOutcome, ResolveError> {
        let mut request = self
            .client
            .get(locator.clone())
            .header(CLIENT_ID_HEADER, CLIENT_ID);

        if let Some((name, value)) = validator.and_then(precondition) {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResolveError::FetchFailure(e.to_string()))?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }

        if !response.status().is_success() {
            return Err(ResolveError::FetchFailure(format!(
                "GET {locator} returned {}",
                response.status()
            )));
        }

        let etag = response
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::FetchFailure(e.to_string()))?;

        Ok(FetchOutcome::Fresh {
            body,
            validator: Validator {
                etag,
                last_access: Some(Utc::now()),
            },
        })
    }
}
