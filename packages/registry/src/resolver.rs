//! Remote resolution of one API description.
//!
//! The registry does not fetch or parse RAML itself; it asks a resolution
//! endpoint (the atlas server) for the finished structure. The endpoint
//! answers either the serialised [`ApiStructure`] or the
//! `{"error":true,"message":…}` failure body, which is surfaced as the
//! resolution error.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use raml_atlas::wire::{ErrorBody, CLIENT_ID, CLIENT_ID_HEADER};
use raml_atlas::{ApiStructure, ResolveError};

/// The resolution seam of the registry; stubbed in tests.
#[async_trait]
pub trait ApiResolver: Send + Sync + 'static {
    async fn resolve(&self, locator: &Url) -> Result<ApiStructure, ResolveError>;
}

/// Resolves against a remote resolution endpoint over HTTP.
pub struct RemoteResolver {
    client: reqwest::Client,
    /// Endpoint base, e.g. `https://atlas.example.com/`. The locator is
    /// appended as the URL-encoded `api` query parameter.
    endpoint: String,
}

impl RemoteResolver {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client for remote resolution");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ApiResolver for RemoteResolver {
    async fn resolve(&self, locator: &Url) -> Result<ApiStructure, ResolveError> {
        let url = format!(
            "{}?api={}",
            self.endpoint,
            urlencoding::encode(locator.as_str())
        );

        let response = self
            .client
            .get(&url)
            .header(CLIENT_ID_HEADER, CLIENT_ID)
            .send()
            .await
            .map_err(|e| ResolveError::FetchFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::FetchFailure(e.to_string()))?;

        if !status.is_success() {
            // The endpoint reports failures as {"error":true,"message":…};
            // pass the message through when it decodes.
            if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
                return Err(ResolveError::FetchFailure(err.message));
            }
            return Err(ResolveError::FetchFailure(format!(
                "resolution endpoint returned {status}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| ResolveError::ParseFailure(e.to_string()))
    }
}
