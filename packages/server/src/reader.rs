//! HTTP-backed [`ReferenceReader`] for parser cross references.
//!
//! RAML documents can pull in other files (`!include` style). The parser
//! reads those through this adapter: relative paths resolve against the
//! source document's URL, absolute URLs are fetched as-is.

use async_trait::async_trait;
use url::Url;

use raml_atlas::parser::{ReferenceReader, RemoteContent};
use raml_atlas::ResolveError;

/// Reads referenced documents over plain GETs.
pub struct HttpReferenceReader {
    client: reqwest::Client,
    /// URL of the document being parsed; relative reads join against it.
    base: Url,
}

impl HttpReferenceReader {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    async fn get_text(&self, url: Url) -> Result<String, ResolveError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ResolveError::FetchFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ResolveError::FetchFailure(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ResolveError::FetchFailure(e.to_string()))
    }
}

#[async_trait]
impl ReferenceReader for HttpReferenceReader {
    async fn read_relative(&self, path: &str) -> Result<String, ResolveError> {
        let url = self.base.join(path).map_err(|e| {
            ResolveError::FetchFailure(format!("cannot resolve reference {path:?}: {e}"))
        })?;
        self.get_text(url).await
    }

    async fn read_absolute(&self, url: &str) -> Result<RemoteContent, ResolveError> {
        tracing::debug!("resolving absolute reference {url}");
        let url = Url::parse(url).map_err(|e| {
            ResolveError::FetchFailure(format!("invalid reference URL {url:?}: {e}"))
        })?;
        let content = self.get_text(url).await?;
        Ok(RemoteContent { content })
    }
}
