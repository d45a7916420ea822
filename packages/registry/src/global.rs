//! Optional process-wide lookup adapter.
//!
//! The core registry is dependency-injected; this module is the single
//! outermost-boundary adapter for environments that want one shared lookup
//! function. Registration is cooperative: if a registry is already
//! installed, installing another is a no-op, not an error.

use std::sync::{Arc, OnceLock};

use raml_atlas::{ApiStructure, ResolveError};

use crate::registry::ProviderRegistry;

static REGISTRY: OnceLock<Arc<ProviderRegistry>> = OnceLock::new();

/// Install `registry` as the process-wide lookup target.
///
/// Returns `true` if this call installed it, `false` if one was already
/// present (in which case the call is a no-op).
pub fn install(registry: Arc<ProviderRegistry>) -> bool {
    REGISTRY.set(registry).is_ok()
}

/// The installed registry, if any.
pub fn installed() -> Option<Arc<ProviderRegistry>> {
    REGISTRY.get().cloned()
}

/// Process-wide provider lookup; delegates to the installed registry.
pub async fn request_provider(name: &str) -> Result<ApiStructure, ResolveError> {
    match REGISTRY.get() {
        Some(registry) => registry.request_provider(name).await,
        None => Err(ResolveError::InvalidInput(
            "no provider registry installed".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::resolver::ApiResolver;
    use async_trait::async_trait;
    use url::Url;

    struct EmptyResolver;

    #[async_trait]
    impl ApiResolver for EmptyResolver {
        async fn resolve(&self, _locator: &Url) -> Result<ApiStructure, ResolveError> {
            Ok(ApiStructure::default())
        }
    }

    // OnceLock is process state, so everything global lives in one test.
    #[tokio::test]
    async fn installation_is_idempotent_and_lookup_delegates() {
        let registry = Arc::new(ProviderRegistry::new(Arc::new(EmptyResolver)));
        registry
            .run_discovery("<html></html>", &Url::parse("https://site.example/").unwrap())
            .await;

        assert!(install(Arc::clone(&registry)));
        // Second installation is a cooperative no-op.
        let other = Arc::new(ProviderRegistry::new(Arc::new(EmptyResolver)));
        assert!(!install(other));
        assert!(installed().is_some());

        let err = request_provider("anything").await.unwrap_err();
        assert!(matches!(err, ResolveError::UnknownProvider(_)));
    }
}
