//! The provider registry state machine.
//!
//! Two states, one transition:
//!
//! ```text
//! Discovering { pending } ──(all link resolutions settled)──▶ Ready { providers }
//! ```
//!
//! While discovering, `request_provider` queues the caller; on transition
//! every queued request is answered exactly once against the final provider
//! map, and a watch channel flips so passive observers learn that discovery
//! settled without polling. A single failed link never aborts discovery — it
//! only means that name never becomes a provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch};
use tokio::task::JoinSet;
use url::Url;

use raml_atlas::{ApiStructure, ResolveError, SourceDescriptor};

use crate::discovery::discover_links;
use crate::resolver::ApiResolver;

/// A lookup issued before discovery settled. Answered exactly once on the
/// state transition, then discarded.
struct PendingRequest {
    name: String,
    reply: oneshot::Sender<Result<ApiStructure, ResolveError>>,
}

enum State {
    Discovering { pending: Vec<PendingRequest> },
    Ready { providers: HashMap<String, ApiStructure> },
}

/// Registry of resolved API structures, keyed by the discovering link's title.
pub struct ProviderRegistry {
    resolver: Arc<dyn ApiResolver>,
    /// Never held across an await; all mutation happens in synchronous
    /// sections of the completion handlers.
    state: Mutex<State>,
    ready_tx: watch::Sender<bool>,
}

impl ProviderRegistry {
    /// Create a registry in the `Discovering` state. Callers drive discovery
    /// with [`run_discovery`](Self::run_discovery) or use
    /// [`start`](Self::start) to spawn it.
    pub fn new(resolver: Arc<dyn ApiResolver>) -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            resolver,
            state: Mutex::new(State::Discovering {
                pending: Vec::new(),
            }),
            ready_tx,
        }
    }

    /// Construct a registry and spawn its discovery over `html` in the
    /// background. Lookups may be issued immediately; they settle once
    /// discovery does.
    pub fn start(resolver: Arc<dyn ApiResolver>, html: String, base: Url) -> Arc<Self> {
        let registry = Arc::new(Self::new(resolver));
        let task = Arc::clone(&registry);
        tokio::spawn(async move {
            task.run_discovery(&html, &base).await;
        });
        registry
    }

    /// Scan `html` for description links, resolve them all concurrently, and
    /// transition to `Ready` once every resolution has settled.
    pub async fn run_discovery(&self, html: &str, base: &Url) {
        let sources = discover_links(html, base);
        tracing::info!("discovered {} API description link(s)", sources.len());

        let mut resolutions: JoinSet<(SourceDescriptor, Result<ApiStructure, ResolveError>)> =
            JoinSet::new();
        for source in sources {
            let resolver = Arc::clone(&self.resolver);
            resolutions.spawn(async move {
                let result = resolver.resolve(&source.locator).await;
                (source, result)
            });
        }

        let mut providers = HashMap::new();
        while let Some(joined) = resolutions.join_next().await {
            let (source, result) = match joined {
                Ok(settled) => settled,
                Err(e) => {
                    tracing::warn!("resolution task failed: {e}");
                    continue;
                }
            };
            match result {
                Ok(structure) => {
                    providers.insert(source.name, structure);
                }
                Err(e) => {
                    tracing::warn!(
                        "provider {:?} at {} failed to resolve: {e}",
                        source.name,
                        source.locator
                    );
                }
            }
        }

        self.finish(providers);
    }

    /// Look up a resolved API by name.
    ///
    /// An empty name is rejected immediately, before any queueing or I/O.
    /// While discovery is in flight the call parks until the transition;
    /// afterwards it settles immediately — with the structure, or with an
    /// unknown-API error naming the request.
    pub async fn request_provider(&self, name: &str) -> Result<ApiStructure, ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::InvalidInput(
                "API name must not be empty".into(),
            ));
        }

        let receiver = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            match &mut *state {
                State::Ready { providers } => return lookup(providers, name),
                State::Discovering { pending } => {
                    let (reply, receiver) = oneshot::channel();
                    pending.push(PendingRequest {
                        name: name.to_string(),
                        reply,
                    });
                    receiver
                }
            }
        };

        // Sender dropped without a reply only if the registry was torn down
        // mid-discovery; report the name as unresolved.
        receiver
            .await
            .unwrap_or_else(|_| Err(ResolveError::UnknownProvider(name.to_string())))
    }

    /// `true` once discovery has settled.
    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    /// Subscribe to the discovery-complete notification.
    ///
    /// The channel holds `false` until the `Discovering → Ready` transition,
    /// then `true` forever.
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// Wait until discovery has settled.
    pub async fn wait_ready(&self) {
        let mut receiver = self.subscribe_ready();
        while !*receiver.borrow_and_update() {
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }

    /// `Discovering → Ready`: install the final provider map, drain every
    /// queued request exactly once, then notify observers.
    fn finish(&self, providers: HashMap<String, ApiStructure>) {
        let drained = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            match std::mem::replace(
                &mut *state,
                State::Ready {
                    providers: providers.clone(),
                },
            ) {
                State::Discovering { pending } => pending,
                State::Ready { providers: previous } => {
                    // Discovery ran twice; keep the original map.
                    tracing::warn!("discovery finished twice; ignoring the second result");
                    *state = State::Ready {
                        providers: previous,
                    };
                    return;
                }
            }
        };

        for request in drained {
            let result = lookup(&providers, &request.name);
            // The receiver may have given up; that is its business.
            let _ = request.reply.send(result);
        }

        // `send` would fail (and drop the value) when no receiver is alive;
        // the channel must hold `true` for late subscribers regardless.
        self.ready_tx.send_replace(true);
    }
}

fn lookup(
    providers: &HashMap<String, ApiStructure>,
    name: &str,
) -> Result<ApiStructure, ResolveError> {
    providers
        .get(name)
        .cloned()
        .ok_or_else(|| ResolveError::UnknownProvider(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    const PAGE: &str = r#"
        <html><head>
          <link rel="alternate" type="application/raml" title="weather" href="/apis/weather.raml">
        </head></html>
    "#;

    fn base() -> Url {
        Url::parse("https://site.example/index.html").unwrap()
    }

    fn forecast_structure() -> ApiStructure {
        serde_json::from_value(
            json!({ "forecast": { "docs": "", "get": { "docs": "Get forecast" } } }),
        )
        .unwrap()
    }

    /// Resolver that answers from a canned map, optionally waiting on a gate
    /// first, and counts how often it is called.
    struct StubResolver {
        responses: HashMap<String, Result<ApiStructure, String>>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl StubResolver {
        fn answering(responses: HashMap<String, Result<ApiStructure, String>>) -> Self {
            Self {
                responses,
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn never_called() -> Self {
            Self::answering(HashMap::new())
        }
    }

    #[async_trait]
    impl ApiResolver for StubResolver {
        async fn resolve(&self, locator: &Url) -> Result<ApiStructure, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.responses.get(locator.as_str()) {
                Some(Ok(structure)) => Ok(structure.clone()),
                Some(Err(message)) => Err(ResolveError::FetchFailure(message.clone())),
                None => Err(ResolveError::FetchFailure(format!(
                    "no canned response for {locator}"
                ))),
            }
        }
    }

    fn weather_resolver() -> StubResolver {
        StubResolver::answering(HashMap::from([(
            "https://site.example/apis/weather.raml".to_string(),
            Ok(forecast_structure()),
        )]))
    }

    #[tokio::test]
    async fn lookup_after_discovery_resolves_the_structure() {
        let registry = ProviderRegistry::new(Arc::new(weather_resolver()));
        registry.run_discovery(PAGE, &base()).await;

        let structure = registry.request_provider("weather").await.unwrap();
        assert_eq!(
            serde_json::to_value(&structure).unwrap(),
            json!({ "forecast": { "docs": "", "get": { "docs": "Get forecast" } } })
        );
    }

    #[tokio::test]
    async fn lookups_issued_before_readiness_are_queued_and_replayed() {
        let gate = Arc::new(Notify::new());
        let mut resolver = weather_resolver();
        resolver.gate = Some(Arc::clone(&gate));
        let resolver = Arc::new(resolver);

        let registry = ProviderRegistry::start(
            Arc::clone(&resolver) as Arc<dyn ApiResolver>,
            PAGE.to_string(),
            base(),
        );

        let early_hit = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.request_provider("weather").await })
        };
        let early_miss = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.request_provider("nonexistent").await })
        };

        // Wait for the resolution to park on the gate, then release it.
        while resolver.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(!registry.is_ready());
        gate.notify_waiters();

        assert!(early_hit.await.unwrap().is_ok());
        let err = early_miss.await.unwrap().unwrap_err();
        assert!(err.to_string().contains("nonexistent"));
        assert!(registry.is_ready());
    }

    #[tokio::test]
    async fn empty_name_rejects_immediately_without_any_resolution() {
        let resolver = Arc::new(StubResolver::never_called());
        let registry = ProviderRegistry::new(Arc::clone(&resolver) as Arc<dyn ApiResolver>);

        // Still discovering: the rejection must not queue or touch I/O.
        let err = registry.request_provider("").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidInput(_)));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_name_after_readiness_rejects_with_the_name() {
        let registry = ProviderRegistry::new(Arc::new(StubResolver::never_called()));
        registry.run_discovery("<html></html>", &base()).await;

        let err = registry.request_provider("payments").await.unwrap_err();
        assert!(matches!(err, ResolveError::UnknownProvider(_)));
        assert!(err.to_string().contains("payments"));
    }

    #[tokio::test]
    async fn failed_link_is_isolated_from_the_rest_of_discovery() {
        let html = r#"
            <link rel="alternate" type="application/raml" title="weather" href="/apis/weather.raml">
            <link rel="alternate" type="application/raml" title="broken" href="/apis/broken.raml">
        "#;
        let resolver = StubResolver::answering(HashMap::from([
            (
                "https://site.example/apis/weather.raml".to_string(),
                Ok(forecast_structure()),
            ),
            (
                "https://site.example/apis/broken.raml".to_string(),
                Err("parse failed: bad document".to_string()),
            ),
        ]));

        let registry = ProviderRegistry::new(Arc::new(resolver));
        registry.run_discovery(html, &base()).await;

        assert!(registry.request_provider("weather").await.is_ok());
        let err = registry.request_provider("broken").await.unwrap_err();
        assert!(matches!(err, ResolveError::UnknownProvider(_)));
    }

    #[tokio::test]
    async fn readiness_notification_fires_once_discovery_settles() {
        let registry = ProviderRegistry::new(Arc::new(StubResolver::never_called()));
        let mut ready = registry.subscribe_ready();
        assert!(!*ready.borrow_and_update());

        registry.run_discovery("<html></html>", &base()).await;

        ready.changed().await.unwrap();
        assert!(*ready.borrow_and_update());
    }

    #[tokio::test]
    async fn wait_ready_returns_for_late_subscribers() {
        let registry = ProviderRegistry::new(Arc::new(StubResolver::never_called()));
        registry.run_discovery("<html></html>", &base()).await;
        // Already ready; must not hang.
        registry.wait_ready().await;
    }
}
