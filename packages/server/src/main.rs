//! `atlas-server` — RAML resolution service.
//!
//! # Quick start
//!
//! ```sh
//! # In-memory cache on the default port:
//! atlas-server
//!
//! # Persistent SQLite cache:
//! ATLAS_DB=./cache.db atlas-server
//!
//! # Custom bind address:
//! ATLAS_BIND=0.0.0.0:3000 atlas-server
//! ```
//!
//! # Environment variables
//!
//! See [`ServerConfig::from_env`] for the full list.

use std::sync::Arc;
use std::time::Duration;

use raml_atlas::parser::{JsonSpecParser, SpecParser};
use raml_atlas_server::{
    build_router, ConditionalFetch, HttpFetcher, MemoryStore, ResolutionService, ResultStore,
    ServerConfig, SqliteStore,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raml_atlas_server=info,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    let store: Arc<dyn ResultStore> = match &config.db_path {
        Some(path) => {
            tracing::info!("cache: SQLite at {path}");
            Arc::new(
                SqliteStore::open(path)
                    .unwrap_or_else(|e| panic!("failed to open SQLite cache at {path}: {e}")),
            )
        }
        None => {
            tracing::info!("cache: in-memory (lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let timeout = Duration::from_secs(config.fetch_timeout_secs);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to build HTTP client for reference reads");

    let fetcher: Arc<dyn ConditionalFetch> = Arc::new(HttpFetcher::new(timeout));
    let parser: Arc<dyn SpecParser> = Arc::new(JsonSpecParser);
    let service = Arc::new(ResolutionService::new(fetcher, parser, store, client));

    let app = build_router(service);

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app).await.expect("server error");
}
