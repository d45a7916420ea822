//! Server configuration, populated from environment variables.

use std::net::SocketAddr;

/// Runtime configuration for the resolution server.
///
/// All fields come from environment variables with defaults, so the server
/// starts with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `ATLAS_BIND` | `0.0.0.0:8080` | TCP socket address to listen on |
/// | `ATLAS_DB` | (absent = in-memory) | Path to the SQLite cache file |
/// | `ATLAS_FETCH_TIMEOUT_SECS` | `30` | Timeout for outbound document fetches |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Path to the SQLite cache database.
    /// `None` means use an in-memory store (cache is lost on restart).
    pub db_path: Option<String>,

    /// Timeout applied to outbound fetches of API descriptions and their
    /// referenced documents.
    pub fetch_timeout_secs: u64,
}

impl ServerConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = std::env::var("ATLAS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .expect("ATLAS_BIND must be a valid socket address (e.g. 0.0.0.0:8080)");

        let fetch_timeout_secs = std::env::var("ATLAS_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            bind_addr,
            db_path: std::env::var("ATLAS_DB").ok(),
            fetch_timeout_secs,
        }
    }
}
