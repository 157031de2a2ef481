//! HTTP server for tome build artifacts.
//!
//! Serves a directory produced by `tome build` as-is. There is no rendering
//! at request time: each request maps onto a file in the artifact, a
//! directory's `index.html`, or the artifact's `404.html`.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tome_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "0.0.0.0".to_owned(),
//!         port: 80,
//!         root_dir: PathBuf::from("site"),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (tome-server)
//!                        │
//!                        ├─► security headers, gzip, request tracing
//!                        │
//!                        └─► static files ──► artifact directory
//! ```

mod app;
mod error;
mod middleware;
mod state;
mod static_files;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Build artifact directory to serve.
    pub root_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 80,
            root_dir: PathBuf::from("site"),
        }
    }
}

/// Run the server in the foreground until Ctrl-C or SIGTERM.
///
/// A missing or empty artifact directory is not an error: the server starts
/// and answers every request with 404.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to bind.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    check_artifact(&config.root_dir);

    let state = Arc::new(AppState {
        root_dir: config.root_dir.clone(),
    });
    let app = app::create_router(state);

    let ip: IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(address = %addr, root = %config.root_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Warn when there is nothing to serve.
fn check_artifact(root: &Path) {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "Artifact directory does not exist, every request will return 404");
    } else if !root.join("index.html").is_file() {
        tracing::warn!(root = %root.display(), "Artifact has no index.html, the home page will return 404");
    }
}

/// Wait for shutdown signal (Ctrl-C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from tome config.
///
/// The served directory defaults to the build output directory.
#[must_use]
pub fn server_config_from_config(config: &tome_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root_dir: config.docs_resolved.output_dir.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let config = tome_config::Config::from_toml(
            "[server]\nhost = \"127.0.0.1\"\nport = 8080\n\n[docs]\noutput_dir = \"public\"\n",
            None,
            Path::new("/project"),
        )
        .unwrap();

        let server = server_config_from_config(&config);

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 8080);
        assert_eq!(server.root_dir, PathBuf::from("/project/public"));
    }

    #[test]
    fn test_default_listens_on_port_80() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 80);
    }

    #[tokio::test]
    async fn test_invalid_host_is_rejected() {
        let config = ServerConfig {
            host: "not an ip".to_owned(),
            ..ServerConfig::default()
        };
        let err = run_server(config).await.unwrap_err();
        assert!(matches!(err, ServerError::AddrParse(_)));
    }
}
