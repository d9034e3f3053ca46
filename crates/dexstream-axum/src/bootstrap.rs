//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Uri};
use dexstream_catalog::{CatalogClientConfig, DefaultCatalogClient};
use dexstream_core::CatalogPort;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::ConfigError;
use crate::session::{ActiveSessions, StreamSettings};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins. Browsers on other origins may consume the stream.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Catalog client settings.
    pub catalog: CatalogClientConfig,
    /// Stream session timing.
    pub stream: StreamSettings,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Config with built-in defaults only.
    pub fn with_defaults() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog: CatalogClientConfig::default(),
            stream: StreamSettings::default(),
            cors: CorsConfig::default(),
        }
    }

    /// Read configuration from the process environment.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `PORT` | listen port | 8080 |
    /// | `DEXSTREAM_CATALOG_URL` | catalog base URL | PokeAPI |
    /// | `DEXSTREAM_PUSH_INTERVAL_SECS` | seconds between pushes | 6 |
    /// | `DEXSTREAM_CATALOG_SEED` | fixed RNG seed | entropy |
    /// | `DEXSTREAM_ALLOWED_ORIGINS` | comma-separated CORS origins | any |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::with_defaults();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = var("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("PORT", &raw, e))?;
        }

        if let Some(url) = var("DEXSTREAM_CATALOG_URL") {
            config.catalog = config.catalog.with_base_url(url.trim());
        }

        if let Some(raw) = var("DEXSTREAM_CATALOG_SEED") {
            let seed = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("DEXSTREAM_CATALOG_SEED", &raw, e))?;
            config.catalog = config.catalog.with_seed(seed);
        }

        if let Some(raw) = var("DEXSTREAM_PUSH_INTERVAL_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("DEXSTREAM_PUSH_INTERVAL_SECS", &raw, e))?;
            if secs == 0 {
                return Err(ConfigError::invalid(
                    "DEXSTREAM_PUSH_INTERVAL_SECS",
                    &raw,
                    "must be at least 1",
                ));
            }
            config.stream = config
                .stream
                .with_push_interval(Duration::from_secs(secs));
        }

        if let Some(raw) = var("DEXSTREAM_ALLOWED_ORIGINS") {
            let origins = raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(|o| {
                    check_origin(o).map(|()| o.to_string()).map_err(|reason| {
                        ConfigError::invalid("DEXSTREAM_ALLOWED_ORIGINS", o, reason)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if !origins.is_empty() {
                config.cors = CorsConfig::AllowOrigins(origins);
            }
        }

        Ok(config)
    }

    /// Set the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// An allowed origin is `scheme://host[:port]` with nothing after it.
fn check_origin(origin: &str) -> Result<(), &'static str> {
    let uri: Uri = origin.parse().map_err(|_| "not a URI")?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err("expected scheme://host[:port]");
    }
    if origin.ends_with('/') || uri.path_and_query().is_some_and(|p| p.as_str() != "/") {
        return Err("origin must not carry a path or query");
    }
    HeaderValue::from_str(origin).map_err(|_| "not a valid header value")?;
    Ok(())
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Shared catalog client used by every stream session.
    pub catalog: Arc<dyn CatalogPort>,
    /// Stream session timing.
    pub stream: StreamSettings,
    /// Open stream sessions.
    pub sessions: ActiveSessions,
    /// Cancelled on server shutdown; sessions hold child tokens.
    pub shutdown: CancellationToken,
}

impl AxumContext {
    /// Assemble a context around an existing catalog implementation.
    pub fn new(catalog: Arc<dyn CatalogPort>, stream: StreamSettings) -> Self {
        Self {
            catalog,
            stream,
            sessions: ActiveSessions::new(),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Build the context with the production catalog client.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let client = DefaultCatalogClient::new(&config.catalog)
        .context("failed to build catalog client")?;

    info!(
        target: "dexstream.bootstrap",
        catalog_url = config.catalog.base_url(),
        max_id = config.catalog.max_id(),
        push_interval_secs = config.stream.push_interval().as_secs_f64(),
        cors = ?config.cors,
        "Axum bootstrap resolved configuration"
    );

    Ok(AxumContext::new(Arc::new(client), config.stream))
}

/// Start the web server on the configured port.
///
/// Runs until Ctrl-C or SIGTERM. Shutdown cancels every stream session
/// first so their responses end and connections can drain.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;
    let shutdown = ctx.shutdown.clone();
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("dexstream listening on http://{}", addr);
    info!("Open http://localhost:{} in your browser", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("dexstream stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown requested, closing stream sessions");
    shutdown.cancel();
}
