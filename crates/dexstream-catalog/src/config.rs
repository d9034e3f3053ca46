//! Public configuration for the catalog client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

/// Default catalog endpoint. Records live at `{base}/{id}`.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Highest identifier in the default catalog.
pub const DEFAULT_MAX_ID: u32 = 1010;

/// Per-request ceiling, including connect and body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for the catalog client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use dexstream_catalog::CatalogClientConfig;
/// use std::time::Duration;
///
/// let config = CatalogClientConfig::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_seed(7);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL of the record collection
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Upper bound (inclusive) of the random identifier range
    pub(crate) max_id: u32,
    /// Fixed RNG seed; `None` seeds from OS entropy
    pub(crate) seed: Option<u64>,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("dexstream-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_id: DEFAULT_MAX_ID,
            seed: None,
        }
    }
}

impl CatalogClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the record collection.
    ///
    /// Defaults to `https://pokeapi.co/api/v2/pokemon`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 15 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the highest identifier to draw from. Values below 1 are clamped.
    #[must_use]
    pub fn with_max_id(mut self, max_id: u32) -> Self {
        self.max_id = max_id.max(1);
        self
    }

    /// Seed the identifier generator for reproducible sequences.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set an optional seed.
    #[must_use]
    pub const fn with_optional_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn max_id(&self) -> u32 {
        self.max_id
    }
}
