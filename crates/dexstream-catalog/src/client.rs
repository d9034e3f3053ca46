//! Catalog client for fetching random records.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::CatalogHttpResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::url::{build_record_url, parse_base_url};

/// Default catalog client using the reqwest HTTP backend.
pub type DefaultCatalogClient = CatalogClient<ReqwestBackend>;

/// Client for the remote record catalog.
///
/// Generic over an HTTP backend so tests can inject a fake. The random
/// generator is owned by the client; sessions sharing one client draw from
/// one sequence, which stays reproducible under a fixed seed.
pub struct CatalogClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) base_url: Url,
    pub(crate) max_id: u32,
    rng: Mutex<StdRng>,
}

impl DefaultCatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &CatalogClientConfig) -> CatalogHttpResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        Self::with_backend(config, backend)
    }
}

impl<B: HttpBackend> CatalogClient<B> {
    /// Create a client over a custom backend.
    pub fn with_backend(config: &CatalogClientConfig, backend: B) -> CatalogHttpResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Ok(Self {
            backend,
            base_url,
            max_id: config.max_id.max(1),
            rng: Mutex::new(rng),
        })
    }

    /// Draw an identifier uniformly from `[1, max_id]`.
    pub fn next_id(&self) -> u32 {
        // The generator has no invariant a panic could break.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(1..=self.max_id)
    }

    /// URL of the record with the given identifier.
    pub fn record_url(&self, id: u32) -> Url {
        build_record_url(&self.base_url, id)
    }
}
