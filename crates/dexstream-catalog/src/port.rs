//! Port trait implementation for `CatalogClient`.
//!
//! Implements the core-owned `CatalogPort` trait, mapping internal errors to
//! the port taxonomy and raw payloads to normalized records.

use async_trait::async_trait;
use dexstream_core::{
    CatalogError, CatalogPort, CatalogResult, DexRecord, PokemonPayload, normalize,
};
use tracing::debug;

use crate::client::CatalogClient;
use crate::error::CatalogHttpError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `CatalogHttpError` to core `CatalogError`.
fn map_error(err: CatalogHttpError) -> CatalogError {
    match err {
        CatalogHttpError::ApiRequestFailed { status, .. } => {
            CatalogError::UpstreamError { status }
        }
        CatalogHttpError::Network(e) => CatalogError::UpstreamUnavailable {
            message: describe_transport_error(&e),
        },
        CatalogHttpError::InvalidUrl(e) => CatalogError::UpstreamUnavailable {
            message: format!("invalid request URL: {e}"),
        },
        CatalogHttpError::JsonParse(e) => CatalogError::MalformedResponse {
            message: e.to_string(),
        },
        CatalogHttpError::InvalidPayload(e) => CatalogError::MalformedResponse {
            message: e.to_string(),
        },
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

// ============================================================================
// CatalogPort Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> CatalogPort for CatalogClient<B> {
    async fn fetch_random(&self) -> CatalogResult<DexRecord> {
        let id = self.next_id();
        let url = self.record_url(id);
        debug!(catalog_id = id, %url, "Fetching catalog record");

        let payload: PokemonPayload = self.backend.get_json(&url).await.map_err(map_error)?;
        payload
            .validate()
            .map_err(|e| map_error(CatalogHttpError::InvalidPayload(e)))?;

        Ok(normalize(payload))
    }
}
