//! Catalog port for fetching randomized records.
//!
//! This port defines the interface stream sessions use to obtain records.
//! The implementation lives in `dexstream-catalog`; tests substitute
//! `MockCatalogPort` (feature `test-utils`) or a hand-written fake.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DexRecord;

/// Errors from a single catalog fetch.
///
/// These are domain-level errors. Transport and decoding details from the
/// adapter are flattened into the message fields. None of them are shown to
/// stream clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request never produced a response (timeout, refused, DNS).
    #[error("Catalog unavailable: {message}")]
    UpstreamUnavailable {
        /// Description of the transport failure
        message: String,
    },

    /// The catalog answered with a non-success status.
    #[error("Catalog returned status {status}")]
    UpstreamError {
        /// HTTP status code
        status: u16,
    },

    /// The response body did not match the expected payload shape.
    #[error("Malformed catalog response: {message}")]
    MalformedResponse {
        /// What failed to decode or validate
        message: String,
    },
}

/// Result type alias for catalog port operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of randomized, normalized records.
///
/// Every call is one fresh upstream round trip: no retry, no caching.
/// Implementations must be safe to share across concurrently running
/// stream sessions.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetch one record for a uniformly random catalog identifier.
    async fn fetch_random(&self) -> CatalogResult<DexRecord>;
}
