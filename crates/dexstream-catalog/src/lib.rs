#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{CatalogClient, DefaultCatalogClient};

// HTTP backend seam
pub use http::{HttpBackend, ReqwestBackend};

// Configuration
pub use config::{CatalogClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_ID, DEFAULT_TIMEOUT};

// Errors
pub use error::{CatalogHttpError, CatalogHttpResult};

// Silence unused dev-dependency warnings (axum serves fixtures in tests/)
#[cfg(test)]
use axum as _;
