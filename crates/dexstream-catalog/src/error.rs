//! Internal error types for catalog HTTP operations.
//!
//! These errors are specific to `dexstream-catalog` and are mapped to the
//! core `CatalogError` at the port boundary.

use dexstream_core::PayloadError;
use thiserror::Error;

/// Result type alias for catalog HTTP operations.
pub type CatalogHttpResult<T> = Result<T, CatalogHttpError>;

/// Errors related to catalog API operations.
#[derive(Debug, Error)]
pub enum CatalogHttpError {
    /// API request failed with an HTTP error status.
    #[error("Catalog request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The body decoded but describes an impossible record.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_failed_error_message() {
        let error = CatalogHttpError::ApiRequestFailed {
            status: 404,
            url: "https://pokeapi.co/api/v2/pokemon/2000".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("pokemon/2000"));
    }

    #[test]
    fn test_json_parse_error_message() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let error = CatalogHttpError::from(err);
        assert!(error.to_string().starts_with("JSON parsing error"));
    }

    #[test]
    fn test_invalid_payload_error_message() {
        let error = CatalogHttpError::from(PayloadError::EmptyName);
        assert!(error.to_string().contains("name is empty"));
    }
}
