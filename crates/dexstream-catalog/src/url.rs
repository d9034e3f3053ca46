//! URL construction helpers for the catalog API.

use crate::error::{CatalogHttpError, CatalogHttpResult};
use url::Url;

/// Parse and check a configured base URL.
///
/// The base must be hierarchical (`http://host/path`) so identifiers can be
/// appended as a path segment.
pub fn parse_base_url(raw: &str) -> CatalogHttpResult<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(CatalogHttpError::InvalidUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    Ok(url)
}

/// Build `{base}/{id}`, tolerating a trailing slash on the base.
pub fn build_record_url(base_url: &Url, id: u32) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&id.to_string());
    }
    url
}
