//! SSE events handler - the record stream.
//!
//! Each request opens its own stream session. Nothing is shared between
//! clients except the catalog client.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;

use crate::sse;
use crate::state::AppState;

/// SSE record stream endpoint.
///
/// Pushes one record immediately, then one per push interval, until the
/// client goes away or the server shuts down. Failed fetches arrive as
/// `error` events and the stream carries on.
pub async fn stream(
    State(state): State<AppState>,
) -> (
    [(header::HeaderName, &'static str); 1],
    Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>,
) {
    ([(header::CONNECTION, "keep-alive")], sse::open_stream(&state))
}
