//! SSE framing and stream setup.
//!
//! Wires a new [`StreamSession`] to an Axum SSE response: the session task
//! holds the channel sender, the response body drains the receiver. When
//! the client disconnects, hyper drops the body, the receiver goes with it
//! and the session observes the closed channel.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use dexstream_core::contracts::http::{ERROR_EVENT_NAME, FETCH_FAILED_MESSAGE};
use futures_util::stream::Stream;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::bootstrap::AxumContext;
use crate::session::{Frame, StreamSession};

impl From<Frame> for Event {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Record(json) => Self::default().data(json),
            Frame::FetchFailed => Self::default()
                .event(ERROR_EVENT_NAME)
                .data(fetch_failed_payload()),
        }
    }
}

/// Body of every error frame: `{"error": "Failed to fetch Pokemon"}`.
pub fn fetch_failed_payload() -> String {
    format!(r#"{{"error": "{FETCH_FAILED_MESSAGE}"}}"#)
}

/// Open a record stream for one client.
///
/// Spawns the session task and returns the SSE response that carries its
/// frames, with comment keep-alives so idle proxies keep the connection.
pub fn open_stream(
    ctx: &AxumContext,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + use<>> {
    let (sender, receiver) = mpsc::channel(ctx.stream.channel_capacity());
    let session = StreamSession::new(
        ctx.catalog.clone(),
        sender,
        ctx.stream.push_interval(),
        ctx.shutdown.child_token(),
    );

    let guard = ctx.sessions.open();
    tracing::info!(
        session_id = %session.id(),
        active = ctx.sessions.count(),
        "Client subscribed to record stream"
    );

    let span = tracing::info_span!("stream_session", session_id = %session.id());
    tokio::spawn(
        async move {
            let _guard = guard;
            session.run().await;
        }
        .instrument(span),
    );

    let stream = ReceiverStream::new(receiver).map(|frame| Ok(Event::from(frame)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(ctx.stream.keep_alive())
            .text("ping"),
    )
}
