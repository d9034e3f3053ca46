//! HTTP route constants.

/// Embedded presentation document.
pub const INDEX_PATH: &str = "/";

/// Server-sent event stream of catalog records.
pub const EVENTS_PATH: &str = "/events";

/// Liveness probe. Never touches the catalog.
pub const HEALTH_PATH: &str = "/health";

/// Payload of the error frame sent when a fetch fails.
/// Upstream detail is logged server-side and never sent to clients.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch Pokemon";

/// SSE event name used for error frames.
pub const ERROR_EVENT_NAME: &str = "error";
