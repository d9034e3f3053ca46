//! Per-connection stream sessions.
//!
//! A [`StreamSession`] owns one client's push channel. It pushes a record as
//! soon as it starts, then once per tick, until the client goes away or the
//! server shuts down. Sessions share nothing with each other except the
//! catalog client, so fan-out is one task per connected client.
//!
//! The connection handle is the sending half of a bounded channel whose
//! receiving half is the HTTP response body. Dropping the body (peer
//! disconnect) resolves [`mpsc::Sender::closed`], which every wait in the
//! session races against. Once the receiver is gone a send cannot succeed,
//! so nothing is ever written to a dead connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dexstream_core::CatalogPort;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default time between pushes.
pub const DEFAULT_PUSH_INTERVAL: Duration = Duration::from_secs(6);

/// Default interval of SSE comment pings on an otherwise idle stream.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Frames buffered between a session and a slow client.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4;

const MIN_PUSH_INTERVAL: Duration = Duration::from_millis(1);

/// One framed event for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A JSON-encoded `DexRecord`.
    Record(String),
    /// The fetch for this tick failed. Carries no upstream detail.
    FetchFailed,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client closed the stream. This is the normal way to end.
    ClientDisconnected,
    /// The server is shutting down.
    ServerShutdown,
}

/// What a finished session did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_sent: u64,
    pub fetch_failures: u64,
    pub reason: CloseReason,
}

/// Timing and buffering for stream sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub(crate) push_interval: Duration,
    pub(crate) keep_alive: Duration,
    pub(crate) channel_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            push_interval: DEFAULT_PUSH_INTERVAL,
            keep_alive: DEFAULT_KEEP_ALIVE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl StreamSettings {
    /// Set the time between pushes. Clamped to at least one millisecond.
    #[must_use]
    pub fn with_push_interval(mut self, interval: Duration) -> Self {
        self.push_interval = interval.max(MIN_PUSH_INTERVAL);
        self
    }

    /// Set the SSE keep-alive interval.
    #[must_use]
    pub const fn with_keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    /// Set the per-session frame buffer. Clamped to at least one.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub const fn push_interval(&self) -> Duration {
        self.push_interval
    }

    pub const fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    pub const fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

/// Stream session for a single client connection.
pub struct StreamSession {
    id: Uuid,
    catalog: Arc<dyn CatalogPort>,
    connection: mpsc::Sender<Frame>,
    push_interval: Duration,
    shutdown: CancellationToken,
    frames_sent: u64,
    fetch_failures: u64,
}

impl StreamSession {
    /// Create a session that writes into `connection`.
    ///
    /// `shutdown` ends the session from the server side; the client side is
    /// observed through the channel itself.
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        connection: mpsc::Sender<Frame>,
        push_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            connection,
            push_interval: push_interval.max(MIN_PUSH_INTERVAL),
            shutdown,
            frames_sent: 0,
            fetch_failures: 0,
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Run until the client disconnects or the server shuts down.
    ///
    /// Consumes the session, so the connection handle is released exactly
    /// once, when this returns.
    pub async fn run(mut self) -> SessionSummary {
        debug!(session_id = %self.id, "Stream session opened");

        let reason = self.stream().await;
        let summary = SessionSummary {
            frames_sent: self.frames_sent,
            fetch_failures: self.fetch_failures,
            reason,
        };

        info!(
            session_id = %self.id,
            frames_sent = summary.frames_sent,
            fetch_failures = summary.fetch_failures,
            reason = ?summary.reason,
            "Stream session closed"
        );
        summary
    }

    async fn stream(&mut self) -> CloseReason {
        // Opening: first record goes out before the first tick.
        if let Err(reason) = self.push().await {
            return reason;
        }

        let mut ticker = interval_at(Instant::now() + self.push_interval, self.push_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                reason = self.closed() => return reason,
                _ = ticker.tick() => {
                    if let Err(reason) = self.push().await {
                        return reason;
                    }
                }
            }
        }
    }

    /// Resolves once the client is gone or shutdown was requested.
    async fn closed(&self) -> CloseReason {
        tokio::select! {
            biased;
            () = self.connection.closed() => CloseReason::ClientDisconnected,
            () = self.shutdown.cancelled() => CloseReason::ServerShutdown,
        }
    }

    /// One fetch-and-write cycle.
    ///
    /// Catalog failures become an error frame and do not end the session.
    /// `Err` means the session must stop.
    async fn push(&mut self) -> Result<(), CloseReason> {
        let fetched = tokio::select! {
            biased;
            reason = self.closed() => return Err(reason),
            result = self.catalog.fetch_random() => result,
        };

        let frame = match fetched {
            Ok(record) => match serde_json::to_string(&record) {
                Ok(json) => Frame::Record(json),
                Err(e) => {
                    warn!(session_id = %self.id, error = %e, "Failed to serialize record");
                    self.fetch_failures += 1;
                    Frame::FetchFailed
                }
            },
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Catalog fetch failed");
                self.fetch_failures += 1;
                Frame::FetchFailed
            }
        };

        tokio::select! {
            biased;
            reason = self.closed() => Err(reason),
            sent = self.connection.send(frame) => match sent {
                Ok(()) => {
                    self.frames_sent += 1;
                    Ok(())
                }
                Err(_) => Err(CloseReason::ClientDisconnected),
            },
        }
    }
}

/// Number of open stream sessions.
///
/// Cheap to clone; every clone observes the same count.
#[derive(Debug, Clone, Default)]
pub struct ActiveSessions {
    count: Arc<AtomicUsize>,
}

impl ActiveSessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an opening session. The count drops when the guard does.
    #[must_use]
    pub fn open(&self) -> SessionGuard {
        let active = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(active, "Stream session registered");
        SessionGuard {
            count: Arc::clone(&self.count),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Keeps one session counted in [`ActiveSessions`] while alive.
#[derive(Debug)]
pub struct SessionGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let active = self.count.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(active, "Stream session deregistered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dexstream_core::testing::sample_record;
    use dexstream_core::{CatalogError, CatalogResult, DexRecord, MockCatalogPort};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    const PERIOD: Duration = Duration::from_secs(6);

    fn spawn_session(
        catalog: Arc<dyn CatalogPort>,
    ) -> (
        mpsc::Receiver<Frame>,
        CancellationToken,
        tokio::task::JoinHandle<SessionSummary>,
    ) {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let shutdown = CancellationToken::new();
        let session = StreamSession::new(catalog, tx, PERIOD, shutdown.clone());
        (rx, shutdown, tokio::spawn(session.run()))
    }

    fn record_frame(id: u32, name: &str) -> Frame {
        Frame::Record(serde_json::to_string(&sample_record(id, name)).unwrap())
    }

    /// Catalog whose first fetch succeeds and every later fetch hangs until
    /// dropped, announcing itself on `started`.
    struct HangingCatalog {
        calls: Mutex<u32>,
        started: Notify,
        never: Notify,
    }

    impl HangingCatalog {
        fn new() -> Self {
            Self {
                calls: Mutex::new(0),
                started: Notify::new(),
                never: Notify::new(),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CatalogPort for HangingCatalog {
        async fn fetch_random(&self) -> CatalogResult<DexRecord> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call == 1 {
                return Ok(sample_record(133, "eevee"));
            }
            self.started.notify_one();
            self.never.notified().await;
            Ok(sample_record(134, "vaporeon"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_frame_is_pushed_without_waiting_for_a_tick() {
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_fetch_random()
            .returning(|| Ok(sample_record(133, "eevee")));

        let started = Instant::now();
        let (mut rx, _shutdown, _handle) = spawn_session(Arc::new(catalog));

        assert_eq!(rx.recv().await, Some(record_frame(133, "eevee")));
        assert!(started.elapsed() < PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_the_push_interval_in_order() {
        let mut catalog = MockCatalogPort::new();
        let mut next_id = 0;
        catalog.expect_fetch_random().returning(move || {
            next_id += 1;
            Ok(sample_record(next_id, "eevee"))
        });

        let (mut rx, _shutdown, _handle) = spawn_session(Arc::new(catalog));

        let opened = Instant::now();
        let mut arrivals = Vec::new();
        for expected in 1..=3 {
            assert_eq!(rx.recv().await, Some(record_frame(expected, "eevee")));
            arrivals.push(opened.elapsed());
        }

        assert_eq!(arrivals, vec![Duration::ZERO, PERIOD, PERIOD * 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_sends_one_error_frame_and_continues() {
        let mut catalog = MockCatalogPort::new();
        let mut call = 0;
        catalog.expect_fetch_random().returning(move || {
            call += 1;
            if call == 2 {
                Err(CatalogError::UpstreamUnavailable {
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(sample_record(call, "eevee"))
            }
        });

        let (mut rx, _shutdown, handle) = spawn_session(Arc::new(catalog));

        assert_eq!(rx.recv().await, Some(record_frame(1, "eevee")));
        assert_eq!(rx.recv().await, Some(Frame::FetchFailed));
        assert_eq!(rx.recv().await, Some(record_frame(3, "eevee")));

        drop(rx);
        let summary = handle.await.unwrap();
        assert_eq!(
            summary,
            SessionSummary {
                frames_sent: 3,
                fetch_failures: 1,
                reason: CloseReason::ClientDisconnected,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_mid_fetch_abandons_fetch_and_releases_connection() {
        let catalog = Arc::new(HangingCatalog::new());
        let (tx, mut rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let weak = tx.downgrade();
        let session = StreamSession::new(
            Arc::clone(&catalog) as Arc<dyn CatalogPort>,
            tx,
            PERIOD,
            CancellationToken::new(),
        );
        let handle = tokio::spawn(session.run());

        assert_eq!(rx.recv().await, Some(record_frame(133, "eevee")));

        // Second fetch is now in flight and will never complete.
        catalog.started.notified().await;
        drop(rx);

        let summary = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("session did not exit after disconnect")
            .unwrap();

        assert_eq!(summary.frames_sent, 1);
        assert_eq!(summary.reason, CloseReason::ClientDisconnected);
        assert_eq!(catalog.calls(), 2);
        assert!(weak.upgrade().is_none(), "connection handle still held");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_mid_fetch_writes_nothing_more() {
        let catalog = Arc::new(HangingCatalog::new());
        let (mut rx, shutdown, handle) =
            spawn_session(Arc::clone(&catalog) as Arc<dyn CatalogPort>);

        assert_eq!(rx.recv().await, Some(record_frame(133, "eevee")));
        catalog.started.notified().await;
        shutdown.cancel();

        let summary = handle.await.unwrap();
        assert_eq!(summary.reason, CloseReason::ServerShutdown);
        assert_eq!(summary.frames_sent, 1);
        // Sender dropped with nothing queued after the first frame.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_between_ticks_skips_further_fetches() {
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_fetch_random()
            .times(1)
            .returning(|| Ok(sample_record(7, "squirtle")));

        let (mut rx, shutdown, handle) = spawn_session(Arc::new(catalog));
        assert_eq!(rx.recv().await, Some(record_frame(7, "squirtle")));

        shutdown.cancel();
        let summary = handle.await.unwrap();
        assert_eq!(summary.reason, CloseReason::ServerShutdown);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_wins_over_a_ready_tick() {
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_fetch_random()
            .times(1)
            .returning(|| Ok(sample_record(133, "eevee")));

        let (mut rx, _shutdown, handle) = spawn_session(Arc::new(catalog));
        assert_eq!(rx.recv().await, Some(record_frame(133, "eevee")));

        // Both the tick and the disconnect are ready when the session next runs.
        drop(rx);
        tokio::time::advance(PERIOD + Duration::from_secs(1)).await;

        let summary = handle.await.unwrap();
        assert_eq!(summary.frames_sent, 1);
        assert_eq!(summary.fetch_failures, 0);
        assert_eq!(summary.reason, CloseReason::ClientDisconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_before_open_sends_nothing() {
        let mut catalog = MockCatalogPort::new();
        catalog
            .expect_fetch_random()
            .returning(|| Ok(sample_record(1, "bulbasaur")));

        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        drop(rx);
        let session = StreamSession::new(Arc::new(catalog), tx, PERIOD, CancellationToken::new());

        let summary = session.run().await;
        assert_eq!(summary.frames_sent, 0);
        assert_eq!(summary.reason, CloseReason::ClientDisconnected);
    }

    #[test]
    fn test_active_sessions_track_guards() {
        let sessions = ActiveSessions::new();
        let first = sessions.open();
        let second = sessions.clone().open();
        assert_eq!(sessions.count(), 2);

        drop(first);
        assert_eq!(sessions.count(), 1);
        drop(second);
        assert_eq!(sessions.count(), 0);
    }

    #[test]
    fn test_stream_settings_clamp_degenerate_values() {
        let settings = StreamSettings::default()
            .with_push_interval(Duration::ZERO)
            .with_channel_capacity(0);
        assert_eq!(settings.push_interval(), MIN_PUSH_INTERVAL);
        assert_eq!(settings.channel_capacity(), 1);
        assert_eq!(StreamSettings::default().push_interval(), DEFAULT_PUSH_INTERVAL);
    }
}
