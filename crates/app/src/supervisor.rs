//! Connection supervisor: keeps one upstream session alive.
//!
//! The supervisor is an explicit state machine over [`ConnectionState`].
//! Lifecycle events reported by the [`PresentationSource`] drive the
//! transitions; a periodic [`tick`](ConnectionSupervisor::tick) starts a new
//! attempt once the reconnect cooldown has elapsed since the connection was
//! lost. There is no backoff and no retry cap.
//!
//! Time is passed in explicitly so every transition can be tested without
//! waiting on a clock. Instants come from the monotonic clock, so a wall-clock
//! step during an outage cannot delay the next attempt.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use slidelink_domain::connection::ConnectionState;
use slidelink_domain::event::PresentationEvent;
use slidelink_domain::error;
use slidelink_domain::time;

use crate::ports::PresentationSource;

/// Delay between losing the upstream and the next connection attempt.
pub const DEFAULT_RECONNECT_COOLDOWN: Duration = Duration::from_secs(5);

/// Owns the upstream session and its retry state.
pub struct ConnectionSupervisor<S> {
    source: S,
    state: ConnectionState,
    disconnected_since: Option<Instant>,
    cooldown: Duration,
    events: Option<mpsc::Receiver<PresentationEvent>>,
    shut_down: bool,
}

impl<S: PresentationSource> ConnectionSupervisor<S> {
    /// Create a supervisor using [`DEFAULT_RECONNECT_COOLDOWN`].
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_cooldown(source, DEFAULT_RECONNECT_COOLDOWN)
    }

    #[must_use]
    pub fn with_cooldown(source: S, cooldown: Duration) -> Self {
        Self {
            source,
            state: ConnectionState::Disconnected,
            disconnected_since: None,
            cooldown,
            events: None,
            shut_down: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// When the current disconnect episode started, if there is one.
    #[must_use]
    pub fn disconnected_since(&self) -> Option<Instant> {
        self.disconnected_since
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Start a connection attempt.
    ///
    /// Replaces the event stream of any previous session, so events still
    /// queued from it are discarded. An attempt that fails synchronously goes
    /// through [`on_connection_failed`](Self::on_connection_failed).
    pub fn connect(&mut self, now: Instant) {
        if self.shut_down {
            return;
        }
        self.state = ConnectionState::Connecting;
        self.disconnected_since = None;
        self.events = None;

        tracing::info!(source = self.source.name(), "connecting to presentation source");
        match self.source.connect() {
            Ok(events) => self.events = Some(events),
            Err(err) => self.on_connection_failed(&error::describe(&err), now),
        }
    }

    /// The session is established.
    pub fn on_connected(&mut self) {
        if self.shut_down {
            return;
        }
        self.state = ConnectionState::Connected;
        tracing::info!(source = self.source.name(), "presentation source connected");
    }

    /// The connection attempt failed.
    pub fn on_connection_failed(&mut self, reason: &str, now: Instant) {
        tracing::warn!(source = self.source.name(), %reason, "presentation source connection failed");
        self.mark_failed(now);
    }

    /// The established session was lost.
    pub fn on_disconnected(&mut self, reason: &str, now: Instant) {
        tracing::warn!(source = self.source.name(), %reason, "presentation source disconnected");
        self.mark_failed(now);
    }

    /// Apply a lifecycle event. Slide changes are ignored here.
    pub fn observe(&mut self, event: &PresentationEvent, now: Instant) {
        match event {
            PresentationEvent::Connected => self.on_connected(),
            PresentationEvent::ConnectionFailed { reason } => {
                self.on_connection_failed(reason, now);
            }
            PresentationEvent::Disconnected { reason } => self.on_disconnected(reason, now),
            PresentationEvent::CurrentSlideChanged { .. } => {}
        }
    }

    /// Periodic liveness check. Returns `true` when a reconnect was started.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.shut_down || self.state != ConnectionState::FailedPendingRetry {
            return false;
        }
        let Some(since) = self.disconnected_since else {
            return false;
        };
        let elapsed = time::elapsed(since, now);
        if elapsed < self.cooldown {
            return false;
        }

        tracing::info!(
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "attempting to reconnect to presentation source"
        );
        self.connect(now);
        true
    }

    /// Wait for the next event of the current session.
    ///
    /// Pends forever while there is no session. A stream that ends without a
    /// failure event is reported as a disconnect.
    pub async fn next_event(&mut self) -> PresentationEvent {
        loop {
            let Some(events) = self.events.as_mut() else {
                return std::future::pending().await;
            };
            if let Some(event) = events.recv().await {
                return event;
            }
            self.events = None;
            if self.state != ConnectionState::FailedPendingRetry {
                return PresentationEvent::Disconnected {
                    reason: "event stream closed".to_string(),
                };
            }
        }
    }

    /// Tear down the session for good. Retry state is left as it was but no
    /// further reconnect will be attempted.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.events = None;
        self.source.disconnect();
        tracing::info!(source = self.source.name(), state = %self.state, "presentation source shut down");
    }

    fn mark_failed(&mut self, now: Instant) {
        if self.shut_down {
            return;
        }
        self.state = ConnectionState::FailedPendingRetry;
        if self.disconnected_since.is_none() {
            self.disconnected_since = Some(now);
        }
    }
}
