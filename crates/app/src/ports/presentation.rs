//! Presentation source port: the upstream that reports slide changes.

use tokio::sync::mpsc;

use slidelink_domain::error::RelayError;
use slidelink_domain::event::PresentationEvent;

/// An upstream presentation system emitting lifecycle and slide events.
///
/// The [`ConnectionSupervisor`](crate::supervisor::ConnectionSupervisor)
/// drives the lifecycle:
///
/// 1. [`connect`](Self::connect): start a session, returning its event stream
/// 2. events flow until the session ends with `ConnectionFailed` or `Disconnected`
/// 3. [`connect`](Self::connect) again after the reconnect cooldown
/// 4. [`disconnect`](Self::disconnect) on shutdown
pub trait PresentationSource {
    /// Unique name identifying this source (e.g. `"propresenter"`).
    fn name(&self) -> &'static str;

    /// Start a new session and return the receiving end of its events.
    ///
    /// Any previous session must be torn down first. Must not block: the
    /// outcome of the attempt is reported through the returned stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the attempt cannot even be started.
    fn connect(&mut self) -> Result<mpsc::Receiver<PresentationEvent>, RelayError>;

    /// Tear down the current session, if any.
    fn disconnect(&mut self);
}
