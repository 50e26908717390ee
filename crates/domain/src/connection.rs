//! Connection state of the upstream presentation link.

use std::fmt;

/// Lifecycle of the single logical upstream connection.
///
/// `Disconnected → Connecting → Connected`; any failure moves to
/// `FailedPendingRetry`, which goes back to `Connecting` once the reconnect
/// cooldown has elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    FailedPendingRetry,
}

impl ConnectionState {
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::FailedPendingRetry => "failed_pending_retry",
        };
        f.write_str(s)
    }
}
