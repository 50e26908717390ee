//! ProPresenter adapter error types.

use slidelink_domain::error::{self, RelayError};

/// Errors specific to the ProPresenter adapter.
#[derive(Debug, thiserror::Error)]
pub enum ProPresenterError {
    /// Sessions run as tasks and need a tokio runtime.
    #[error("no tokio runtime available")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The WebSocket transport failed.
    #[error("stage display WebSocket error")]
    WebSocket(#[source] Box<tokio_tungstenite::tungstenite::Error>),

    /// The connection attempt took longer than the configured timeout.
    #[error("connection attempt timed out after {secs}s")]
    Timeout { secs: u16 },

    /// ProPresenter rejected the stage-display password.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    /// The peer closed the connection before authenticating.
    #[error("connection closed before authentication")]
    ClosedBeforeAuth,

    /// A frame could not be encoded or decoded.
    #[error("invalid stage display frame")]
    Frame(#[from] serde_json::Error),
}

impl ProPresenterError {
    /// One-line description including every source, used as the reason of
    /// lifecycle events.
    #[must_use]
    pub fn reason(&self) -> String {
        error::describe(self)
    }

    /// Convert into a [`RelayError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> RelayError {
        RelayError::Transport(Box::new(self))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ProPresenterError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

impl From<ProPresenterError> for RelayError {
    fn from(err: ProPresenterError) -> Self {
        err.into_domain()
    }
}
