//! OSC adapter error types.

use slidelink_domain::error::RelayError;

/// Errors specific to the OSC adapter.
#[derive(Debug, thiserror::Error)]
pub enum OscError {
    /// The target host did not resolve to any address.
    #[error("could not resolve OSC target {host}")]
    Resolve { host: String },

    /// The message could not be encoded.
    #[error("failed to encode OSC message")]
    Encode(#[from] EncodeError),

    /// The UDP socket failed.
    #[error("OSC socket error")]
    Io(#[from] std::io::Error),
}

/// Details about why a message could not be encoded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodeError {
    /// OSC addresses start with `/`.
    #[error("OSC address {0:?} must start with '/'")]
    InvalidAddress(String),

    /// OSC strings are NUL-terminated and cannot contain NUL.
    #[error("OSC string must not contain NUL")]
    NulInString,
}

impl OscError {
    /// Convert into a [`RelayError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> RelayError {
        RelayError::Transport(Box::new(self))
    }
}

impl From<OscError> for RelayError {
    fn from(err: OscError) -> Self {
        err.into_domain()
    }
}
