//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RelayError`] via `#[from]` or an explicit `into_domain()`.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// An adapter failed to talk to the outside world.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A command was declared without any element.
    #[error("command must contain at least an address")]
    EmptyCommand,

    /// The first element of a command is not a string.
    #[error("command address must be a string")]
    AddressNotString,

    /// The command address does not look like an OSC address.
    #[error("command address {0:?} must start with '/'")]
    InvalidAddress(String),

    /// A match rule has no text to look for.
    #[error("match rule text must not be empty")]
    EmptyMatchText,
}

/// Render an error followed by each of its sources, `": "`-separated.
#[must_use]
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
