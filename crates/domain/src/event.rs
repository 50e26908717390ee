//! Presentation events: what the upstream presentation source reports.

/// A named event emitted by the presentation source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    /// The session is established and authenticated.
    Connected,
    /// The connection attempt did not succeed.
    ConnectionFailed { reason: String },
    /// An established session was lost.
    Disconnected { reason: String },
    /// The current slide changed. `text` is `None` when the slide has no text.
    CurrentSlideChanged { text: Option<String> },
}

impl PresentationEvent {
    /// Short event name, as used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::ConnectionFailed { .. } => "connection_failed",
            Self::Disconnected { .. } => "disconnected",
            Self::CurrentSlideChanged { .. } => "current_slide_changed",
        }
    }
}
