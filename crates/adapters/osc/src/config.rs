//! OSC output configuration.

use serde::Deserialize;

/// Where OSC messages are sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Hostname or IP address of the control surface.
    pub host: String,
    /// UDP port the control surface listens on.
    pub port: u16,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
        }
    }
}
