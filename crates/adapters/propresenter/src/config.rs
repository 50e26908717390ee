//! ProPresenter stage-display configuration.

use serde::Deserialize;

/// Configuration for the ProPresenter stage-display connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProPresenterConfig {
    /// Hostname or IP address of the ProPresenter machine.
    pub host: String,
    /// Network port enabled in ProPresenter's network preferences.
    pub port: u16,
    /// Stage-display password.
    pub password: String,
    /// Stage-display protocol version sent during authentication.
    pub protocol: u32,
    /// How long a connection attempt may take, including authentication.
    pub connect_timeout_secs: u16,
}

impl ProPresenterConfig {
    /// WebSocket URL of the stage-display endpoint.
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}:{}/stagedisplay", self.host, self.port)
    }
}

impl Default for ProPresenterConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50001,
            password: String::new(),
            protocol: 610,
            connect_timeout_secs: 5,
        }
    }
}
