//! # slidelink-adapter-osc
//!
//! OSC adapter: the output channel towards the lighting/VJ control surface.
//!
//! ## How it works
//!
//! Each outbound message is encoded as a single OSC 1.0 message and sent as
//! one UDP datagram to the configured target. Delivery is fire-and-forget:
//! nothing is acknowledged and nothing is retried.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `slidelink-app` and `slidelink-domain`.

pub mod codec;
mod config;
mod error;

pub use config::OscConfig;
pub use error::{EncodeError, OscError};

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::UdpSocket;

use slidelink_app::ports::OutputChannel;
use slidelink_domain::command::Argument;
use slidelink_domain::error::RelayError;

/// UDP client sending OSC messages to a single target.
pub struct OscClient {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscClient {
    /// Resolve the configured target and bind an ephemeral local socket.
    ///
    /// # Errors
    ///
    /// Returns [`OscError::Resolve`] when the host has no address and
    /// [`OscError::Io`] when resolution or binding fails.
    pub async fn connect(config: &OscConfig) -> Result<Self, OscError> {
        let target = tokio::net::lookup_host((config.host.as_str(), config.port))
            .await?
            .next()
            .ok_or_else(|| OscError::Resolve {
                host: config.host.clone(),
            })?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;

        tracing::info!(%target, "OSC output ready");
        Ok(Self { socket, target })
    }

    #[must_use]
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encode and send one message.
    ///
    /// # Errors
    ///
    /// Returns [`OscError::Encode`] for messages that cannot be represented
    /// and [`OscError::Io`] when the datagram cannot be sent.
    pub async fn send_message(&self, address: &str, arguments: &[Argument]) -> Result<(), OscError> {
        let packet = codec::encode_message(address, arguments)?;
        self.socket.send_to(&packet, self.target).await?;
        Ok(())
    }
}

impl OutputChannel for OscClient {
    async fn send(&self, address: &str, arguments: &[Argument]) -> Result<(), RelayError> {
        self.send_message(address, arguments)
            .await
            .map_err(OscError::into_domain)
    }
}
