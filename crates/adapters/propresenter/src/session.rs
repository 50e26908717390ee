//! One stage-display session: connect, authenticate, follow slides.
//!
//! A session reports `Connected` once authenticated, `CurrentSlideChanged`
//! for every current-slide item, and ends with exactly one
//! `ConnectionFailed` or `Disconnected`.

use std::time::Duration;

use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use slidelink_domain::event::PresentationEvent;

use crate::config::ProPresenterConfig;
use crate::error::ProPresenterError;
use crate::protocol::{self, Inbound};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Run a session until it fails, is closed, or nobody listens anymore.
pub(crate) async fn run(config: ProPresenterConfig, events: mpsc::Sender<PresentationEvent>) {
    let ending = match open(&config).await {
        Err(err) => PresentationEvent::ConnectionFailed {
            reason: err.reason(),
        },
        Ok(ws) => {
            if events.send(PresentationEvent::Connected).await.is_err() {
                return;
            }
            PresentationEvent::Disconnected {
                reason: follow(ws, &events).await,
            }
        }
    };
    let _ = events.send(ending).await;
}

/// Connect and authenticate within the configured timeout.
async fn open(config: &ProPresenterConfig) -> Result<WsStream, ProPresenterError> {
    let secs = config.connect_timeout_secs;
    tokio::time::timeout(Duration::from_secs(u64::from(secs)), handshake(config))
        .await
        .map_err(|_| ProPresenterError::Timeout { secs })?
}

async fn handshake(config: &ProPresenterConfig) -> Result<WsStream, ProPresenterError> {
    let url = config.url();
    tracing::debug!(%url, "opening stage display connection");
    let (mut ws, _) = connect_async(url.as_str()).await?;

    let auth = protocol::auth_request(&config.password, config.protocol)?;
    ws.send(Message::text(auth)).await?;

    while let Some(message) = ws.next().await {
        let Message::Text(text) = message? else {
            continue;
        };
        let Some(items) = decode(text.as_str()) else {
            continue;
        };
        for item in items {
            if let Inbound::Auth(result) = item {
                return result.map(|()| ws).map_err(ProPresenterError::AuthRejected);
            }
        }
    }
    Err(ProPresenterError::ClosedBeforeAuth)
}

/// Forward slide changes until the stream ends. Returns why it ended.
async fn follow(mut ws: WsStream, events: &mpsc::Sender<PresentationEvent>) -> String {
    while let Some(message) = ws.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let Some(items) = decode(text.as_str()) else {
                    continue;
                };
                for item in items {
                    if let Inbound::CurrentSlide(text) = item {
                        let event = PresentationEvent::CurrentSlideChanged { text };
                        if events.send(event).await.is_err() {
                            return "event receiver dropped".to_string();
                        }
                    }
                }
            }
            Ok(Message::Close(frame)) => {
                return match frame {
                    Some(frame) if !frame.reason.is_empty() => {
                        format!("closed by peer: {}", frame.reason.as_str())
                    }
                    _ => "closed by peer".to_string(),
                };
            }
            Ok(_) => {}
            Err(err) => return ProPresenterError::from(err).reason(),
        }
    }
    "connection ended".to_string()
}

/// Parse one text frame, logging and skipping it when it is undecodable.
fn decode(raw: &str) -> Option<Vec<Inbound>> {
    protocol::parse_frame(raw)
        .inspect_err(|err| tracing::warn!(%err, "skipping undecodable stage display frame"))
        .ok()
}
