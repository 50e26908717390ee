//! # slidelink-adapter-propresenter
//!
//! ProPresenter adapter: follows the stage-display feed of a running
//! ProPresenter instance and reports slide changes to slidelink.
//!
//! ## How it works
//!
//! Each call to `connect` spawns one session task that opens a WebSocket to
//! `ws://host:port/stagedisplay`, authenticates with the stage-display
//! password and then streams current-slide updates. Retrying is left to the
//! connection supervisor: a session never reconnects on its own.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `slidelink-app` and `slidelink-domain`.

mod config;
mod error;
pub mod protocol;
mod session;

pub use config::ProPresenterConfig;
pub use error::ProPresenterError;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use slidelink_app::ports::PresentationSource;
use slidelink_domain::error::RelayError;
use slidelink_domain::event::PresentationEvent;

/// Buffered events per session before the session task waits.
const EVENT_BUFFER: usize = 64;

/// Presentation source backed by the ProPresenter stage display.
pub struct ProPresenterSource {
    config: ProPresenterConfig,
    session: Option<JoinHandle<()>>,
}

impl ProPresenterSource {
    #[must_use]
    pub fn new(config: ProPresenterConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    fn abort_session(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.abort();
            tracing::debug!("stage display session aborted");
        }
    }
}

impl PresentationSource for ProPresenterSource {
    fn name(&self) -> &'static str {
        "propresenter"
    }

    fn connect(&mut self) -> Result<mpsc::Receiver<PresentationEvent>, RelayError> {
        self.abort_session();
        let runtime = Handle::try_current().map_err(ProPresenterError::from)?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        self.session = Some(runtime.spawn(session::run(self.config.clone(), tx)));

        tracing::debug!(url = %self.config.url(), "stage display session started");
        Ok(rx)
    }

    fn disconnect(&mut self) {
        self.abort_session();
    }
}

impl Drop for ProPresenterSource {
    fn drop(&mut self) {
        self.abort_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt as _, StreamExt as _};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::Message;

    async fn listener() -> (TcpListener, ProPresenterConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ProPresenterConfig {
            host: "127.0.0.1".to_string(),
            port: listener.local_addr().unwrap().port(),
            password: "secret".to_string(),
            ..ProPresenterConfig::default()
        };
        (listener, config)
    }

    async fn next(rx: &mut mpsc::Receiver<PresentationEvent>) -> Option<PresentationEvent> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event should arrive")
    }

    #[test]
    fn should_fail_to_connect_outside_of_a_runtime() {
        let mut source = ProPresenterSource::new(ProPresenterConfig::default());
        let result = source.connect();
        assert!(matches!(result, Err(RelayError::Transport(_))));
    }

    #[tokio::test]
    async fn should_authenticate_and_report_slides() {
        let (listener, config) = listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let auth = ws.next().await.unwrap().unwrap();
            let auth: serde_json::Value = serde_json::from_str(auth.to_text().unwrap()).unwrap();
            assert_eq!(auth["acn"], "ath");
            assert_eq!(auth["pwd"], "secret");
            assert_eq!(auth["ptl"], 610);

            ws.send(Message::text(r#"{"acn":"ath","ath":true,"err":""}"#))
                .await
                .unwrap();
            ws.send(Message::text(
                r#"{"acn":"fv","ary":[{"acn":"cs","txt":"VERSE 1"},{"acn":"ns","txt":"VERSE 2"}]}"#,
            ))
            .await
            .unwrap();
            ws.send(Message::text("garbage")).await.unwrap();
            ws.send(Message::text(r#"{"acn":"cs"}"#)).await.unwrap();
            ws.close(None).await.unwrap();
        });

        let mut source = ProPresenterSource::new(config);
        let mut rx = source.connect().unwrap();

        assert_eq!(next(&mut rx).await, Some(PresentationEvent::Connected));
        assert_eq!(
            next(&mut rx).await,
            Some(PresentationEvent::CurrentSlideChanged {
                text: Some("VERSE 1".to_string())
            })
        );
        assert_eq!(
            next(&mut rx).await,
            Some(PresentationEvent::CurrentSlideChanged { text: None })
        );
        assert!(matches!(
            next(&mut rx).await,
            Some(PresentationEvent::Disconnected { .. })
        ));
        assert_eq!(next(&mut rx).await, None);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn should_skip_undecodable_frames_before_authentication() {
        let (listener, config) = listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _auth = ws.next().await.unwrap().unwrap();
            ws.send(Message::text("not json")).await.unwrap();
            ws.send(Message::text(r#"{"acn":"ath","ath":true,"err":""}"#))
                .await
                .unwrap();
            ws.send(Message::text(r#"{"acn":"cs","txt":"CHORUS"}"#))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        });

        let mut source = ProPresenterSource::new(config);
        let mut rx = source.connect().unwrap();

        assert_eq!(next(&mut rx).await, Some(PresentationEvent::Connected));
        assert_eq!(
            next(&mut rx).await,
            Some(PresentationEvent::CurrentSlideChanged {
                text: Some("CHORUS".to_string())
            })
        );

        server.await.unwrap();
    }

    #[tokio::test]
    async fn should_report_rejected_password_as_connection_failure() {
        let (listener, config) = listener().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _auth = ws.next().await.unwrap().unwrap();
            ws.send(Message::text(
                r#"{"acn":"ath","ath":false,"err":"Invalid Password"}"#,
            ))
            .await
            .unwrap();
        });

        let mut source = ProPresenterSource::new(config);
        let mut rx = source.connect().unwrap();

        match next(&mut rx).await {
            Some(PresentationEvent::ConnectionFailed { reason }) => {
                assert!(reason.contains("Invalid Password"), "{reason}");
            }
            other => panic!("expected connection failure, got {other:?}"),
        }
        assert_eq!(next(&mut rx).await, None);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn should_report_refused_connection_as_failure() {
        let (listener, config) = listener().await;
        drop(listener);

        let mut source = ProPresenterSource::new(config);
        let mut rx = source.connect().unwrap();

        assert!(matches!(
            next(&mut rx).await,
            Some(PresentationEvent::ConnectionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn should_stop_session_on_disconnect() {
        let (listener, config) = listener().await;

        let mut source = ProPresenterSource::new(config);
        let mut rx = source.connect().unwrap();
        let (_stream, _) = listener.accept().await.unwrap();

        source.disconnect();
        assert!(source.session.is_none());
        assert_eq!(next(&mut rx).await, None);
    }

    #[tokio::test]
    async fn should_replace_previous_session_on_reconnect() {
        let (_listener, config) = listener().await;

        let mut source = ProPresenterSource::new(config);
        let mut first = source.connect().unwrap();
        let _second = source.connect().unwrap();

        assert_eq!(next(&mut first).await, None);
    }
}
