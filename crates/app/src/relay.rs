//! Relay: wires presentation events to the output channel.
//!
//! A single task serialises everything: lifecycle events go to the
//! [`ConnectionSupervisor`], slide changes are normalised and evaluated by
//! the [`TriggerEngine`], and a periodic tick drives reconnection. Sends are
//! fire-and-forget: a failed send is logged and the remaining messages are
//! still attempted.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use slidelink_domain::event::PresentationEvent;
use slidelink_domain::text;
use slidelink_domain::time;

use crate::ports::{OutputChannel, PresentationSource};
use crate::supervisor::ConnectionSupervisor;
use crate::trigger_engine::{OutboundMessage, Outcome, TriggerEngine};

/// Cadence of the reconnect check.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest accepted tick interval. A zero period is raised to this.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Result of relaying one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcome: Outcome,
    pub forwarded: usize,
    pub forward_failures: usize,
    pub triggered: usize,
    pub trigger_failures: usize,
}

/// Presentation-to-output relay.
pub struct Relay<S, O> {
    supervisor: ConnectionSupervisor<S>,
    engine: TriggerEngine,
    output: O,
    split_delimiter: Option<String>,
}

impl<S, O> Relay<S, O>
where
    S: PresentationSource,
    O: OutputChannel,
{
    #[must_use]
    pub fn new(
        supervisor: ConnectionSupervisor<S>,
        engine: TriggerEngine,
        output: O,
        split_delimiter: Option<String>,
    ) -> Self {
        Self {
            supervisor,
            engine,
            output,
            split_delimiter,
        }
    }

    #[must_use]
    pub fn supervisor(&self) -> &ConnectionSupervisor<S> {
        &self.supervisor
    }

    #[must_use]
    pub fn engine(&self) -> &TriggerEngine {
        &self.engine
    }

    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Normalise the raw slide text, evaluate it and send the result.
    pub async fn relay_slide(&mut self, raw: Option<&str>) -> DispatchReport {
        let canonical = text::normalize(raw, self.split_delimiter.as_deref());
        tracing::debug!(text = %canonical.escape_debug(), "relaying slide text");

        let evaluation = self.engine.evaluate(&canonical);
        let (forwarded, forward_failures) = self.send_all(&evaluation.forward, "text").await;
        let (triggered, trigger_failures) = self.send_all(&evaluation.triggers, "trigger").await;

        if evaluation.outcome != Outcome::Idle {
            tracing::info!(
                outcome = ?evaluation.outcome,
                commands = triggered,
                failures = trigger_failures,
                "trigger commands sent"
            );
        }

        DispatchReport {
            outcome: evaluation.outcome,
            forwarded,
            forward_failures,
            triggered,
            trigger_failures,
        }
    }

    /// Route one presentation event.
    ///
    /// Slide changes are only relayed while the session is connected.
    pub async fn handle_event(
        &mut self,
        event: PresentationEvent,
        now: Instant,
    ) -> Option<DispatchReport> {
        match event {
            PresentationEvent::CurrentSlideChanged { text } => {
                if self.supervisor.state().is_connected() {
                    Some(self.relay_slide(text.as_deref()).await)
                } else {
                    tracing::debug!(state = %self.supervisor.state(), "dropping slide outside of a session");
                    None
                }
            }
            lifecycle => {
                self.supervisor.observe(&lifecycle, now);
                None
            }
        }
    }

    /// Connect, then relay events until `shutdown` completes.
    ///
    /// `tick_interval` is raised to [`MIN_TICK_INTERVAL`] when shorter.
    /// Returns the relay after the upstream session has been torn down.
    pub async fn run<F>(mut self, tick_interval: Duration, shutdown: F) -> Self
    where
        F: Future<Output = ()>,
    {
        if tick_interval < MIN_TICK_INTERVAL {
            tracing::warn!(?tick_interval, "tick interval too short, using the minimum");
        }
        let mut ticker = tokio::time::interval(tick_interval.max(MIN_TICK_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        self.supervisor.connect(time::now());

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.supervisor.tick(time::now());
                }
                event = self.supervisor.next_event() => {
                    tracing::trace!(event = event.name(), "presentation event");
                    self.handle_event(event, time::now()).await;
                }
            }
        }

        self.supervisor.shutdown();
        self
    }

    /// Send every message, isolating failures. Returns `(sent, failed)`.
    async fn send_all(&self, messages: &[OutboundMessage], stream: &'static str) -> (usize, usize) {
        let mut sent = 0;
        let mut failed = 0;
        for message in messages {
            match self.output.send(&message.address, &message.arguments).await {
                Ok(()) => {
                    sent += 1;
                    tracing::debug!(stream, %message, "message sent");
                }
                Err(err) => {
                    failed += 1;
                    tracing::warn!(stream, %message, %err, "failed to send message");
                }
            }
        }
        (sent, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidelink_domain::command::{Argument, Command};
    use slidelink_domain::connection::ConnectionState;
    use slidelink_domain::error::RelayError;
    use slidelink_domain::rule::MatchRule;
    use std::sync::Mutex;
    use tokio::sync::{mpsc, oneshot};

    // ── Scripted source ────────────────────────────────────────────

    /// Replays a fixed script on the first session, then keeps it open.
    struct ScriptedSource {
        script: Vec<PresentationEvent>,
        senders: Vec<mpsc::Sender<PresentationEvent>>,
        disconnects: usize,
    }

    impl ScriptedSource {
        fn new(script: Vec<PresentationEvent>) -> Self {
            Self {
                script,
                senders: Vec::new(),
                disconnects: 0,
            }
        }
    }

    impl PresentationSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn connect(&mut self) -> Result<mpsc::Receiver<PresentationEvent>, RelayError> {
            let (tx, rx) = mpsc::channel(self.script.len().max(1));
            for event in self.script.drain(..) {
                tx.try_send(event).unwrap();
            }
            self.senders.push(tx);
            Ok(rx)
        }

        fn disconnect(&mut self) {
            self.disconnects += 1;
            self.senders.clear();
        }
    }

    // ── Spy outputs ────────────────────────────────────────────────

    #[derive(Default)]
    struct SpyOutput {
        sent: Mutex<Vec<(String, Vec<Argument>)>>,
        failing: Vec<String>,
    }

    impl SpyOutput {
        fn failing(addresses: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failing: addresses.iter().map(ToString::to_string).collect(),
            }
        }

        fn sent(&self) -> Vec<(String, Vec<Argument>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl OutputChannel for SpyOutput {
        fn send(
            &self,
            address: &str,
            arguments: &[Argument],
        ) -> impl Future<Output = Result<(), RelayError>> + Send {
            let result = if self.failing.iter().any(|a| a == address) {
                let io = std::io::Error::other("unreachable");
                Err(RelayError::Transport(Box::new(io)))
            } else {
                self.sent
                    .lock()
                    .unwrap()
                    .push((address.to_string(), arguments.to_vec()));
                Ok(())
            };
            async { result }
        }
    }

    /// Forwards every sent message to a channel.
    struct ChannelOutput(mpsc::UnboundedSender<(String, Vec<Argument>)>);

    impl OutputChannel for ChannelOutput {
        fn send(
            &self,
            address: &str,
            arguments: &[Argument],
        ) -> impl Future<Output = Result<(), RelayError>> + Send {
            let _ = self.0.send((address.to_string(), arguments.to_vec()));
            async { Ok(()) }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn command(address: &str, arguments: Vec<Argument>) -> Command {
        Command::new(address, arguments).unwrap()
    }

    fn verse_engine(targets: &[&str]) -> TriggerEngine {
        let rule = MatchRule::new("VERSE", vec![command("/verse", vec![Argument::Bool(true)])])
            .with_release(vec![command("/verse", vec![Argument::Bool(false)])]);
        TriggerEngine::new(targets.iter().map(ToString::to_string).collect(), vec![rule])
    }

    fn sent(address: &str, argument: Argument) -> (String, Vec<Argument>) {
        (address.to_string(), vec![argument])
    }

    fn make_relay(
        output: SpyOutput,
        split: Option<&str>,
    ) -> Relay<ScriptedSource, SpyOutput> {
        Relay::new(
            ConnectionSupervisor::new(ScriptedSource::new(vec![])),
            verse_engine(&["/text"]),
            output,
            split.map(ToString::to_string),
        )
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_forward_text_then_send_triggers() {
        let mut relay = make_relay(SpyOutput::default(), None);

        let report = relay.relay_slide(Some("  VERSE 1 text ")).await;

        assert_eq!(report.outcome, Outcome::Matched { rule: 0 });
        assert_eq!(report.forwarded, 1);
        assert_eq!(report.triggered, 1);
        assert_eq!(
            relay.output().sent(),
            vec![
                sent("/text", Argument::String("VERSE 1 text".to_string())),
                sent("/verse", Argument::Bool(true)),
            ]
        );
    }

    #[tokio::test]
    async fn should_apply_split_delimiter_before_matching() {
        let mut relay = make_relay(SpyOutput::default(), Some("|"));

        let report = relay.relay_slide(Some("Intro|VERSE")).await;

        assert_eq!(report.outcome, Outcome::Idle);
        assert_eq!(
            relay.output().sent(),
            vec![sent("/text", Argument::String("Intro".to_string()))]
        );
    }

    #[tokio::test]
    async fn should_send_newline_for_slide_without_text() {
        let mut relay = make_relay(SpyOutput::default(), None);

        relay.relay_slide(None).await;

        assert_eq!(
            relay.output().sent(),
            vec![sent("/text", Argument::String("\n".to_string()))]
        );
    }

    #[tokio::test]
    async fn should_continue_after_failed_forward() {
        let output = SpyOutput::failing(&["/text/1"]);
        let mut relay = Relay::new(
            ConnectionSupervisor::new(ScriptedSource::new(vec![])),
            verse_engine(&["/text/1", "/text/2"]),
            output,
            None,
        );

        let report = relay.relay_slide(Some("VERSE")).await;

        assert_eq!(report.forwarded, 1);
        assert_eq!(report.forward_failures, 1);
        assert_eq!(report.triggered, 1);
        assert_eq!(
            relay.output().sent(),
            vec![
                sent("/text/2", Argument::String("VERSE".to_string())),
                sent("/verse", Argument::Bool(true)),
            ]
        );
    }

    #[tokio::test]
    async fn should_continue_after_failed_trigger_command() {
        let rule = MatchRule::new(
            "GO",
            vec![
                command("/first", vec![]),
                command("/second", vec![]),
                command("/third", vec![]),
            ],
        );
        let mut relay = Relay::new(
            ConnectionSupervisor::new(ScriptedSource::new(vec![])),
            TriggerEngine::new(vec![], vec![rule]),
            SpyOutput::failing(&["/second"]),
            None,
        );

        let report = relay.relay_slide(Some("GO")).await;

        assert_eq!(report.triggered, 2);
        assert_eq!(report.trigger_failures, 1);
        assert_eq!(
            relay.output().sent(),
            vec![
                sent("/first", Argument::Bool(true)),
                sent("/third", Argument::Bool(true)),
            ]
        );
    }

    #[tokio::test]
    async fn should_isolate_failed_release_commands() {
        let rule = MatchRule::new("VERSE", vec![command("/verse", vec![])]).with_release(vec![
            command("/off/1", vec![]),
            command("/off/2", vec![]),
        ]);
        let mut relay = Relay::new(
            ConnectionSupervisor::new(ScriptedSource::new(vec![])),
            TriggerEngine::new(vec![], vec![rule]),
            SpyOutput::failing(&["/off/1"]),
            None,
        );
        relay.relay_slide(Some("VERSE")).await;

        let report = relay.relay_slide(Some("CHORUS")).await;

        assert_eq!(report.outcome, Outcome::Released);
        assert_eq!(report.triggered, 1);
        assert_eq!(report.trigger_failures, 1);
    }

    #[tokio::test]
    async fn should_drop_slides_outside_of_a_session() {
        let mut relay = make_relay(SpyOutput::default(), None);

        let report = relay
            .handle_event(
                PresentationEvent::CurrentSlideChanged {
                    text: Some("VERSE".to_string()),
                },
                time::now(),
            )
            .await;

        assert!(report.is_none());
        assert!(relay.output().sent().is_empty());
    }

    #[tokio::test]
    async fn should_route_lifecycle_events_to_supervisor() {
        let mut relay = make_relay(SpyOutput::default(), None);
        relay.supervisor.connect(time::now());

        relay
            .handle_event(PresentationEvent::Connected, time::now())
            .await;
        assert_eq!(relay.supervisor().state(), ConnectionState::Connected);

        let report = relay
            .handle_event(
                PresentationEvent::CurrentSlideChanged {
                    text: Some("VERSE".to_string()),
                },
                time::now(),
            )
            .await;
        assert!(report.is_some());
    }

    #[tokio::test]
    async fn should_run_until_shutdown() {
        let source = ScriptedSource::new(vec![
            PresentationEvent::Connected,
            PresentationEvent::CurrentSlideChanged {
                text: Some("VERSE 1".to_string()),
            },
            PresentationEvent::CurrentSlideChanged {
                text: Some("CHORUS".to_string()),
            },
        ]);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let relay = Relay::new(
            ConnectionSupervisor::new(source),
            verse_engine(&["/text"]),
            ChannelOutput(out_tx),
            None,
        );

        let driver = async move {
            let mut received = Vec::new();
            while received.len() < 4 {
                received.push(out_rx.recv().await.unwrap());
            }
            let _ = stop_tx.send(());
            received
        };
        let shutdown = async move {
            let _ = stop_rx.await;
        };

        let (relay, received) =
            tokio::join!(relay.run(Duration::from_secs(60), shutdown), driver);

        assert_eq!(
            received,
            vec![
                sent("/text", Argument::String("VERSE 1".to_string())),
                sent("/verse", Argument::Bool(true)),
                sent("/text", Argument::String("CHORUS".to_string())),
                sent("/verse", Argument::Bool(false)),
            ]
        );
        assert!(relay.supervisor().is_shut_down());
        assert_eq!(relay.supervisor().source().disconnects, 1);
        assert_eq!(relay.supervisor().state(), ConnectionState::Connected);
        assert_eq!(
            relay.engine().next_release(),
            Some([command("/verse", vec![Argument::Bool(false)])].as_slice())
        );
    }

    #[tokio::test]
    async fn should_run_with_zero_tick_interval() {
        let source = ScriptedSource::new(vec![
            PresentationEvent::Connected,
            PresentationEvent::CurrentSlideChanged {
                text: Some("VERSE".to_string()),
            },
        ]);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let relay = Relay::new(
            ConnectionSupervisor::new(source),
            verse_engine(&["/text"]),
            ChannelOutput(out_tx),
            None,
        );

        let driver = async move {
            let first = out_rx.recv().await.unwrap();
            let _ = stop_tx.send(());
            first
        };
        let shutdown = async move {
            let _ = stop_rx.await;
        };

        let (relay, first) = tokio::join!(relay.run(Duration::ZERO, shutdown), driver);

        assert_eq!(first, sent("/text", Argument::String("VERSE".to_string())));
        assert!(relay.supervisor().is_shut_down());
    }
}
