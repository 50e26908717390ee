//! Trigger engine: maps canonical slide text to outbound messages.
//!
//! For each slide the engine produces two message streams: the text itself,
//! forwarded to every configured output target, and the commands of the
//! first matching rule. When no rule matches, the release commands
//! remembered from the last rule that declared some are sent instead. They
//! keep firing on every non-matching slide until another rule with release
//! commands replaces them.

use std::fmt;

use slidelink_domain::command::{Argument, Command};
use slidelink_domain::rule::MatchRule;

/// A message ready to be handed to the output channel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub address: String,
    pub arguments: Vec<Argument>,
}

impl OutboundMessage {
    fn text(address: &str, text: &str) -> Self {
        Self {
            address: address.to_string(),
            arguments: vec![Argument::String(text.to_string())],
        }
    }
}

impl From<&Command> for OutboundMessage {
    fn from(command: &Command) -> Self {
        Self {
            address: command.address().to_string(),
            arguments: command.arguments().to_vec(),
        }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)?;
        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }
        Ok(())
    }
}

/// What the engine decided for one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The rule at this index matched and its commands were planned.
    Matched { rule: usize },
    /// Nothing matched and the remembered release commands were planned.
    Released,
    /// Nothing matched and there is nothing to release.
    Idle,
}

/// Messages planned for one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The canonical text, once per output target.
    pub forward: Vec<OutboundMessage>,
    /// Matched or released commands, in order.
    pub triggers: Vec<OutboundMessage>,
    pub outcome: Outcome,
}

/// Ordered first-match-wins rule evaluation with remembered release commands.
#[derive(Debug, Default)]
pub struct TriggerEngine {
    targets: Vec<String>,
    rules: Vec<MatchRule>,
    next_release: Option<Vec<Command>>,
}

impl TriggerEngine {
    #[must_use]
    pub fn new(targets: Vec<String>, rules: Vec<MatchRule>) -> Self {
        Self {
            targets,
            rules,
            next_release: None,
        }
    }

    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    #[must_use]
    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Release commands that fire on the next non-matching slide.
    #[must_use]
    pub fn next_release(&self) -> Option<&[Command]> {
        self.next_release.as_deref()
    }

    /// Plan the messages for one canonical slide text.
    ///
    /// This is the only place where the remembered release commands change:
    /// a matching rule that declares release commands overwrites them, any
    /// other outcome leaves them untouched.
    pub fn evaluate(&mut self, text: &str) -> Evaluation {
        let forward = self
            .targets
            .iter()
            .map(|target| OutboundMessage::text(target, text))
            .collect();

        let matched = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(text));

        let (triggers, outcome) = match matched {
            Some((index, rule)) => {
                tracing::debug!(rule = index, text = %rule.text, "matched trigger rule");
                let triggers = rule.commands.iter().map(OutboundMessage::from).collect();
                if let Some(release) = &rule.release_commands {
                    self.next_release = Some(release.clone());
                }
                (triggers, Outcome::Matched { rule: index })
            }
            None => match self.next_release.as_deref() {
                Some(release) if !release.is_empty() => (
                    release.iter().map(OutboundMessage::from).collect(),
                    Outcome::Released,
                ),
                _ => (Vec::new(), Outcome::Idle),
            },
        };

        Evaluation {
            forward,
            triggers,
            outcome,
        }
    }
}
