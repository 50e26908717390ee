//! Match rule: slide text that fires a sequence of commands.
//!
//! Rules are evaluated in declaration order and the first rule whose text
//! is contained in the slide wins. A rule may also declare release commands
//! which are remembered and fired while later slides match nothing.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::ValidationError;

/// A text trigger and the commands it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Case-sensitive text looked up as a substring of the slide.
    #[serde(alias = "Text")]
    pub text: String,
    /// Commands sent, in order, when the rule matches.
    #[serde(default, alias = "Commands")]
    pub commands: Vec<Command>,
    /// Commands remembered on match and sent on later non-matching slides.
    #[serde(
        default,
        alias = "CommandReleased",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_commands: Option<Vec<Command>>,
}

impl MatchRule {
    #[must_use]
    pub fn new(text: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            text: text.into(),
            commands,
            release_commands: None,
        }
    }

    #[must_use]
    pub fn with_release(mut self, release_commands: Vec<Command>) -> Self {
        self.release_commands = Some(release_commands);
        self
    }

    /// Whether this rule fires for the given canonical slide text.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        text.contains(self.text.as_str())
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMatchText`] when `text` is empty, since
    /// an empty needle would match every slide.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.is_empty() {
            return Err(ValidationError::EmptyMatchText);
        }
        Ok(())
    }
}
