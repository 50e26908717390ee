//! Command: an addressed control message sent to the lighting surface.
//!
//! A command is declared as a flat sequence: the address first, then zero or
//! more argument values, e.g. `["/composition/layers/1/clear", true]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Arguments sent when a command declares none: a single "on" pulse.
const PULSE: &[Argument] = &[Argument::Bool(true)];

/// A single typed argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
        }
    }
}

/// An address followed by its declared arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Argument>", into = "Vec<Argument>")]
pub struct Command {
    address: String,
    arguments: Vec<Argument>,
}

impl Command {
    /// Build a command, checking that the address looks like an OSC address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] when `address` does not
    /// start with `/`.
    pub fn new(
        address: impl Into<String>,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> Result<Self, ValidationError> {
        let address = address.into();
        if !address.starts_with('/') {
            return Err(ValidationError::InvalidAddress(address));
        }
        Ok(Self {
            address,
            arguments: arguments.into_iter().collect(),
        })
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Arguments to transmit.
    ///
    /// A command declared with only an address expands to a single `true`.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        if self.arguments.is_empty() {
            PULSE
        } else {
            &self.arguments
        }
    }
}

impl TryFrom<Vec<Argument>> for Command {
    type Error = ValidationError;

    fn try_from(values: Vec<Argument>) -> Result<Self, Self::Error> {
        let mut values = values.into_iter();
        match values.next() {
            None => Err(ValidationError::EmptyCommand),
            Some(Argument::String(address)) => Self::new(address, values),
            Some(_) => Err(ValidationError::AddressNotString),
        }
    }
}

impl From<Command> for Vec<Argument> {
    fn from(command: Command) -> Self {
        let mut values = Vec::with_capacity(command.arguments.len() + 1);
        values.push(Argument::String(command.address));
        values.extend(command.arguments);
        values
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)?;
        for argument in self.arguments() {
            write!(f, " {argument}")?;
        }
        Ok(())
    }
}
