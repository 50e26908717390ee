//! # slidelink-domain
//!
//! Pure domain model for the slidelink presentation-to-lighting relay.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Commands** (an OSC-style address plus typed arguments)
//! - Define **Match rules** (slide text → commands, with optional release commands)
//! - Define **Connection states** and **presentation events** observed from upstream
//! - Canonicalise raw slide text before it is relayed
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod command;
pub mod connection;
pub mod event;
pub mod rule;
pub mod text;
