//! # slidelink-app
//!
//! Application layer: the relay's state machines and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `PresentationSource`: opens the upstream event subscription
//!   - `OutputChannel`: sends addressed messages to the control surface
//! - Keep the upstream link alive (`ConnectionSupervisor`)
//! - Map slide text to command sequences (`TriggerEngine`)
//! - Wire events, normalisation, matching and output together (`Relay`)
//!
//! ## Dependency rule
//! Depends on `slidelink-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod relay;
pub mod supervisor;
pub mod trigger_engine;
