//! # slidelinkd: slidelink daemon
//!
//! Composition root that wires all adapters together and runs the relay.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Open the OSC output socket
//! - Build the trigger engine from the configured rules
//! - Construct the ProPresenter source and its connection supervisor
//! - Run the relay until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use slidelink_adapter_osc::OscClient;
use slidelink_adapter_propresenter::ProPresenterSource;
use slidelink_app::relay::Relay;
use slidelink_app::supervisor::ConnectionSupervisor;
use slidelink_app::trigger_engine::TriggerEngine;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Config {
        propresenter,
        osc,
        relay,
        triggers,
        logging,
    } = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&logging.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Output
    let output = OscClient::connect(&osc)
        .await
        .context("failed to open OSC output")?;

    // Trigger matching
    let engine = TriggerEngine::new(relay.text_addresses.clone(), triggers);
    for (index, rule) in engine.rules().iter().enumerate() {
        for command in &rule.commands {
            tracing::debug!(rule = index, text = %rule.text, %command, "trigger command");
        }
        for command in rule.release_commands.iter().flatten() {
            tracing::debug!(rule = index, text = %rule.text, %command, "release command");
        }
    }

    tracing::info!(
        propresenter = %propresenter.url(),
        osc_host = %osc.host,
        osc_port = osc.port,
        text_addresses = ?engine.targets(),
        triggers = engine.rules().len(),
        "slidelinkd starting"
    );

    // Upstream
    let supervisor = ConnectionSupervisor::with_cooldown(
        ProPresenterSource::new(propresenter),
        relay.reconnect_cooldown(),
    );

    Relay::new(supervisor, engine, output, relay.split_delimiter.clone())
        .run(relay.tick_interval(), shutdown_signal())
        .await;

    tracing::info!("slidelinkd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
