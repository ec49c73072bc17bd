//! Ecosystem service binary.
//!
//! This is the main entry point that wires the request dispatcher and
//! the background tick loop to the broker. It loads configuration,
//! builds the shared world once, and then supervises the broker-facing
//! components: on any transport failure it tears them down, waits the
//! configured restart delay, and rebuilds them against the same world.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `veldt-config.yaml`
//! 3. Build the shared ecosystem state from the predator rules
//! 4. Connect to the broker
//! 5. Spawn the tick loop with a consumed-event publisher
//! 6. Run the dispatcher until the transport fails
//! 7. Abort the tick task, wait, and rebuild from step 4

use std::path::Path;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use veldt_rpc::{EventPublisher, RpcDispatcher, Topology, TransportBinding};
use veldt_service::tick::{TickTiming, run_tick_loop};
use veldt_service::{EcosystemService, ServiceConfig, ServiceError};
use veldt_world::{EcosystemState, SharedEcosystem};

/// Default configuration file path, relative to the working directory.
const CONFIG_PATH: &str = "veldt-config.yaml";

/// Application entry point for the ecosystem service.
///
/// # Errors
///
/// Returns an error if configuration loading fails. Transport failures
/// are handled by the supervisory loop and never escape.
#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("veldt-service starting");

    let config = ServiceConfig::load_or_default(Path::new(CONFIG_PATH))?;
    info!(
        broker_url = config.broker.url,
        tick_interval_ms = config.tick.interval_ms,
        cooldown_ms = config.tick.cooldown_ms,
        max_weight = config.predator.max_weight,
        "Configuration loaded"
    );

    // The world outlives broker sessions: registrations survive a
    // reconnect, only in-flight deliveries are lost.
    let shared = SharedEcosystem::new(EcosystemState::new(config.rules()));
    let timing = TickTiming::from(config.tick);
    let restart_delay = std::time::Duration::from_millis(config.restart.delay_ms);

    loop {
        if let Err(err) = run_session(&config, &shared, timing).await {
            error!(error = %err, "broker session failed, rebuilding");
        }
        tokio::time::sleep(restart_delay).await;
    }
}

/// Run one broker session: connect, spawn the tick loop, and drive the
/// dispatcher until the transport fails.
async fn run_session(
    config: &ServiceConfig,
    shared: &SharedEcosystem,
    timing: TickTiming,
) -> Result<(), ServiceError> {
    let binding = TransportBinding::connect(&config.broker.url, Topology::default()).await?;
    info!(broker_url = config.broker.url, "Broker connected");

    let publisher = EventPublisher::new(binding.client(), binding.topology().clone());
    let tick_task = tokio::spawn(run_tick_loop(shared.clone(), publisher, timing));

    let dispatcher = RpcDispatcher::new(binding, EcosystemService::new(shared.clone()));
    let result = dispatcher.run().await;

    tick_task.abort();
    result.map_err(ServiceError::from)
}
