//! Prey producer binary.
//!
//! Keeps one prey alive in the veldt at all times: registers it, reports
//! its roaming distance on a fixed cadence, waits for the consumed
//! notice, and respawns. Configured entirely through environment
//! variables; see [`veldt_producer::config::ProducerConfig::from_env`].

use tracing::info;
use tracing_subscriber::EnvFilter;

use veldt_producer::{ProducerConfig, ProducerError, prey};

/// Application entry point for the prey producer.
///
/// # Errors
///
/// Returns an error when the environment configuration is invalid.
#[tokio::main]
async fn main() -> Result<(), ProducerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("veldt-prey starting");

    let config = ProducerConfig::from_env()?;
    info!(
        broker_url = config.broker_url,
        update_interval_ms = u64::try_from(config.update_interval.as_millis()).unwrap_or(u64::MAX),
        respawn_delay_ms = u64::try_from(config.respawn_delay.as_millis()).unwrap_or(u64::MAX),
        "configuration loaded"
    );

    prey::run(config).await;
    Ok(())
}
