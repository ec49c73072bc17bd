//! Resource producer binary.
//!
//! Keeps one resource available in the veldt at all times: registers it
//! at a random position, waits for the consumed notice, and respawns.
//! Configured entirely through environment variables; see
//! [`veldt_producer::config::ProducerConfig::from_env`].

use tracing::info;
use tracing_subscriber::EnvFilter;

use veldt_producer::{ProducerConfig, ProducerError, resource};

/// Application entry point for the resource producer.
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

    info!("veldt-resource starting");

    let config = ProducerConfig::from_env()?;
    info!(
        broker_url = config.broker_url,
        respawn_delay_ms = u64::try_from(config.respawn_delay.as_millis()).unwrap_or(u64::MAX),
        retry_delay_ms = u64::try_from(config.retry_delay.as_millis()).unwrap_or(u64::MAX),
        "configuration loaded"
    );

    resource::run(config).await;
    Ok(())
}
