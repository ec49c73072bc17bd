//! Configuration for the producer binaries.
//!
//! All configuration is loaded from environment variables. Every variable
//! is optional; the defaults give a working local setup against a broker
//! on `localhost`.

use std::time::Duration;

use veldt_rpc::RpcClientConfig;

use crate::error::ProducerError;

/// Complete producer configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    /// NATS server URL (e.g. `nats://localhost:4222`).
    pub broker_url: String,
    /// Delay between distance updates for a living prey.
    pub update_interval: Duration,
    /// Delay between an entity's death and the next registration.
    pub respawn_delay: Duration,
    /// Delay before reconnecting after a transport failure.
    pub retry_delay: Duration,
    /// How long a call waits for its reply before giving up.
    pub reply_timeout: Duration,
}

impl ProducerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `NATS_URL` -- broker connection string (default `nats://localhost:4222`)
    /// - `UPDATE_INTERVAL_MS` -- distance update cadence (default 3000)
    /// - `RESPAWN_DELAY_MS` -- delay before re-registering (default 5000)
    /// - `RETRY_DELAY_MS` -- reconnect backoff (default 3000)
    /// - `REPLY_TIMEOUT_MS` -- per-call reply deadline (default 10000)
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::Config`] when a set variable fails to
    /// parse as an integer millisecond count.
    pub fn from_env() -> Result<Self, ProducerError> {
        let broker_url =
            std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_owned());

        Ok(Self {
            broker_url,
            update_interval: duration_var("UPDATE_INTERVAL_MS", 3000)?,
            respawn_delay: duration_var("RESPAWN_DELAY_MS", 5000)?,
            retry_delay: duration_var("RETRY_DELAY_MS", 3000)?,
            reply_timeout: duration_var("REPLY_TIMEOUT_MS", 10_000)?,
        })
    }

    /// The RPC client settings this configuration describes.
    pub const fn client_config(&self) -> RpcClientConfig {
        RpcClientConfig {
            reply_timeout: self.reply_timeout,
        }
    }
}

/// Read an optional millisecond environment variable as a [`Duration`].
fn duration_var(name: &str, default_ms: u64) -> Result<Duration, ProducerError> {
    parse_ms(name, std::env::var(name).ok(), default_ms)
}

/// Resolve a raw millisecond value, falling back to the default when absent.
fn parse_ms(name: &str, raw: Option<String>, default_ms: u64) -> Result<Duration, ProducerError> {
    let ms = match raw {
        Some(value) => value
            .parse()
            .map_err(|e| ProducerError::Config(format!("invalid {name}: {e}")))?,
        None => default_ms,
    };
    Ok(Duration::from_millis(ms))
}
