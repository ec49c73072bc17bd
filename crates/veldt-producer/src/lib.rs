//! Producer binaries that populate the veldt with prey and resources.
//!
//! Each producer owns exactly one living entity at a time. It registers
//! the entity with the ecosystem service, subscribes to that entity's
//! consumed-notice subject, and waits for the push notification that the
//! predator has eaten it. After a respawn delay it registers a fresh
//! entity and starts over. Any transport failure tears the session down;
//! an outer loop reconnects after a retry delay.
//!
//! # Modules
//!
//! - [`config`] -- [`ProducerConfig`], loaded from environment variables.
//! - [`spawn`] -- Random entity attributes.
//! - [`prey`] -- The prey lifecycle: register, roam, die, respawn.
//! - [`resource`] -- The resource lifecycle: register, wait, respawn.
//! - [`watch`] -- Racing the consumed notice against a liveness probe.
//! - [`error`] -- [`ProducerError`].
//!
//! [`ProducerConfig`]: config::ProducerConfig
//! [`ProducerError`]: error::ProducerError

pub mod config;
pub mod error;
pub mod prey;
pub mod resource;
pub mod spawn;
pub mod watch;

pub use config::ProducerConfig;
pub use error::ProducerError;
