//! The ecosystem service: RPC handlers over the shared world state, plus
//! the background simulation tick.
//!
//! Two independent activities mutate the same world through one lock: the
//! dispatcher's handlers (registrations, updates, membership tests) and
//! the tick loop (predator movement and consumption). The binary in
//! `main.rs` wires both to the broker and restarts the whole graph on any
//! transport failure.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with defaults for every knob.
//! - [`service`] -- [`EcosystemService`], the exhaustive request handler.
//! - [`tick`] -- The background tick loop and the fullness cooldown.
//! - [`error`] -- [`ServiceError`], the binary's top-level error.
//!
//! [`EcosystemService`]: service::EcosystemService
//! [`ServiceError`]: error::ServiceError

pub mod config;
pub mod error;
pub mod service;
pub mod tick;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use service::EcosystemService;
pub use tick::{ConsumedSink, TickTiming, run_tick_loop};
