//! Synchronous request/response semantics over NATS pub/sub.
//!
//! The broker is fire-and-forget; this crate layers a blocking
//! call/response abstraction on top of it with correlation tokens,
//! exactly-once reply acceptance, and graceful handling of unknown or
//! malformed messages.
//!
//! # Modules
//!
//! - [`topology`] -- Subject addressing: the well-known request subject,
//!   per-client reply subjects, and per-entity event subjects.
//! - [`binding`] -- [`TransportBinding`], owning one broker connection and
//!   exposing publish/subscribe primitives.
//! - [`client`] -- [`RpcClient`] (correlated calls with a reply timeout)
//!   and [`EcosystemClient`] (typed operation wrappers).
//! - [`dispatch`] -- [`RpcDispatcher`] and the [`EcosystemHandler`] seam
//!   the service plugs into.
//! - [`events`] -- Consumed-entity notice publishing and subscription.
//! - [`error`] -- [`RpcError`], the crate-wide error taxonomy.
//!
//! [`TransportBinding`]: binding::TransportBinding
//! [`RpcClient`]: client::RpcClient
//! [`EcosystemClient`]: client::EcosystemClient
//! [`RpcDispatcher`]: dispatch::RpcDispatcher
//! [`EcosystemHandler`]: dispatch::EcosystemHandler
//! [`RpcError`]: error::RpcError

pub mod binding;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod topology;

pub use binding::TransportBinding;
pub use client::{EcosystemClient, RpcClient, RpcClientConfig};
pub use dispatch::{EcosystemHandler, HandlerError, RpcDispatcher};
pub use error::RpcError;
pub use events::EventPublisher;
pub use topology::Topology;
