//! Shared wire and domain types for the Veldt ecosystem service.
//!
//! This crate defines everything that crosses the broker: the RPC envelope,
//! the action vocabulary, typed request/response unions, entity descriptors,
//! and the consumed-entity notice published by the simulation tick.
//!
//! # Modules
//!
//! - [`envelope`] -- The wire envelope and the [`Action`] tag vocabulary.
//! - [`ids`] -- Type-safe identifier wrappers (client ID, correlation token,
//!   monotonic entity ID).
//! - [`messages`] -- Typed call/result payloads and the [`Request`] /
//!   [`Response`] unions resolved by exhaustive match.
//! - [`notice`] -- The [`ConsumedNotice`] push event emitted when the
//!   predator consumes a tracked entity.
//!
//! [`Action`]: envelope::Action
//! [`Request`]: messages::Request
//! [`Response`]: messages::Response
//! [`ConsumedNotice`]: notice::ConsumedNotice

pub mod envelope;
pub mod ids;
pub mod messages;
pub mod notice;

pub use envelope::{Action, RpcEnvelope, WireError};
pub use ids::{ClientId, CorrelationId, EntityId};
pub use messages::{
    DistanceUpdate, EntityRef, Flag, PreyDesc, RegisteredId, Request, ResourceDesc, Response,
};
pub use notice::{ConsumedNotice, EntityKind};
