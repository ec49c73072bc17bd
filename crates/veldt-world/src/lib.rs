//! Predator world state and consumption rules for the Veldt simulation.
//!
//! This crate models the concurrently mutated world: the predator's
//! position, weight, and satiety, plus the prey and resource collections
//! registered by independent producers. All mutation goes through
//! [`SharedEcosystem`], the single mutual-exclusion boundary shared by the
//! RPC handlers and the background tick.
//!
//! # Modules
//!
//! - [`state`] -- [`EcosystemState`], the tracked-entity collections, and
//!   the per-tick consumption scan.
//! - [`shared`] -- [`SharedEcosystem`], the lock wrapper that is the only
//!   access path to the state.
//!
//! [`EcosystemState`]: state::EcosystemState
//! [`SharedEcosystem`]: shared::SharedEcosystem

pub mod shared;
pub mod state;

pub use shared::SharedEcosystem;
pub use state::{EcosystemState, Satiety, TickOutcome, WorldRules};
