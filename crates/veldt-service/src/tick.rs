//! The background simulation tick.
//!
//! One task per predator instance runs this loop for the lifetime of the
//! service: sleep the fixed inter-tick delay, take the state lock, move
//! the predator and run the consumption scan, release the lock, then push
//! a notice for every consumed entity. When a tick crosses the weight
//! threshold the loop logs fullness, resets the weight to zero, sleeps
//! the time-based cooldown, and only then lets consumption resume.
//!
//! The lock is held for the whole O(entity count) scan, so very large
//! populations serialize against concurrent RPC handlers. Both sleeps
//! happen outside the lock.

use std::time::Duration;

use tracing::info;

use veldt_rpc::EventPublisher;
use veldt_types::ConsumedNotice;
use veldt_world::{EcosystemState, SharedEcosystem};

use crate::config::TickConfig;

/// Where consumed-entity notices go. The production sink publishes them
/// on the broker; tests collect them in a channel.
pub trait ConsumedSink: Send + Sync + 'static {
    /// Deliver one notice (fire-and-forget).
    fn notify(&self, notice: &ConsumedNotice);
}

impl ConsumedSink for EventPublisher {
    fn notify(&self, notice: &ConsumedNotice) {
        self.publish_consumed(notice);
    }
}

/// Tick timing resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTiming {
    /// Fixed delay between ticks.
    pub interval: Duration,
    /// Cooldown after the predator becomes full.
    pub cooldown: Duration,
}

impl From<TickConfig> for TickTiming {
    fn from(config: TickConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            cooldown: Duration::from_millis(config.cooldown_ms),
        }
    }
}

/// Run the simulation tick until the task is aborted.
///
/// Mutates the world through the same lock the RPC handlers use; the two
/// activities are independent except for that mutual exclusion.
pub async fn run_tick_loop<S: ConsumedSink>(
    shared: SharedEcosystem,
    sink: S,
    timing: TickTiming,
) {
    info!(
        interval_ms = u64::try_from(timing.interval.as_millis()).unwrap_or(u64::MAX),
        cooldown_ms = u64::try_from(timing.cooldown.as_millis()).unwrap_or(u64::MAX),
        "tick loop started"
    );

    loop {
        tokio::time::sleep(timing.interval).await;

        let outcome = shared.with(|state| {
            let mut rng = rand::rng();
            state.advance(&mut rng)
        });

        info!(
            x = outcome.position.0,
            y = outcome.position.1,
            consumed = outcome.consumed.len(),
            "tick complete"
        );
        for notice in &outcome.consumed {
            sink.notify(notice);
        }

        if outcome.became_full {
            let weight = shared.with(|state| {
                let weight = state.weight();
                state.reset_weight();
                weight
            });
            info!(weight, "predator is full; weight reset to zero");

            tokio::time::sleep(timing.cooldown).await;
            shared.with(EcosystemState::end_cooldown);
            info!("predator is no longer full");
        }
    }
}
