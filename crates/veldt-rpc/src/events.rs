//! Consumed-entity notices: push instead of poll.
//!
//! The tick loop publishes a [`ConsumedNotice`] on a per-entity subject
//! the moment an entity is consumed. Producers subscribe to their own
//! entity's subject and await the notice rather than polling an is-alive
//! call on a fixed interval. Publishing is fire-and-forget: a failed or
//! slow event publish must never block the tick.

use async_nats::Subscriber;
use tracing::{debug, warn};

use veldt_types::{ConsumedNotice, EntityId};

use crate::error::RpcError;
use crate::topology::Topology;

/// Publishes simulation events on the shared connection.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    client: async_nats::Client,
    topology: Topology,
}

impl EventPublisher {
    /// Build a publisher over an existing connection handle.
    pub const fn new(client: async_nats::Client, topology: Topology) -> Self {
        Self { client, topology }
    }

    /// Publish a consumed-entity notice (fire-and-forget).
    ///
    /// Serialization or publish failures are logged but do not propagate;
    /// event delivery must never block or fail the simulation tick.
    pub fn publish_consumed(&self, notice: &ConsumedNotice) {
        let subject = self.topology.consumed_subject(notice.id);
        match serde_json::to_vec(notice) {
            Ok(payload) => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.publish(subject.clone(), payload.into()).await {
                        warn!(subject = subject, error = %e, "failed to publish consumed notice");
                    }
                });
            }
            Err(e) => {
                warn!(subject = subject, error = %e, "failed to serialize consumed notice");
            }
        }
    }
}

/// Subscribe to the consumed-entity notice subject for one entity.
pub async fn subscribe_consumed(
    client: &async_nats::Client,
    topology: &Topology,
    id: EntityId,
) -> Result<Subscriber, RpcError> {
    let subject = topology.consumed_subject(id);
    debug!(subject = subject, "subscribing to consumed notices");
    client
        .subscribe(subject.clone())
        .await
        .map_err(|e| RpcError::Transport {
            message: format!("failed to subscribe to {subject}: {e}"),
        })
}

/// Deserialize a received notice payload.
pub fn decode_notice(bytes: &[u8]) -> Result<ConsumedNotice, RpcError> {
    serde_json::from_slice(bytes).map_err(|e| RpcError::Decode {
        message: format!("failed to deserialize consumed notice: {e}"),
    })
}
