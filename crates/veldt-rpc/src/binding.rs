//! One connection, one subject topology: the transport layer.
//!
//! [`TransportBinding`] owns a single NATS connection and the [`Topology`]
//! it addresses. Everything above it (client, dispatcher, events) goes
//! through these primitives; nothing else in the workspace touches
//! `async_nats` directly.

use async_nats::{HeaderMap, Subscriber};
use tracing::info;

use crate::error::RpcError;
use crate::topology::Topology;

/// Owns one broker connection and declares the addressing topology.
pub struct TransportBinding {
    client: async_nats::Client,
    topology: Topology,
}

impl TransportBinding {
    /// Connect to the broker.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`] if the connection cannot be
    /// established.
    pub async fn connect(url: &str, topology: Topology) -> Result<Self, RpcError> {
        info!(url = url, "connecting to broker");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| RpcError::Transport {
                message: format!("failed to connect to {url}: {e}"),
            })?;
        info!("broker connection established");
        Ok(Self { client, topology })
    }

    /// Wrap an already connected client.
    pub const fn new(client: async_nats::Client, topology: Topology) -> Self {
        Self { client, topology }
    }

    /// The subject layout this binding addresses.
    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    /// A clone of the underlying connection handle, for auxiliary
    /// publishers (e.g. simulation events) that share this connection.
    pub fn client(&self) -> async_nats::Client {
        self.client.clone()
    }

    /// Publish a message without headers.
    pub async fn publish(&self, subject: String, payload: Vec<u8>) -> Result<(), RpcError> {
        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| RpcError::Transport {
                message: format!("failed to publish to {subject}: {e}"),
            })
    }

    /// Publish a message carrying correlation metadata headers.
    pub async fn publish_with_headers(
        &self,
        subject: String,
        headers: HeaderMap,
        payload: Vec<u8>,
    ) -> Result<(), RpcError> {
        self.client
            .publish_with_headers(subject.clone(), headers, payload.into())
            .await
            .map_err(|e| RpcError::Transport {
                message: format!("failed to publish to {subject}: {e}"),
            })
    }

    /// Subscribe to a subject exclusively (per-client reply subjects,
    /// per-entity event subjects).
    pub async fn subscribe(&self, subject: String) -> Result<Subscriber, RpcError> {
        self.client
            .subscribe(subject.clone())
            .await
            .map_err(|e| RpcError::Transport {
                message: format!("failed to subscribe to {subject}: {e}"),
            })
    }

    /// Subscribe to a subject through a queue group, sharing the stream
    /// with other members of the group (the request queue).
    pub async fn queue_subscribe(
        &self,
        subject: String,
        group: String,
    ) -> Result<Subscriber, RpcError> {
        self.client
            .queue_subscribe(subject.clone(), group.clone())
            .await
            .map_err(|e| RpcError::Transport {
                message: format!("failed to queue-subscribe to {subject} ({group}): {e}"),
            })
    }

    /// Flush all pending messages to the broker.
    pub async fn flush(&self) -> Result<(), RpcError> {
        self.client.flush().await.map_err(|e| RpcError::Transport {
            message: format!("flush failed: {e}"),
        })
    }
}

impl std::fmt::Debug for TransportBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportBinding")
            .field("topology", &self.topology)
            .finish_non_exhaustive()
    }
}
