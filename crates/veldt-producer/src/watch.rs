//! Waiting for an entity's consumed notice without trusting it blindly.
//!
//! Consumed notices travel over core NATS with no delivery guarantee: a
//! dropped publish or a reconnect window loses them silently while the
//! subscription stays open. Awaiting the notice alone could therefore
//! strand a producer forever. [`await_departure`] races the notice stream
//! against a periodic liveness probe, so a lost notice only delays the
//! observation by one probe interval instead of blocking it.

use std::time::Duration;

use futures::{Stream, StreamExt as _};

use crate::error::ProducerError;

/// How a producer learned that its entity left the world.
#[derive(Debug)]
pub enum Departure {
    /// The consumed notice arrived; the payload is the raw notice bytes.
    Announced(Vec<u8>),
    /// No notice was seen, but a liveness probe reported the entity gone.
    Probed,
}

/// Wait until the entity is observed gone, one way or the other.
///
/// Resolves with [`Departure::Announced`] when the notice stream yields a
/// message, or [`Departure::Probed`] when `probe` returns `false`. The
/// probe runs every `interval` while no notice has arrived; its errors
/// propagate. A closed notice stream is a transport failure.
pub async fn await_departure<S, P>(
    mut notices: S,
    interval: Duration,
    mut probe: P,
) -> Result<Departure, ProducerError>
where
    S: Stream<Item = Vec<u8>> + Unpin,
    P: AsyncFnMut() -> Result<bool, ProducerError>,
{
    loop {
        tokio::select! {
            notice = notices.next() => {
                return notice.map(Departure::Announced).ok_or_else(|| {
                    ProducerError::Rpc(veldt_rpc::RpcError::Transport {
                        message: "consumed-notice subscription closed".to_owned(),
                    })
                });
            }
            () = tokio::time::sleep(interval) => {
                if !probe().await? {
                    return Ok(Departure::Probed);
                }
            }
        }
    }
}
