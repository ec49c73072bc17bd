//! The serving side: consume the request subject, route, reply.
//!
//! [`RpcDispatcher`] drives the queue-group subscription on the well-known
//! request subject. Each message is decoded into a typed [`Request`] and
//! routed by exhaustive match through the [`EcosystemHandler`] seam; there
//! is no string-keyed handler table, so an unmatched tag cannot be
//! silently routed -- it fails to decode and is dropped.
//!
//! Delivery here is at-most-once: the broker considers a message consumed
//! the moment it is delivered, so a handler failure after delivery means
//! the request is gone and no reply is ever produced. The caller observes
//! that as a timeout. Protocol trouble and handler failures are logged
//! and never crash the loop; only transport failures end it, handing
//! control back to the outer rebuild loop.

use async_nats::Message;
use futures::StreamExt as _;
use tracing::{debug, error, info, warn};

use veldt_types::{Request, Response, RpcEnvelope};

use crate::binding::TransportBinding;
use crate::error::RpcError;
use crate::topology::{CORRELATION_HEADER, REPLY_TO_HEADER};

/// A handler malfunction. Logged by the dispatcher and swallowed; the
/// message is lost and no reply is sent.
#[derive(Debug, thiserror::Error)]
#[error("handler failed: {message}")]
pub struct HandlerError {
    /// Description of the failure.
    pub message: String,
}

/// The seam the service plugs into: one exhaustive match over all calls.
pub trait EcosystemHandler: Send + Sync {
    /// Process one typed request and produce its reply payload.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the operation cannot be carried out;
    /// the dispatcher logs it and sends no reply.
    fn handle(&self, request: Request) -> Result<Response, HandlerError>;
}

/// What became of one received request.
#[derive(Debug, PartialEq, Eq)]
enum Disposition {
    /// The handler produced a reply envelope to publish.
    Reply(RpcEnvelope),
    /// The message was logged and dropped; nothing to publish.
    Dropped,
}

/// Consumes the well-known request subject and routes calls to a handler.
#[derive(Debug)]
pub struct RpcDispatcher<H> {
    binding: TransportBinding,
    handler: H,
}

impl<H: EcosystemHandler> RpcDispatcher<H> {
    /// Pair a transport binding with a handler.
    pub const fn new(binding: TransportBinding, handler: H) -> Self {
        Self { binding, handler }
    }

    /// Consume the request subject indefinitely.
    ///
    /// Runs until the subscription closes or a reply publish fails; both
    /// are transport failures that the outer supervisory loop answers by
    /// rebuilding the whole component graph.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`]; this function never returns `Ok`.
    pub async fn run(&self) -> Result<(), RpcError> {
        let topology = self.binding.topology();
        let mut requests = self
            .binding
            .queue_subscribe(topology.request_subject.clone(), topology.queue_group.clone())
            .await?;
        info!(
            subject = topology.request_subject,
            group = topology.queue_group,
            "dispatcher consuming requests"
        );

        while let Some(msg) = requests.next().await {
            self.process(msg).await?;
        }

        Err(RpcError::Transport {
            message: "request subscription closed".to_owned(),
        })
    }

    /// Handle one delivery: route it, then reply if a reply address was
    /// attached.
    async fn process(&self, msg: Message) -> Result<(), RpcError> {
        let disposition = route(&self.handler, &msg.payload);
        let Disposition::Reply(envelope) = disposition else {
            return Ok(());
        };

        let headers = msg.headers.as_ref();
        let reply_to = headers
            .and_then(|h| h.get(REPLY_TO_HEADER))
            .map(|v| v.as_str().to_owned());
        let correlation = headers
            .and_then(|h| h.get(CORRELATION_HEADER))
            .map(|v| v.as_str().to_owned());

        let (Some(reply_to), Some(correlation)) = (reply_to, correlation) else {
            // Fire-and-forget call: the handler ran, the reply has nowhere
            // to go.
            debug!(action = %envelope.action, "no reply address attached; reply discarded");
            return Ok(());
        };

        let bytes = match envelope.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to encode reply; message is lost");
                return Ok(());
            }
        };

        let mut reply_headers = async_nats::HeaderMap::new();
        reply_headers.insert(CORRELATION_HEADER, correlation.as_str());
        debug!(action = %envelope.action, reply_to = reply_to, "publishing reply");
        self.binding
            .publish_with_headers(reply_to, reply_headers, bytes)
            .await
    }
}

/// Decode and route one request body through the handler.
///
/// Undecodable envelopes, unknown action tags, and handler failures are
/// logged and produce [`Disposition::Dropped`]; processing continues with
/// the next message.
fn route<H: EcosystemHandler>(handler: &H, body: &[u8]) -> Disposition {
    let envelope = match RpcEnvelope::from_bytes(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "unsupported or malformed request; ignoring the message");
            return Disposition::Dropped;
        }
    };

    let request = match Request::decode(&envelope) {
        Ok(request) => request,
        Err(e) => {
            warn!(
                action = %envelope.action,
                error = %e,
                "unroutable request; ignoring the message"
            );
            return Disposition::Dropped;
        }
    };

    match handler.handle(request) {
        Ok(response) => match response.encode() {
            Ok(reply) => Disposition::Reply(reply),
            Err(e) => {
                error!(error = %e, "failed to encode response; message is lost");
                Disposition::Dropped
            }
        },
        Err(e) => {
            // At-most-once: the broker already considers this message
            // consumed, so the request is lost and the caller times out.
            error!(action = %envelope.action, error = %e, "handler failed; no reply sent");
            Disposition::Dropped
        }
    }
}
