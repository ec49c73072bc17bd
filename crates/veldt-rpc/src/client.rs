//! The calling side: correlated RPC over the fire-and-forget broker.
//!
//! [`RpcClient`] turns a publish into a blocking call: it subscribes to its
//! own reply subject *before* publishing (so a fast reply cannot be
//! missed), then awaits the one message whose correlation token and result
//! tag match. Acceptance is exactly-once by construction -- the first match
//! resolves the call and the reply subscription is detached, so a late
//! duplicate has nowhere to land.
//!
//! One client instance supports one in-flight call at a time: the reply
//! subject is shared across calls from the same instance, and `&mut self`
//! on [`RpcClient::call`] makes the serialization a compile-time fact.
//! Concurrent callers take one client instance each.

use std::time::Duration;

use async_nats::{HeaderMap, Subscriber};
use futures::StreamExt as _;
use tracing::{debug, warn};

use veldt_types::{
    Action, ClientId, CorrelationId, DistanceUpdate, EntityId, EntityRef, Flag, PreyDesc,
    RegisteredId, Request, ResourceDesc, Response, RpcEnvelope,
};

use crate::binding::TransportBinding;
use crate::error::RpcError;
use crate::topology::{CORRELATION_HEADER, REPLY_TO_HEADER, Topology};

/// Tunables for the calling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcClientConfig {
    /// How long [`RpcClient::call`] waits for a correlated reply before
    /// resolving with [`RpcError::Timeout`]. A lost reply (dropped request,
    /// failed handler) would otherwise block the caller forever.
    pub reply_timeout: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            reply_timeout: Duration::from_secs(10),
        }
    }
}

/// An envelope-level RPC caller bound to one reply subject.
#[derive(Debug)]
pub struct RpcClient {
    binding: TransportBinding,
    client_id: ClientId,
    reply_subject: String,
    config: RpcClientConfig,
}

impl RpcClient {
    /// Build a client on an existing binding, assigning it a fresh
    /// identity and an exclusive reply subject.
    pub fn new(binding: TransportBinding, config: RpcClientConfig) -> Self {
        let client_id = ClientId::new();
        let reply_subject = binding.topology().reply_subject(client_id);
        debug!(client_id = %client_id, reply_subject = reply_subject, "client created");
        Self {
            binding,
            client_id,
            reply_subject,
            config,
        }
    }

    /// Connect to the broker and build a client in one step.
    pub async fn connect(
        url: &str,
        topology: Topology,
        config: RpcClientConfig,
    ) -> Result<Self, RpcError> {
        let binding = TransportBinding::connect(url, topology).await?;
        Ok(Self::new(binding, config))
    }

    /// This client's identity.
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// The underlying transport, for auxiliary subscriptions that share
    /// this client's connection (e.g. consumed-entity notices).
    pub const fn binding(&self) -> &TransportBinding {
        &self.binding
    }

    /// Issue a call and await its correlated reply.
    ///
    /// Subscribes to the reply subject, publishes the request with a fresh
    /// correlation token, and blocks the calling task until the matching
    /// reply arrives or the configured timeout elapses. Messages bearing a
    /// different token or an unexpected action are logged and discarded
    /// without resolving the call.
    ///
    /// # Errors
    ///
    /// [`RpcError::Validation`] for a malformed request (raised before any
    /// network activity), [`RpcError::Transport`] for publish/subscribe
    /// failures, [`RpcError::Timeout`] when no matching reply arrives in
    /// time.
    pub async fn call(&mut self, request: &Request) -> Result<Response, RpcError> {
        request.validate()?;
        let expected = request.action().result_tag().ok_or_else(|| {
            RpcError::Validation {
                message: format!("'{}' is not a call tag", request.action()),
            }
        })?;

        let correlation = CorrelationId::new();

        // Subscribe before publishing so a fast reply cannot slip past.
        let mut reply_sub = self.binding.subscribe(self.reply_subject.clone()).await?;

        let bytes = request.encode()?.to_bytes()?;
        let token = correlation.to_string();
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_HEADER, token.as_str());
        headers.insert(REPLY_TO_HEADER, self.reply_subject.as_str());

        debug!(
            action = %request.action(),
            correlation = %correlation,
            "publishing call"
        );
        self.binding
            .publish_with_headers(
                self.binding.topology().request_subject.clone(),
                headers,
                bytes,
            )
            .await?;
        self.binding.flush().await?;

        let result = await_reply(
            &mut reply_sub,
            &token,
            expected,
            self.config.reply_timeout,
        )
        .await;

        // Detach the reply subscription whatever happened; a duplicate or
        // late reply is dropped by the broker from here on.
        let _ = reply_sub.unsubscribe().await;
        result
    }

    /// Fire-and-forget variant: publish the call without awaiting a reply.
    ///
    /// The handler still runs on the service side; its reply (if any) is
    /// discarded because no reply address is attached.
    pub async fn cast(&mut self, request: &Request) -> Result<(), RpcError> {
        request.validate()?;
        let bytes = request.encode()?.to_bytes()?;
        self.binding
            .publish(self.binding.topology().request_subject.clone(), bytes)
            .await?;
        self.binding.flush().await
    }
}

/// Await the one reply matching `token` and `expected`; ignore everything
/// else that lands on the reply subject.
async fn await_reply(
    reply_sub: &mut Subscriber,
    token: &str,
    expected: Action,
    timeout: Duration,
) -> Result<Response, RpcError> {
    let deadline = tokio::time::Instant::now()
        .checked_add(timeout)
        .unwrap_or_else(tokio::time::Instant::now);

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return Err(timeout_error(timeout));
        }

        match tokio::time::timeout(remaining, reply_sub.next()).await {
            Ok(Some(msg)) => {
                if let Some(response) =
                    match_reply(msg.headers.as_ref(), &msg.payload, token, expected)
                {
                    return Ok(response);
                }
            }
            Ok(None) => {
                return Err(RpcError::Transport {
                    message: "reply subscription closed".to_owned(),
                });
            }
            Err(_) => return Err(timeout_error(timeout)),
        }
    }
}

/// Decide whether a message on the reply subject resolves the pending
/// call. Anything that does not match is logged and discarded.
fn match_reply(
    headers: Option<&HeaderMap>,
    body: &[u8],
    token: &str,
    expected: Action,
) -> Option<Response> {
    let Some(headers) = headers else {
        debug!("ignoring reply without headers");
        return None;
    };
    if headers.get(CORRELATION_HEADER).map(|v| v.as_str()) != Some(token) {
        debug!("ignoring reply with a non-matching correlation token");
        return None;
    }

    let envelope = match RpcEnvelope::from_bytes(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "ignoring undecodable reply");
            return None;
        }
    };
    if envelope.action != expected {
        warn!(
            action = %envelope.action,
            expected = %expected,
            "unsupported RPC action on the reply subject; ignoring the message"
        );
        return None;
    }

    match Response::decode(&envelope) {
        Ok(response) => Some(response),
        Err(e) => {
            warn!(error = %e, "ignoring reply with an undecodable payload");
            None
        }
    }
}

fn timeout_error(timeout: Duration) -> RpcError {
    RpcError::Timeout {
        waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}

/// Typed wrapper exposing the five ecosystem operations.
#[derive(Debug)]
pub struct EcosystemClient {
    rpc: RpcClient,
}

impl EcosystemClient {
    /// Wrap an envelope-level client.
    pub const fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Connect to the broker and build a typed client in one step.
    pub async fn connect(
        url: &str,
        topology: Topology,
        config: RpcClientConfig,
    ) -> Result<Self, RpcError> {
        Ok(Self::new(RpcClient::connect(url, topology, config).await?))
    }

    /// The underlying transport, for auxiliary subscriptions.
    pub const fn binding(&self) -> &TransportBinding {
        &self.rpc.binding
    }

    /// This client's identity.
    pub const fn client_id(&self) -> ClientId {
        self.rpc.client_id()
    }

    /// Register a prey entity; returns its assigned ID.
    pub async fn enter_area(&mut self, prey: &PreyDesc) -> Result<EntityId, RpcError> {
        match self.rpc.call(&Request::EnterArea(prey.clone())).await? {
            Response::EnterArea(RegisteredId { value }) => Ok(value),
            other => Err(mismatched(other)),
        }
    }

    /// Register a resource entity; returns its assigned ID.
    pub async fn spawn_resource(&mut self, resource: &ResourceDesc) -> Result<EntityId, RpcError> {
        match self.rpc.call(&Request::SpawnResource(resource.clone())).await? {
            Response::SpawnResource(RegisteredId { value }) => Ok(value),
            other => Err(mismatched(other)),
        }
    }

    /// Update a tracked prey's distance; `false` when the prey is unknown
    /// or already consumed.
    pub async fn update_distance(&mut self, id: EntityId, distance: u32) -> Result<bool, RpcError> {
        let request = Request::UpdateDistance(DistanceUpdate { id, distance });
        match self.rpc.call(&request).await? {
            Response::UpdateDistance(Flag { value }) => Ok(value),
            other => Err(mismatched(other)),
        }
    }

    /// Whether a prey entity is still tracked.
    pub async fn is_prey_alive(&mut self, id: EntityId) -> Result<bool, RpcError> {
        match self.rpc.call(&Request::IsPreyAlive(EntityRef { id })).await? {
            Response::IsPreyAlive(Flag { value }) => Ok(value),
            other => Err(mismatched(other)),
        }
    }

    /// Whether a resource entity is still tracked.
    pub async fn is_resource_alive(&mut self, id: EntityId) -> Result<bool, RpcError> {
        match self.rpc.call(&Request::IsResourceAlive(EntityRef { id })).await? {
            Response::IsResourceAlive(Flag { value }) => Ok(value),
            other => Err(mismatched(other)),
        }
    }
}

/// A correlated, well-tagged reply carrying the wrong result variant.
/// Cannot happen against a well-behaved service; surfaced as a decode
/// failure rather than a panic.
fn mismatched(response: Response) -> RpcError {
    RpcError::Decode {
        message: format!("mismatched result variant '{}'", response.action()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use veldt_types::EntityId;

    use super::*;

    fn reply_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_HEADER, token);
        headers
    }

    fn encoded(response: &Response) -> Vec<u8> {
        response.encode().unwrap().to_bytes().unwrap()
    }

    #[test]
    fn matching_token_and_action_is_accepted() {
        let response = Response::EnterArea(RegisteredId { value: EntityId(4) });
        let accepted = match_reply(
            Some(&reply_headers("tok-1")),
            &encoded(&response),
            "tok-1",
            Action::ResultEnterArea,
        );
        assert_eq!(accepted, Some(response));
    }

    #[test]
    fn non_matching_token_is_ignored() {
        let response = Response::EnterArea(RegisteredId { value: EntityId(4) });
        let accepted = match_reply(
            Some(&reply_headers("tok-other")),
            &encoded(&response),
            "tok-1",
            Action::ResultEnterArea,
        );
        assert_eq!(accepted, None);
    }

    #[test]
    fn unexpected_action_is_ignored() {
        let response = Response::IsPreyAlive(Flag { value: true });
        let accepted = match_reply(
            Some(&reply_headers("tok-1")),
            &encoded(&response),
            "tok-1",
            Action::ResultEnterArea,
        );
        assert_eq!(accepted, None);
    }

    #[test]
    fn headerless_and_undecodable_replies_are_ignored() {
        let response = Response::IsPreyAlive(Flag { value: true });
        assert_eq!(
            match_reply(None, &encoded(&response), "tok-1", Action::ResultIsPreyAlive),
            None
        );
        assert_eq!(
            match_reply(
                Some(&reply_headers("tok-1")),
                b"not an envelope",
                "tok-1",
                Action::ResultIsPreyAlive
            ),
            None
        );
    }

    #[test]
    fn default_reply_timeout_is_bounded() {
        let config = RpcClientConfig::default();
        assert!(config.reply_timeout > Duration::ZERO);
    }

    #[test]
    fn timeout_error_reports_the_waited_window() {
        let error = timeout_error(Duration::from_millis(250));
        assert!(matches!(error, RpcError::Timeout { waited_ms: 250 }));
    }
}
