//! Typed call/result payloads and the request/response unions.
//!
//! [`Request`] and [`Response`] pair each action tag with its payload type.
//! Encoding produces an [`RpcEnvelope`] whose payload is an opaque JSON
//! string; decoding is an exhaustive match over the tag, so every message
//! that enters the dispatch layer is either fully typed or rejected.

use serde::{Deserialize, Serialize};

use crate::envelope::{Action, RpcEnvelope, WireError};
use crate::ids::EntityId;

/// Descriptor of a prey entity entering the predator's area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreyDesc {
    /// Human-readable name, supplied by the producer.
    pub name: String,
    /// Body weight added to the predator on consumption.
    pub weight: u32,
    /// Current distance to the predator.
    pub distance: u32,
}

/// Descriptor of a resource entity spawned near the predator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDesc {
    /// Horizontal coordinate of the resource.
    pub x: i32,
    /// Vertical coordinate of the resource.
    pub y: i32,
    /// Volume added to the predator's weight on consumption.
    pub volume: u32,
}

/// Payload of a distance-update call for a tracked prey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceUpdate {
    /// The prey being updated.
    pub id: EntityId,
    /// The new distance to the predator.
    pub distance: u32,
}

/// Payload referencing a tracked entity by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// The entity in question.
    pub id: EntityId,
}

/// Result payload carrying a freshly assigned entity ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredId {
    /// The assigned ID.
    pub value: EntityId,
}

/// Result payload carrying a boolean outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// The boolean outcome.
    pub value: bool,
}

/// A fully typed call, one variant per call tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Register a prey entity; replies with its assigned ID.
    EnterArea(PreyDesc),
    /// Register a resource entity; replies with its assigned ID.
    SpawnResource(ResourceDesc),
    /// Update a tracked prey's distance; replies `false` when the prey is
    /// unknown or already consumed.
    UpdateDistance(DistanceUpdate),
    /// Membership test for a prey entity.
    IsPreyAlive(EntityRef),
    /// Membership test for a resource entity.
    IsResourceAlive(EntityRef),
}

impl Request {
    /// The call tag for this request.
    pub const fn action(&self) -> Action {
        match self {
            Self::EnterArea(_) => Action::CallEnterArea,
            Self::SpawnResource(_) => Action::CallSpawnResource,
            Self::UpdateDistance(_) => Action::CallUpdateDistance,
            Self::IsPreyAlive(_) => Action::CallIsPreyAlive,
            Self::IsResourceAlive(_) => Action::CallIsResourceAlive,
        }
    }

    /// Check the request before any network activity.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Validation`] for an empty prey name or a
    /// zero-volume resource.
    pub fn validate(&self) -> Result<(), WireError> {
        match self {
            Self::EnterArea(prey) if prey.name.trim().is_empty() => {
                Err(WireError::Validation {
                    message: "prey name must not be empty".to_owned(),
                })
            }
            Self::SpawnResource(resource) if resource.volume == 0 => {
                Err(WireError::Validation {
                    message: "resource volume must be positive".to_owned(),
                })
            }
            Self::EnterArea(_)
            | Self::SpawnResource(_)
            | Self::UpdateDistance(_)
            | Self::IsPreyAlive(_)
            | Self::IsResourceAlive(_) => Ok(()),
        }
    }

    /// Encode this request into a wire envelope.
    pub fn encode(&self) -> Result<RpcEnvelope, WireError> {
        let payload = match self {
            Self::EnterArea(prey) => encode_payload(prey)?,
            Self::SpawnResource(resource) => encode_payload(resource)?,
            Self::UpdateDistance(update) => encode_payload(update)?,
            Self::IsPreyAlive(entity) | Self::IsResourceAlive(entity) => encode_payload(entity)?,
        };
        Ok(RpcEnvelope {
            action: self.action(),
            payload: Some(payload),
        })
    }

    /// Decode a wire envelope into a typed request.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedAction`] for a result tag on the
    /// request path, and [`WireError::Decode`] for a missing or malformed
    /// payload.
    pub fn decode(envelope: &RpcEnvelope) -> Result<Self, WireError> {
        let payload = required_payload(envelope)?;
        match envelope.action {
            Action::CallEnterArea => Ok(Self::EnterArea(decode_payload(payload)?)),
            Action::CallSpawnResource => Ok(Self::SpawnResource(decode_payload(payload)?)),
            Action::CallUpdateDistance => Ok(Self::UpdateDistance(decode_payload(payload)?)),
            Action::CallIsPreyAlive => Ok(Self::IsPreyAlive(decode_payload(payload)?)),
            Action::CallIsResourceAlive => Ok(Self::IsResourceAlive(decode_payload(payload)?)),
            Action::ResultEnterArea
            | Action::ResultSpawnResource
            | Action::ResultUpdateDistance
            | Action::ResultIsPreyAlive
            | Action::ResultIsResourceAlive => Err(WireError::UnexpectedAction {
                action: envelope.action,
            }),
        }
    }
}

/// A fully typed reply, one variant per result tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// ID assigned to a registered prey.
    EnterArea(RegisteredId),
    /// ID assigned to a registered resource.
    SpawnResource(RegisteredId),
    /// Whether the distance update found its prey.
    UpdateDistance(Flag),
    /// Whether the prey is still tracked.
    IsPreyAlive(Flag),
    /// Whether the resource is still tracked.
    IsResourceAlive(Flag),
}

impl Response {
    /// The result tag for this response.
    pub const fn action(&self) -> Action {
        match self {
            Self::EnterArea(_) => Action::ResultEnterArea,
            Self::SpawnResource(_) => Action::ResultSpawnResource,
            Self::UpdateDistance(_) => Action::ResultUpdateDistance,
            Self::IsPreyAlive(_) => Action::ResultIsPreyAlive,
            Self::IsResourceAlive(_) => Action::ResultIsResourceAlive,
        }
    }

    /// Encode this response into a wire envelope.
    pub fn encode(&self) -> Result<RpcEnvelope, WireError> {
        let payload = match self {
            Self::EnterArea(id) | Self::SpawnResource(id) => encode_payload(id)?,
            Self::UpdateDistance(flag) | Self::IsPreyAlive(flag) | Self::IsResourceAlive(flag) => {
                encode_payload(flag)?
            }
        };
        Ok(RpcEnvelope {
            action: self.action(),
            payload: Some(payload),
        })
    }

    /// Decode a wire envelope into a typed response.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedAction`] for a call tag on the reply
    /// path, and [`WireError::Decode`] for a missing or malformed payload.
    pub fn decode(envelope: &RpcEnvelope) -> Result<Self, WireError> {
        let payload = required_payload(envelope)?;
        match envelope.action {
            Action::ResultEnterArea => Ok(Self::EnterArea(decode_payload(payload)?)),
            Action::ResultSpawnResource => Ok(Self::SpawnResource(decode_payload(payload)?)),
            Action::ResultUpdateDistance => Ok(Self::UpdateDistance(decode_payload(payload)?)),
            Action::ResultIsPreyAlive => Ok(Self::IsPreyAlive(decode_payload(payload)?)),
            Action::ResultIsResourceAlive => Ok(Self::IsResourceAlive(decode_payload(payload)?)),
            Action::CallEnterArea
            | Action::CallSpawnResource
            | Action::CallUpdateDistance
            | Action::CallIsPreyAlive
            | Action::CallIsResourceAlive => Err(WireError::UnexpectedAction {
                action: envelope.action,
            }),
        }
    }
}

/// Serialize a typed payload into the envelope's opaque string form.
fn encode_payload<T: Serialize>(value: &T) -> Result<String, WireError> {
    serde_json::to_string(value).map_err(|e| WireError::Encode {
        message: format!("failed to serialize payload: {e}"),
    })
}

/// Deserialize a typed payload from the envelope's opaque string form.
fn decode_payload<T: for<'de> Deserialize<'de>>(payload: &str) -> Result<T, WireError> {
    serde_json::from_str(payload).map_err(|e| WireError::Decode {
        message: format!("failed to deserialize payload: {e}"),
    })
}

/// Extract the payload string, rejecting envelopes without one.
fn required_payload(envelope: &RpcEnvelope) -> Result<&str, WireError> {
    envelope.payload.as_deref().ok_or_else(|| WireError::Decode {
        message: format!("action '{}' requires a payload", envelope.action),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_prey() -> PreyDesc {
        PreyDesc {
            name: "Bramble".to_owned(),
            weight: 5,
            distance: 1000,
        }
    }

    #[test]
    fn request_round_trips_through_envelope() {
        let request = Request::EnterArea(sample_prey());
        let envelope = request.encode().unwrap();
        assert_eq!(envelope.action, Action::CallEnterArea);
        let back = Request::decode(&envelope).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn response_round_trips_through_envelope() {
        let response = Response::UpdateDistance(Flag { value: true });
        let envelope = response.encode().unwrap();
        assert_eq!(envelope.action, Action::ResultUpdateDistance);
        let back = Response::decode(&envelope).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn opaque_payload_re_encodes_to_equal_value() {
        // The envelope payload is an opaque string: decoding it and
        // re-encoding must yield a payload that decodes to an equal entity.
        let envelope = Request::SpawnResource(ResourceDesc { x: -3, y: 7, volume: 4 })
            .encode()
            .unwrap();
        let decoded = Request::decode(&envelope).unwrap();
        let re_encoded = decoded.encode().unwrap();
        assert_eq!(Request::decode(&re_encoded).unwrap(), decoded);
    }

    #[test]
    fn result_tag_on_request_path_is_rejected() {
        let envelope = RpcEnvelope {
            action: Action::ResultEnterArea,
            payload: Some("{\"value\":1}".to_owned()),
        };
        assert!(matches!(
            Request::decode(&envelope),
            Err(WireError::UnexpectedAction { .. })
        ));
    }

    #[test]
    fn call_tag_on_reply_path_is_rejected() {
        let envelope = Request::IsPreyAlive(EntityRef { id: EntityId(9) })
            .encode()
            .unwrap();
        assert!(matches!(
            Response::decode(&envelope),
            Err(WireError::UnexpectedAction { .. })
        ));
    }

    #[test]
    fn missing_payload_is_rejected() {
        let envelope = RpcEnvelope {
            action: Action::CallEnterArea,
            payload: None,
        };
        assert!(matches!(
            Request::decode(&envelope),
            Err(WireError::Decode { .. })
        ));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let envelope = RpcEnvelope {
            action: Action::CallUpdateDistance,
            payload: Some("not json".to_owned()),
        };
        assert!(matches!(
            Request::decode(&envelope),
            Err(WireError::Decode { .. })
        ));
    }

    #[test]
    fn empty_prey_name_fails_validation() {
        let request = Request::EnterArea(PreyDesc {
            name: "  ".to_owned(),
            weight: 3,
            distance: 10,
        });
        assert!(matches!(
            request.validate(),
            Err(WireError::Validation { .. })
        ));
    }

    #[test]
    fn zero_volume_resource_fails_validation() {
        let request = Request::SpawnResource(ResourceDesc { x: 0, y: 0, volume: 0 });
        assert!(matches!(
            request.validate(),
            Err(WireError::Validation { .. })
        ));
    }

    #[test]
    fn well_formed_requests_pass_validation() {
        assert!(Request::EnterArea(sample_prey()).validate().is_ok());
        assert!(
            Request::UpdateDistance(DistanceUpdate { id: EntityId(1), distance: 50 })
                .validate()
                .is_ok()
        );
    }
}
