//! The wire envelope and the action tag vocabulary.
//!
//! Every message on the broker is one JSON-encoded [`RpcEnvelope`]: an
//! [`Action`] tag plus an opaquely encoded payload string. The payload is
//! decoded only by the layer that owns its type; transport and dispatch
//! never look inside it.
//!
//! [`Action`] is a closed enum rather than a free-form string: a message
//! whose tag is not in the vocabulary fails to deserialize and is dropped
//! by the receiving loop, so an unmatched tag can never be silently routed.

use serde::{Deserialize, Serialize};

/// The closed vocabulary of call and result tags.
///
/// Call tags travel on the well-known request subject; result tags travel
/// back on the caller's reply subject. The wire spelling (`Call_EnterArea`,
/// `Result_EnterArea`, ...) is fixed by the serde renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Register a prey entity in the predator's area.
    #[serde(rename = "Call_EnterArea")]
    CallEnterArea,
    /// Reply to [`Action::CallEnterArea`].
    #[serde(rename = "Result_EnterArea")]
    ResultEnterArea,
    /// Register a resource entity near the predator.
    #[serde(rename = "Call_SpawnResource")]
    CallSpawnResource,
    /// Reply to [`Action::CallSpawnResource`].
    #[serde(rename = "Result_SpawnResource")]
    ResultSpawnResource,
    /// Update a tracked prey's distance to the predator.
    #[serde(rename = "Call_UpdateDistance")]
    CallUpdateDistance,
    /// Reply to [`Action::CallUpdateDistance`].
    #[serde(rename = "Result_UpdateDistance")]
    ResultUpdateDistance,
    /// Ask whether a prey entity is still tracked.
    #[serde(rename = "Call_IsPreyAlive")]
    CallIsPreyAlive,
    /// Reply to [`Action::CallIsPreyAlive`].
    #[serde(rename = "Result_IsPreyAlive")]
    ResultIsPreyAlive,
    /// Ask whether a resource entity is still tracked.
    #[serde(rename = "Call_IsResourceAlive")]
    CallIsResourceAlive,
    /// Reply to [`Action::CallIsResourceAlive`].
    #[serde(rename = "Result_IsResourceAlive")]
    ResultIsResourceAlive,
}

impl Action {
    /// The wire spelling of this tag.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::CallEnterArea => "Call_EnterArea",
            Self::ResultEnterArea => "Result_EnterArea",
            Self::CallSpawnResource => "Call_SpawnResource",
            Self::ResultSpawnResource => "Result_SpawnResource",
            Self::CallUpdateDistance => "Call_UpdateDistance",
            Self::ResultUpdateDistance => "Result_UpdateDistance",
            Self::CallIsPreyAlive => "Call_IsPreyAlive",
            Self::ResultIsPreyAlive => "Result_IsPreyAlive",
            Self::CallIsResourceAlive => "Call_IsResourceAlive",
            Self::ResultIsResourceAlive => "Result_IsResourceAlive",
        }
    }

    /// Whether this tag is a call (as opposed to a result).
    pub const fn is_call(self) -> bool {
        matches!(
            self,
            Self::CallEnterArea
                | Self::CallSpawnResource
                | Self::CallUpdateDistance
                | Self::CallIsPreyAlive
                | Self::CallIsResourceAlive
        )
    }

    /// The result tag a caller should expect for this call tag.
    ///
    /// Returns `None` for result tags, which have no counterpart.
    pub const fn result_tag(self) -> Option<Self> {
        match self {
            Self::CallEnterArea => Some(Self::ResultEnterArea),
            Self::CallSpawnResource => Some(Self::ResultSpawnResource),
            Self::CallUpdateDistance => Some(Self::ResultUpdateDistance),
            Self::CallIsPreyAlive => Some(Self::ResultIsPreyAlive),
            Self::CallIsResourceAlive => Some(Self::ResultIsResourceAlive),
            Self::ResultEnterArea
            | Self::ResultSpawnResource
            | Self::ResultUpdateDistance
            | Self::ResultIsPreyAlive
            | Self::ResultIsResourceAlive => None,
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One message on the wire: an action tag and an opaque payload.
///
/// The payload is itself a JSON-encoded string; its concrete type is
/// determined by the action tag and decoded by [`Request`] / [`Response`].
///
/// [`Request`]: crate::messages::Request
/// [`Response`]: crate::messages::Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEnvelope {
    /// The action tag naming the operation or its result.
    pub action: Action,
    /// Opaquely encoded application payload, if any.
    pub payload: Option<String>,
}

impl RpcEnvelope {
    /// Serialize the envelope for publishing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(|e| WireError::Encode {
            message: format!("failed to serialize envelope: {e}"),
        })
    }

    /// Deserialize an envelope from a received message body.
    ///
    /// Fails for malformed JSON and for action tags outside the vocabulary;
    /// receiving loops log and drop such messages.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(|e| WireError::Decode {
            message: format!("failed to deserialize envelope: {e}"),
        })
    }
}

/// Errors produced while encoding, decoding, or validating wire payloads.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A payload or envelope could not be serialized.
    #[error("encode error: {message}")]
    Encode {
        /// Description of the serialization failure.
        message: String,
    },

    /// A payload or envelope could not be deserialized.
    #[error("decode error: {message}")]
    Decode {
        /// Description of the deserialization failure.
        message: String,
    },

    /// A request failed validation before any network activity.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the invalid field.
        message: String,
    },

    /// An action tag arrived where it does not belong (a result tag on the
    /// request subject, or vice versa).
    #[error("unexpected action tag '{action}'")]
    UnexpectedAction {
        /// The offending tag.
        action: Action,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_to_wire_vocabulary() {
        let json = serde_json::to_string(&Action::CallEnterArea).unwrap();
        assert_eq!(json, "\"Call_EnterArea\"");
        let json = serde_json::to_string(&Action::ResultIsResourceAlive).unwrap();
        assert_eq!(json, "\"Result_IsResourceAlive\"");
    }

    #[test]
    fn unknown_action_tag_is_rejected() {
        let result: Result<Action, _> = serde_json::from_str("\"Call_Unknown\"");
        assert!(result.is_err());
    }

    #[test]
    fn every_call_tag_has_a_result_tag() {
        let calls = [
            Action::CallEnterArea,
            Action::CallSpawnResource,
            Action::CallUpdateDistance,
            Action::CallIsPreyAlive,
            Action::CallIsResourceAlive,
        ];
        for call in calls {
            assert!(call.is_call());
            let result = call.result_tag().unwrap();
            assert!(!result.is_call());
            assert!(result.result_tag().is_none());
        }
    }

    #[test]
    fn envelope_round_trips() {
        let envelope = RpcEnvelope {
            action: Action::CallUpdateDistance,
            payload: Some("{\"id\":7,\"distance\":12}".to_owned()),
        };
        let bytes = envelope.to_bytes().unwrap();
        let back = RpcEnvelope::from_bytes(&bytes).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn envelope_with_unknown_tag_fails_to_decode() {
        let raw = br#"{"action":"Call_Unknown","payload":null}"#;
        assert!(RpcEnvelope::from_bytes(raw).is_err());
    }

    #[test]
    fn envelope_without_payload_round_trips() {
        let envelope = RpcEnvelope {
            action: Action::CallIsPreyAlive,
            payload: None,
        };
        let bytes = envelope.to_bytes().unwrap();
        assert_eq!(RpcEnvelope::from_bytes(&bytes).unwrap(), envelope);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Action::CallSpawnResource.to_string(), "Call_SpawnResource");
    }
}
