//! The RPC error taxonomy.
//!
//! Transport failures are fatal to the whole component instance: the
//! calling process is expected to discard its object graph and rebuild.
//! Protocol-level trouble (unknown tags, malformed payloads on receive
//! loops) is never an error value at all -- those messages are logged and
//! dropped where they arrive.

use veldt_types::WireError;

/// Errors surfaced by the RPC client and dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The request was malformed; raised before any network activity.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the invalid field.
        message: String,
    },

    /// The broker connection, a publish, or a subscription failed.
    /// Expected to trigger a full teardown/rebuild by the caller.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// No matching reply arrived within the configured window.
    #[error("call timed out after {waited_ms} ms")]
    Timeout {
        /// How long the caller waited, in milliseconds.
        waited_ms: u64,
    },

    /// A payload or envelope could not be serialized.
    #[error("encode error: {message}")]
    Encode {
        /// Description of the serialization failure.
        message: String,
    },

    /// A reply payload could not be deserialized or carried the wrong
    /// result variant.
    #[error("decode error: {message}")]
    Decode {
        /// Description of the deserialization failure.
        message: String,
    },
}

impl From<WireError> for RpcError {
    fn from(error: WireError) -> Self {
        match error {
            WireError::Validation { message } => Self::Validation { message },
            WireError::Encode { message } => Self::Encode { message },
            WireError::Decode { message } => Self::Decode { message },
            WireError::UnexpectedAction { action } => Self::Decode {
                message: format!("unexpected action tag '{action}'"),
            },
        }
    }
}
