//! Error types for the producer binaries.

use veldt_rpc::RpcError;

/// Errors that can occur during producer operation.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// A call, subscription, or the connection itself failed.
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),
}
