//! Error types for the ecosystem service binary.
//!
//! [`ServiceError`] is the top-level error type that wraps all possible
//! failure modes during service startup and operation.

/// Top-level error for the ecosystem service binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Broker connection or messaging failed.
    #[error("rpc error: {source}")]
    Rpc {
        /// The underlying transport error.
        #[from]
        source: veldt_rpc::RpcError,
    },
}
