//! Execution errors

use peer_core::PeerError;

/// Failure while preparing or running an invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The ledger could not provide a transaction simulator
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The engine failed to run the invocation
    #[error("Engine error: {0}")]
    Engine(String),

    /// The chaincode ran but answered with a non-success status
    #[error("Chaincode returned status {status}: {message}")]
    Chaincode {
        /// Response status
        status: i32,
        /// Response message
        message: String,
    },
}

impl ExecutionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutionError::Ledger(_) => "ledger",
            ExecutionError::Engine(_) => "engine",
            ExecutionError::Chaincode { .. } => "chaincode",
        }
    }
}

impl From<ExecutionError> for PeerError {
    fn from(err: ExecutionError) -> Self {
        PeerError::internal(err.to_string())
    }
}
