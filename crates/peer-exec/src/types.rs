//! Invocation and response types

use crate::engine::TxSimulator;
use peer_core::{ChannelScope, TxId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Per-invocation execution context carrying the transaction simulator
#[derive(Clone)]
pub struct ExecutionContext {
    tx_id: TxId,
    simulator: Arc<dyn TxSimulator>,
}

impl ExecutionContext {
    /// Context for `tx_id` backed by `simulator`
    pub fn new(tx_id: TxId, simulator: Arc<dyn TxSimulator>) -> Self {
        Self { tx_id, simulator }
    }

    /// Transaction this context simulates
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// The simulator opened for this transaction
    ///
    /// The context does not release it on drop; call
    /// [`TxSimulator::done`] once the transaction is finished.
    pub fn simulator(&self) -> &Arc<dyn TxSimulator> {
        &self.simulator
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("tx_id", &self.tx_id)
            .finish_non_exhaustive()
    }
}

/// Which chaincode an invocation targets, and on whose behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Channel the chaincode runs on
    pub channel: ChannelScope,
    /// Chaincode name
    pub name: String,
    /// Chaincode version
    pub version: String,
    /// Transaction id
    pub tx_id: TxId,
    /// System chaincode
    pub system: bool,
    /// Signed proposal that triggered the invocation, if any
    #[serde(with = "serde_bytes")]
    pub signed_proposal: Option<Vec<u8>>,
    /// Unpacked proposal, if any
    #[serde(with = "serde_bytes")]
    pub proposal: Option<Vec<u8>>,
}

/// Deployment package for a chaincode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeDeploymentSpec {
    /// Chaincode name
    pub name: String,
    /// Chaincode version
    pub version: String,
    /// Packaged code
    #[serde(with = "serde_bytes")]
    pub code_package: Vec<u8>,
}

/// What to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaincodeSpec {
    /// Invoke with arguments
    Invocation {
        /// Invocation arguments
        args: Vec<Vec<u8>>,
    },
    /// Deploy (instantiate or upgrade)
    Deployment(ChaincodeDeploymentSpec),
}

/// Chaincode response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP-like status
    pub status: i32,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl Response {
    /// Success status
    pub const OK: i32 = 200;

    /// Successful response with `payload`
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    /// Failed response
    pub fn error(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Whether the status is [`Response::OK`]
    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// Event emitted by a chaincode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    /// Emitting chaincode
    pub chaincode_id: String,
    /// Transaction id
    pub tx_id: TxId,
    /// Event name
    pub event_name: String,
    /// Event payload
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_200_is_ok() {
        assert!(Response::ok(b"x".to_vec()).is_ok());
        assert!(!Response::error(201, "created").is_ok());
        assert!(!Response::error(500, "boom").is_ok());
    }

    #[test]
    fn error_response_has_empty_payload() {
        let response = Response::error(404, "missing");
        assert!(response.payload.is_empty());
        assert_eq!(response.message, "missing");
    }
}
