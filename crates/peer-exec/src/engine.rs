//! Engine and ledger interfaces the delegate consumes

use crate::errors::ExecutionError;
use crate::types::{
    ChaincodeDeploymentSpec, ChaincodeEvent, ChaincodeSpec, ExecutionContext, InvocationContext,
    Response,
};
use async_trait::async_trait;
use peer_core::TxId;
use std::sync::Arc;

/// Transaction simulator over a ledger snapshot
///
/// The delegate only opens simulators; the engine reads and writes through
/// them. Whoever finishes with the transaction calls [`TxSimulator::done`]
/// on the handle from [`ExecutionContext::simulator`] to release the
/// snapshot.
pub trait TxSimulator: Send + Sync {
    /// Read a key as of the snapshot plus this transaction's own writes
    fn get_state(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, ExecutionError>;

    /// Buffer a write
    fn set_state(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<(), ExecutionError>;

    /// Release the snapshot. Later reads and writes may fail.
    fn done(&self);
}

/// Ledger able to open transaction simulators
pub trait PeerLedger: Send + Sync {
    /// Open a simulator for `tx_id`
    fn new_tx_simulator(&self, tx_id: &TxId) -> Result<Arc<dyn TxSimulator>, ExecutionError>;
}

/// Long-lived engine that runs chaincode
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Run the chaincode with raw arguments
    async fn execute_chaincode(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        args: &[Vec<u8>],
    ) -> Result<(Response, Option<ChaincodeEvent>), ExecutionError>;

    /// Run an invocation or deployment spec
    async fn execute_spec(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        spec: &ChaincodeSpec,
    ) -> Result<(Response, Option<ChaincodeEvent>), ExecutionError>;

    /// Stop a running chaincode
    async fn stop(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        deployment: &ChaincodeDeploymentSpec,
    ) -> Result<(), ExecutionError>;
}
