//! Execution delegate
//!
//! Thin front for an [`ExecutionEngine`]. Context construction opens a
//! simulator on the ledger; every other call goes straight to the engine and
//! its result comes back untouched, except for
//! [`ExecutionDelegate::execute_with_error_filter`] which turns non-success
//! responses into errors.

use crate::engine::{ExecutionEngine, PeerLedger};
use crate::errors::ExecutionError;
use crate::types::{
    ChaincodeDeploymentSpec, ChaincodeEvent, ChaincodeSpec, ExecutionContext, InvocationContext,
    Response,
};
use peer_core::{ChannelScope, TxId};
use std::fmt;
use std::sync::Arc;

/// Forwards execution requests to a shared engine
pub struct ExecutionDelegate<E: ?Sized> {
    engine: Arc<E>,
}

impl<E: ?Sized> Clone for ExecutionDelegate<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: ?Sized> fmt::Debug for ExecutionDelegate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionDelegate").finish_non_exhaustive()
    }
}

impl<E: ExecutionEngine + ?Sized> ExecutionDelegate<E> {
    /// Delegate backed by `engine`
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// The wrapped engine
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Open a simulator for `tx_id` and wrap it in an execution context.
    ///
    /// A ledger failure is returned as is.
    pub fn context(
        &self,
        ledger: &dyn PeerLedger,
        tx_id: &TxId,
    ) -> Result<ExecutionContext, ExecutionError> {
        let simulator = ledger.new_tx_simulator(tx_id).map_err(|err| {
            tracing::debug!(tx_id = %tx_id, error = %err, "Failed to open tx simulator");
            err
        })?;
        Ok(ExecutionContext::new(tx_id.clone(), simulator))
    }

    /// Describe the chaincode being invoked
    pub fn invocation_context(
        &self,
        channel: ChannelScope,
        name: impl Into<String>,
        version: impl Into<String>,
        tx_id: TxId,
        system: bool,
        signed_proposal: Option<Vec<u8>>,
        proposal: Option<Vec<u8>>,
    ) -> InvocationContext {
        InvocationContext {
            channel,
            name: name.into(),
            version: version.into(),
            tx_id,
            system,
            signed_proposal,
            proposal,
        }
    }

    /// Run the chaincode with raw arguments
    pub async fn execute_chaincode(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        args: &[Vec<u8>],
    ) -> Result<(Response, Option<ChaincodeEvent>), ExecutionError> {
        tracing::debug!(
            chaincode = %invocation.name,
            channel = %invocation.channel,
            tx_id = %ctx.tx_id(),
            "Executing chaincode"
        );
        self.engine.execute_chaincode(ctx, invocation, args).await
    }

    /// Run an invocation or deployment spec
    pub async fn execute(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        spec: &ChaincodeSpec,
    ) -> Result<(Response, Option<ChaincodeEvent>), ExecutionError> {
        tracing::debug!(
            chaincode = %invocation.name,
            channel = %invocation.channel,
            tx_id = %ctx.tx_id(),
            "Executing chaincode spec"
        );
        self.engine.execute_spec(ctx, invocation, spec).await
    }

    /// Run a spec and keep only the payload, failing on any non-success
    /// status
    pub async fn execute_with_error_filter(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        spec: &ChaincodeSpec,
    ) -> Result<(Vec<u8>, Option<ChaincodeEvent>), ExecutionError> {
        let (response, event) = self.execute(ctx, invocation, spec).await?;
        if !response.is_ok() {
            tracing::debug!(
                chaincode = %invocation.name,
                status = response.status,
                "Chaincode returned error status"
            );
            return Err(ExecutionError::Chaincode {
                status: response.status,
                message: response.message,
            });
        }
        Ok((response.payload, event))
    }

    /// Stop a running chaincode
    pub async fn stop(
        &self,
        ctx: &ExecutionContext,
        invocation: &InvocationContext,
        deployment: &ChaincodeDeploymentSpec,
    ) -> Result<(), ExecutionError> {
        tracing::debug!(
            chaincode = %deployment.name,
            version = %deployment.version,
            "Stopping chaincode"
        );
        self.engine.stop(ctx, invocation, deployment).await
    }
}
