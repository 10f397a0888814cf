//! Peer Exec - execution delegate
//!
//! Wraps a long-lived [`ExecutionEngine`]. The delegate builds the
//! per-invocation context around a fresh transaction simulator and forwards
//! execute and stop calls to the engine without interpreting them.

#![forbid(unsafe_code)]

pub mod delegate;
pub mod engine;
pub mod errors;
pub mod types;

pub use delegate::ExecutionDelegate;
pub use engine::{ExecutionEngine, PeerLedger, TxSimulator};
pub use errors::ExecutionError;
pub use types::{
    ChaincodeDeploymentSpec, ChaincodeEvent, ChaincodeSpec, ExecutionContext, InvocationContext,
    Response,
};
