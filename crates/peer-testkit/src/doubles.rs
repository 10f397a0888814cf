//! Scripted doubles that record every call

use parking_lot::Mutex;
use peer_acl::{AclError, AclResult, Evaluator, SignedAssertion, Verifier};
use peer_core::ChannelId;

/// Arguments of one `verify_by_channel` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCall {
    /// Channel passed in
    pub channel: ChannelId,
    /// Claimed peer identity
    pub peer_identity: Vec<u8>,
    /// Signature bytes
    pub signature: Vec<u8>,
    /// Signed message
    pub message: Vec<u8>,
}

/// Verifier returning a fixed verdict
#[derive(Debug)]
pub struct ScriptedVerifier {
    verdict: Mutex<AclResult>,
    calls: Mutex<Vec<VerifyCall>>,
}

impl ScriptedVerifier {
    /// Verifier returning `verdict` for every call
    pub fn new(verdict: AclResult) -> Self {
        Self {
            verdict: Mutex::new(verdict),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Verifier granting everything
    pub fn accept_all() -> Self {
        Self::new(Ok(()))
    }

    /// Verifier refusing everything with `reason`
    pub fn reject_all(reason: &str) -> Self {
        Self::new(Err(AclError::unauthorized(reason)))
    }

    /// Change the verdict for later calls
    pub fn set_verdict(&self, verdict: AclResult) {
        *self.verdict.lock() = verdict;
    }

    /// Calls seen so far
    pub fn calls(&self) -> Vec<VerifyCall> {
        self.calls.lock().clone()
    }
}

impl Verifier for ScriptedVerifier {
    fn verify_by_channel(
        &self,
        channel: &ChannelId,
        peer_identity: &[u8],
        signature: &[u8],
        message: &[u8],
    ) -> AclResult {
        self.calls.lock().push(VerifyCall {
            channel: channel.clone(),
            peer_identity: peer_identity.to_vec(),
            signature: signature.to_vec(),
            message: message.to_vec(),
        });
        self.verdict.lock().clone()
    }
}

/// Evaluator returning a fixed verdict
#[derive(Debug)]
pub struct RecordingEvaluator {
    verdict: Mutex<AclResult>,
    calls: Mutex<Vec<Vec<SignedAssertion>>>,
}

impl RecordingEvaluator {
    /// Evaluator returning `verdict` for every call
    pub fn new(verdict: AclResult) -> Self {
        Self {
            verdict: Mutex::new(verdict),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Evaluator granting everything
    pub fn accept_all() -> Self {
        Self::new(Ok(()))
    }

    /// Evaluator refusing everything with `reason`
    pub fn reject_all(reason: &str) -> Self {
        Self::new(Err(AclError::unauthorized(reason)))
    }

    /// Signature sets seen so far
    pub fn calls(&self) -> Vec<Vec<SignedAssertion>> {
        self.calls.lock().clone()
    }
}

impl Evaluator for RecordingEvaluator {
    fn evaluate(&self, signature_set: &[SignedAssertion]) -> AclResult {
        self.calls.lock().push(signature_set.to_vec());
        self.verdict.lock().clone()
    }
}
