//! Deterministic ed25519 signers

use crate::identity::SerializedIdentity;
use ed25519_dalek::{Signer, SigningKey};
use peer_acl::SignedAssertion;

/// Signer whose key is derived from a one-byte seed
#[derive(Debug, Clone)]
pub struct TestSigner {
    msp_id: String,
    signing_key: SigningKey,
}

impl TestSigner {
    /// Deterministic signer for `msp_id`
    pub fn from_seed(seed: u8, msp_id: &str) -> Self {
        Self {
            msp_id: msp_id.to_string(),
            signing_key: SigningKey::from_bytes(&[seed; 32]),
        }
    }

    /// Identity this signer presents
    pub fn identity(&self) -> SerializedIdentity {
        SerializedIdentity {
            msp_id: self.msp_id.clone(),
            id_bytes: self.signing_key.verifying_key().to_bytes().to_vec(),
        }
    }

    /// Encoded identity bytes
    pub fn identity_bytes(&self) -> Vec<u8> {
        self.identity().to_bytes()
    }

    /// Sign `message` and package the result as an assertion
    pub fn sign(&self, message: &[u8]) -> SignedAssertion {
        let signature = self.signing_key.sign(message);
        SignedAssertion::new(
            self.identity_bytes(),
            signature.to_bytes().to_vec(),
            message.to_vec(),
        )
    }
}
