//! Signed assertions and principals
//!
//! Both are carried as opaque bytes. The support never looks inside them; it
//! only hands them to the verifier, evaluator or identity that does.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An `(identity, signature, message)` triple presented as proof of authorization
///
/// `signature` is expected to cover exactly `message` under the key bound to
/// `identity`. Checking that is the verifier's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedAssertion {
    /// Serialized identity of the claimed principal
    #[serde(with = "serde_bytes")]
    pub identity: Vec<u8>,
    /// Signature over `message`
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
    /// The bytes that were signed
    #[serde(with = "serde_bytes")]
    pub message: Vec<u8>,
}

impl SignedAssertion {
    /// Create an assertion from its three parts
    pub fn new(
        identity: impl Into<Vec<u8>>,
        signature: impl Into<Vec<u8>>,
        message: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            identity: identity.into(),
            signature: signature.into(),
            message: message.into(),
        }
    }

    /// SHA-256 over the length-prefixed fields
    ///
    /// Length prefixes keep `("ab", "c")` and `("a", "bc")` apart.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for field in [&self.identity, &self.signature, &self.message] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field);
        }
        hasher.finalize().into()
    }
}

/// Kind of policy a [`Principal`] expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalClassification {
    /// Membership role within an organization (member, admin, peer, client)
    Role,
    /// Organizational unit within an organization
    OrganizationUnit,
    /// One specific identity
    Identity,
    /// Anonymous or nominal credential
    Anonymity,
    /// Combination of other principals
    Combined,
}

/// Opaque policy descriptor an identity may or may not satisfy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// How `principal` is to be read by the identity
    pub classification: PrincipalClassification,
    /// Encoded principal; interpreted only by identities
    #[serde(with = "serde_bytes")]
    pub principal: Vec<u8>,
}

impl Principal {
    /// Create a principal
    pub fn new(classification: PrincipalClassification, principal: impl Into<Vec<u8>>) -> Self {
        Self {
            classification,
            principal: principal.into(),
        }
    }
}
