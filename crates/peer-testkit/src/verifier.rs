//! Channel-roster signature verifier
//!
//! Grants only when the identity is on the channel's roster and the ed25519
//! signature over the message checks out.

use crate::identity::SerializedIdentity;
use ed25519_dalek::{Signature, VerifyingKey};
use parking_lot::RwLock;
use peer_acl::{AclError, AclResult, Verifier};
use peer_core::ChannelId;
use std::collections::{HashMap, HashSet};

/// Verifier over per-channel identity rosters
#[derive(Debug, Default)]
pub struct RosterVerifier {
    rosters: RwLock<HashMap<ChannelId, HashSet<Vec<u8>>>>,
}

impl RosterVerifier {
    /// Verifier with empty rosters
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit the encoded identity to `channel`
    pub fn admit(&self, channel: &str, identity: Vec<u8>) {
        self.rosters
            .write()
            .entry(crate::channel(channel))
            .or_default()
            .insert(identity);
    }

    /// Remove the encoded identity from `channel`
    pub fn expel(&self, channel: &str, identity: &[u8]) {
        if let Some(roster) = self.rosters.write().get_mut(&crate::channel(channel)) {
            roster.remove(identity);
        }
    }
}

impl Verifier for RosterVerifier {
    fn verify_by_channel(
        &self,
        channel: &ChannelId,
        peer_identity: &[u8],
        signature: &[u8],
        message: &[u8],
    ) -> AclResult {
        if peer_identity.is_empty() {
            return Err(AclError::unauthorized("empty peer identity"));
        }

        let on_roster = self
            .rosters
            .read()
            .get(channel)
            .is_some_and(|roster| roster.contains(peer_identity));
        if !on_roster {
            return Err(AclError::unauthorized(format!(
                "identity is not a member of channel {channel}"
            )));
        }

        let identity = SerializedIdentity::from_bytes(peer_identity)
            .map_err(|e| AclError::unauthorized(e.to_string()))?;
        let key_bytes: [u8; 32] = identity
            .id_bytes
            .as_slice()
            .try_into()
            .map_err(|_| AclError::unauthorized("public key must be 32 bytes"))?;
        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| AclError::unauthorized(format!("bad public key: {e}")))?;
        let signature = Signature::from_slice(signature)
            .map_err(|e| AclError::unauthorized(format!("bad signature encoding: {e}")))?;

        key.verify_strict(message, &signature)
            .map_err(|e| AclError::unauthorized(format!("signature verification failed: {e}")))
    }
}
