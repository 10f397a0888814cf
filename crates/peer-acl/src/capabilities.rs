//! Capabilities consumed by the access-control support
//!
//! Each trait is the narrowest view of an outside subsystem the support
//! needs. Implementations must tolerate concurrent calls.

use crate::assertion::{Principal, SignedAssertion};
use crate::errors::{AclResult, IdentityError};
use peer_core::ChannelId;
use std::sync::Arc;

/// Retrieves the configuration resources of a channel
pub trait ChannelConfigGetter: Send + Sync {
    /// Current configuration snapshot, or `None` if the channel is unknown
    fn channel_config(&self, channel: &ChannelId) -> Option<Arc<dyn ChannelConfigResources>>;
}

impl<F> ChannelConfigGetter for F
where
    F: Fn(&ChannelId) -> Option<Arc<dyn ChannelConfigResources>> + Send + Sync,
{
    fn channel_config(&self, channel: &ChannelId) -> Option<Arc<dyn ChannelConfigResources>> {
        self(channel)
    }
}

/// Read-only snapshot of one channel's configuration
pub trait ChannelConfigResources: Send + Sync {
    /// Config transaction validator, if present
    fn config_validator(&self) -> Option<&dyn ConfigValidator>;

    /// Membership service provider manager, if present
    fn membership_manager(&self) -> Option<&dyn MembershipManager>;
}

/// Tracks the channel's configuration sequence
pub trait ConfigValidator: Send + Sync {
    /// Sequence number, bumped on every configuration change. Never decreases.
    fn sequence(&self) -> u64;
}

/// Turns serialized identities into structured ones
pub trait MembershipManager: Send + Sync {
    /// Deserialize raw identity bytes
    fn deserialize_identity(&self, raw: &[u8]) -> Result<Box<dyn Identity>, IdentityError>;
}

/// A deserialized identity
pub trait Identity: Send + Sync {
    /// `Ok(())` if this identity satisfies `principal`
    fn satisfies_principal(&self, principal: &Principal) -> AclResult;
}

/// Verifies signatures in the context of a channel
pub trait Verifier: Send + Sync {
    /// Check that `signature` is a valid signature of `message` by
    /// `peer_identity`, and that the identity belongs to `channel`.
    /// An empty identity fails verification.
    fn verify_by_channel(
        &self,
        channel: &ChannelId,
        peer_identity: &[u8],
        signature: &[u8],
        message: &[u8],
    ) -> AclResult;
}

/// Evaluates signature sets against the node-local policy
pub trait Evaluator: Send + Sync {
    /// `Ok(())` if the set of signed assertions satisfies the policy
    fn evaluate(&self, signature_set: &[SignedAssertion]) -> AclResult;
}
