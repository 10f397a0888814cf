//! Access-control support
//!
//! Dispatches authorization questions to the injected capabilities. The
//! support holds no mutable state; every answer is computed from the channel
//! configuration current at the time of the call.

use crate::assertion::{Principal, SignedAssertion};
use crate::capabilities::{ChannelConfigGetter, Evaluator, Verifier};
use crate::errors::{AclError, AclResult};
use peer_core::{ChannelId, ChannelScope};
use std::fmt;
use std::sync::Arc;

const ELIGIBLE_FOR_SERVICE: &str = "eligible_for_service";
const CONFIG_SEQUENCE: &str = "config_sequence";
const SATISFIES_PRINCIPAL: &str = "satisfies_principal";

/// Authorization questions a service asks on behalf of its callers
pub trait AccessControl: Send + Sync {
    /// Whether the signer of `assertion` may receive service in `scope`
    ///
    /// Node-wide requests are evaluated against local policy; channel
    /// requests are verified against the channel's membership. The
    /// collaborator's verdict is returned unchanged.
    fn eligible_for_service(&self, scope: &ChannelScope, assertion: &SignedAssertion)
        -> AclResult;

    /// Configuration sequence of `scope`, reporting missing configuration
    ///
    /// [`ChannelScope::NoChannel`] always has sequence 0.
    fn try_config_sequence(&self, scope: &ChannelScope) -> AclResult<u64>;

    /// Whether `raw_identity`, read through `channel`'s membership manager,
    /// satisfies `principal`
    fn satisfies_principal(
        &self,
        channel: &ChannelId,
        raw_identity: &[u8],
        principal: &Principal,
    ) -> AclResult;

    /// Configuration sequence of `scope`
    ///
    /// Callers use the value as a cache-invalidation token: a different
    /// sequence for the same channel means membership or policies may have
    /// changed.
    ///
    /// # Panics
    ///
    /// Panics if `scope` names a channel with no configuration or no config
    /// validator. Use [`AccessControl::try_config_sequence`] for channels that
    /// may not exist.
    fn config_sequence(&self, scope: &ChannelScope) -> u64 {
        match self.try_config_sequence(scope) {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::error!(
                    channel = %scope,
                    error = %err,
                    "Channel configuration invariant violated"
                );
                panic!("{err}");
            }
        }
    }
}

/// Access-control support built from injected capabilities
pub struct AccessControlSupport {
    config_getter: Arc<dyn ChannelConfigGetter>,
    verifier: Arc<dyn Verifier>,
    evaluator: Arc<dyn Evaluator>,
}

impl AccessControlSupport {
    /// Create a new support from its three capabilities
    pub fn new(
        verifier: Arc<dyn Verifier>,
        evaluator: Arc<dyn Evaluator>,
        config_getter: Arc<dyn ChannelConfigGetter>,
    ) -> Self {
        Self {
            config_getter,
            verifier,
            evaluator,
        }
    }
}

impl fmt::Debug for AccessControlSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControlSupport").finish_non_exhaustive()
    }
}

impl AccessControl for AccessControlSupport {
    fn eligible_for_service(
        &self,
        scope: &ChannelScope,
        assertion: &SignedAssertion,
    ) -> AclResult {
        let result = match scope {
            ChannelScope::NoChannel => self.evaluator.evaluate(std::slice::from_ref(assertion)),
            ChannelScope::Channel(channel) => self.verifier.verify_by_channel(
                channel,
                &assertion.identity,
                &assertion.signature,
                &assertion.message,
            ),
        };

        match &result {
            Ok(()) => tracing::debug!(
                operation = ELIGIBLE_FOR_SERVICE,
                channel = %scope,
                "Assertion accepted"
            ),
            Err(err) => tracing::debug!(
                operation = ELIGIBLE_FOR_SERVICE,
                channel = %scope,
                error = %err,
                "Assertion rejected"
            ),
        }
        result
    }

    fn try_config_sequence(&self, scope: &ChannelScope) -> AclResult<u64> {
        let channel = match scope {
            ChannelScope::NoChannel => return Ok(0),
            ChannelScope::Channel(channel) => channel,
        };

        let resources = self.config_getter.channel_config(channel).ok_or_else(|| {
            AclError::ChannelNotFound {
                operation: CONFIG_SEQUENCE,
                channel: channel.clone(),
            }
        })?;
        let validator =
            resources
                .config_validator()
                .ok_or_else(|| AclError::ConfigValidatorMissing {
                    operation: CONFIG_SEQUENCE,
                    channel: channel.clone(),
                })?;

        Ok(validator.sequence())
    }

    fn satisfies_principal(
        &self,
        channel: &ChannelId,
        raw_identity: &[u8],
        principal: &Principal,
    ) -> AclResult {
        let resources = self.config_getter.channel_config(channel).ok_or_else(|| {
            tracing::warn!(operation = SATISFIES_PRINCIPAL, channel = %channel, "Unknown channel");
            AclError::ChannelNotFound {
                operation: SATISFIES_PRINCIPAL,
                channel: channel.clone(),
            }
        })?;

        let msp_manager = resources.membership_manager().ok_or_else(|| {
            tracing::warn!(
                operation = SATISFIES_PRINCIPAL,
                channel = %channel,
                "Channel has no MSP manager"
            );
            AclError::MembershipManagerMissing {
                operation: SATISFIES_PRINCIPAL,
                channel: channel.clone(),
            }
        })?;

        let identity = msp_manager
            .deserialize_identity(raw_identity)
            .map_err(|source| {
                tracing::warn!(
                    operation = SATISFIES_PRINCIPAL,
                    channel = %channel,
                    error = %source,
                    "Failed deserializing identity"
                );
                AclError::MalformedIdentity {
                    operation: SATISFIES_PRINCIPAL,
                    channel: channel.clone(),
                    source,
                }
            })?;

        identity.satisfies_principal(principal)
    }
}

impl<A: AccessControl + ?Sized> AccessControl for Arc<A> {
    fn eligible_for_service(
        &self,
        scope: &ChannelScope,
        assertion: &SignedAssertion,
    ) -> AclResult {
        (**self).eligible_for_service(scope, assertion)
    }

    fn try_config_sequence(&self, scope: &ChannelScope) -> AclResult<u64> {
        (**self).try_config_sequence(scope)
    }

    fn satisfies_principal(
        &self,
        channel: &ChannelId,
        raw_identity: &[u8],
        principal: &Principal,
    ) -> AclResult {
        (**self).satisfies_principal(channel, raw_identity, principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{ChannelConfigResources, ConfigValidator, MembershipManager};

    struct Rejecting;

    impl Verifier for Rejecting {
        fn verify_by_channel(&self, _: &ChannelId, _: &[u8], _: &[u8], _: &[u8]) -> AclResult {
            Err(AclError::unauthorized("verifier"))
        }
    }

    impl Evaluator for Rejecting {
        fn evaluate(&self, _: &[SignedAssertion]) -> AclResult {
            Err(AclError::unauthorized("evaluator"))
        }
    }

    struct Bare;

    impl ChannelConfigResources for Bare {
        fn config_validator(&self) -> Option<&dyn ConfigValidator> {
            None
        }

        fn membership_manager(&self) -> Option<&dyn MembershipManager> {
            None
        }
    }

    fn support() -> AccessControlSupport {
        let configs = |channel: &ChannelId| -> Option<Arc<dyn ChannelConfigResources>> {
            (channel.as_str() == "bare").then(|| Arc::new(Bare) as Arc<dyn ChannelConfigResources>)
        };
        AccessControlSupport::new(Arc::new(Rejecting), Arc::new(Rejecting), Arc::new(configs))
    }

    fn assertion() -> SignedAssertion {
        SignedAssertion::new(b"id".to_vec(), b"sig".to_vec(), b"msg".to_vec())
    }

    #[test]
    fn no_channel_goes_to_evaluator() {
        let err = support()
            .eligible_for_service(&ChannelScope::NoChannel, &assertion())
            .unwrap_err();
        assert_eq!(err, AclError::unauthorized("evaluator"));
    }

    #[test]
    fn named_channel_goes_to_verifier() {
        let scope = ChannelScope::from_wire("mychannel");
        let err = support().eligible_for_service(&scope, &assertion()).unwrap_err();
        assert_eq!(err, AclError::unauthorized("verifier"));
    }

    #[test]
    fn no_channel_sequence_is_zero() {
        assert_eq!(support().config_sequence(&ChannelScope::NoChannel), 0);
    }

    #[test]
    fn missing_validator_is_reported() {
        let scope = ChannelScope::from_wire("bare");
        assert!(matches!(
            support().try_config_sequence(&scope),
            Err(AclError::ConfigValidatorMissing { operation: "config_sequence", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "doesn't exist")]
    fn unknown_channel_sequence_halts() {
        support().config_sequence(&ChannelScope::from_wire("ghost"));
    }

    #[test]
    fn missing_msp_manager_is_reported() {
        let channel = ChannelId::new("bare").unwrap();
        let principal = Principal::new(crate::PrincipalClassification::Role, Vec::new());
        assert!(matches!(
            support().satisfies_principal(&channel, b"raw", &principal),
            Err(AclError::MembershipManagerMissing { .. })
        ));
    }
}
