//! Access-control errors
//!
//! `Unauthorized` and `PrincipalNotSatisfied` are produced by the injected
//! verifier, evaluator and identities and travel through the support
//! unchanged. The remaining variants are raised by the support itself and
//! always name the operation and channel involved.

use peer_core::{ChannelId, PeerError};

/// Result alias for access-control decisions; `Ok(())` means granted
pub type AclResult<T = ()> = std::result::Result<T, AclError>;

/// Access-control failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// Signature or policy evaluation rejected the assertion
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why the verifier or evaluator refused
        reason: String,
    },

    /// The channel has no retrievable configuration
    #[error("{operation}: channel {channel} doesn't exist")]
    ChannelNotFound {
        /// Operation that looked the channel up
        operation: &'static str,
        /// Channel that was asked about
        channel: ChannelId,
    },

    /// The channel configuration carries no config validator
    #[error("{operation}: config validator for channel {channel} is missing")]
    ConfigValidatorMissing {
        /// Operation that needed the validator
        operation: &'static str,
        /// Channel whose configuration is incomplete
        channel: ChannelId,
    },

    /// The channel configuration carries no membership manager
    #[error("{operation}: could not find MSP manager for channel {channel}")]
    MembershipManagerMissing {
        /// Operation that needed the membership manager
        operation: &'static str,
        /// Channel whose configuration is incomplete
        channel: ChannelId,
    },

    /// Raw identity bytes could not be deserialized
    #[error("{operation}: failed deserializing identity on channel {channel}: {source}")]
    MalformedIdentity {
        /// Operation that attempted the deserialization
        operation: &'static str,
        /// Channel whose membership manager rejected the bytes
        channel: ChannelId,
        /// Underlying deserialization failure
        #[source]
        source: IdentityError,
    },

    /// The identity does not meet the principal
    #[error("Principal not satisfied: {reason}")]
    PrincipalNotSatisfied {
        /// Why the identity falls short
        reason: String,
    },
}

impl AclError {
    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create a principal-not-satisfied error
    pub fn principal_not_satisfied(reason: impl Into<String>) -> Self {
        Self::PrincipalNotSatisfied {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AclError::Unauthorized { .. } => "unauthorized",
            AclError::ChannelNotFound { .. } => "channel_not_found",
            AclError::ConfigValidatorMissing { .. } => "config_validator_missing",
            AclError::MembershipManagerMissing { .. } => "membership_manager_missing",
            AclError::MalformedIdentity { .. } => "malformed_identity",
            AclError::PrincipalNotSatisfied { .. } => "principal_not_satisfied",
        }
    }
}

impl From<AclError> for PeerError {
    fn from(err: AclError) -> Self {
        match &err {
            AclError::Unauthorized { .. } | AclError::PrincipalNotSatisfied { .. } => {
                PeerError::permission_denied(err.to_string())
            }
            AclError::ChannelNotFound { .. } => PeerError::not_found(err.to_string()),
            AclError::MalformedIdentity { .. } => PeerError::invalid(err.to_string()),
            AclError::ConfigValidatorMissing { .. } | AclError::MembershipManagerMissing { .. } => {
                PeerError::internal(err.to_string())
            }
        }
    }
}

/// Failure to turn raw bytes into an [`Identity`](crate::Identity)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Bytes do not decode as a serialized identity
    #[error("malformed identity bytes: {0}")]
    Decode(String),

    /// The identity names an MSP this channel does not know
    #[error("unknown MSP '{0}'")]
    UnknownMsp(String),

    /// Decoded, but the identity itself is unusable
    #[error("invalid identity: {0}")]
    Invalid(String),
}
