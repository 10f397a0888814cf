//! Peer ACL - channel-scoped access control
//!
//! Decides whether a caller presenting a [`SignedAssertion`] may receive a
//! service, either node-wide (checked against local policy) or on a named
//! channel (checked against that channel's membership). Also answers whether a
//! raw identity satisfies a [`Principal`], and reports each channel's
//! configuration sequence so callers can tell when cached decisions are stale.
//!
//! The crate owns no cryptography, policy language or configuration storage.
//! Those arrive as capabilities at construction:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use peer_acl::{AccessControl, AccessControlSupport, ChannelConfigGetter, Evaluator, Verifier};
//! use peer_core::ChannelScope;
//!
//! fn wire(
//!     verifier: Arc<dyn Verifier>,
//!     evaluator: Arc<dyn Evaluator>,
//!     configs: Arc<dyn ChannelConfigGetter>,
//! ) -> u64 {
//!     let support = AccessControlSupport::new(verifier, evaluator, configs);
//!     support.config_sequence(&ChannelScope::NoChannel)
//! }
//! ```

#![forbid(unsafe_code)]

pub mod assertion;
pub mod cache;
pub mod capabilities;
pub mod config;
pub mod errors;
pub mod support;

pub use assertion::{Principal, PrincipalClassification, SignedAssertion};
pub use cache::{AuthCache, CacheStats};
pub use capabilities::{
    ChannelConfigGetter, ChannelConfigResources, ConfigValidator, Evaluator, Identity,
    MembershipManager, Verifier,
};
pub use config::{AclConfig, AuthCacheConfig};
pub use errors::{AclError, AclResult, IdentityError};
pub use support::{AccessControl, AccessControlSupport};
