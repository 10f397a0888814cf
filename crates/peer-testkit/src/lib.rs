//! Peer Testing Infrastructure
//!
//! In-memory stand-ins for the capabilities `peer-acl` consumes: a channel
//! configuration store, a membership manager with a small role model, an
//! ed25519 roster verifier, and scripted verifier/evaluator doubles that
//! record what they were asked.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! peer-testkit = { path = "../peer-testkit" }
//! ```
//!
//! ```rust,no_run
//! use peer_testkit::*;
//!
//! let signer = TestSigner::from_seed(1, "Org1MSP");
//! let store = ChannelConfigStore::new();
//! let msp = TestMembershipManager::new().with_msp("Org1MSP");
//! store.set_channel("mychannel", TestChannelResources::new(3).with_msp(msp));
//! let assertion = signer.sign(b"hello");
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod channels;
pub mod doubles;
pub mod identity;
pub mod signing;
pub mod verifier;

pub use channels::{ChannelConfigStore, FixedSequence, TestChannelResources};
pub use doubles::{RecordingEvaluator, ScriptedVerifier, VerifyCall};
pub use identity::{MspRole, RolePrincipal, SerializedIdentity, TestIdentity, TestMembershipManager};
pub use signing::TestSigner;
pub use verifier::RosterVerifier;

use peer_core::ChannelId;

/// Channel identifier from a literal
pub fn channel(name: &str) -> ChannelId {
    ChannelId::new(name).expect("test channel names are non-empty")
}
