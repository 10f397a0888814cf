//! In-memory channel configuration store
//!
//! Every update swaps in a fresh `Arc` snapshot, so a caller that already
//! fetched a channel's resources keeps seeing the old values for the rest of
//! its call.

use crate::identity::TestMembershipManager;
use parking_lot::RwLock;
use peer_acl::{ChannelConfigGetter, ChannelConfigResources, ConfigValidator, MembershipManager};
use peer_core::ChannelId;
use std::collections::HashMap;
use std::sync::Arc;

/// Config validator reporting a fixed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSequence(pub u64);

impl ConfigValidator for FixedSequence {
    fn sequence(&self) -> u64 {
        self.0
    }
}

/// One channel's configuration snapshot
#[derive(Debug, Clone, Default)]
pub struct TestChannelResources {
    validator: Option<FixedSequence>,
    msp: Option<TestMembershipManager>,
}

impl TestChannelResources {
    /// Resources at `sequence` with no membership manager
    pub fn new(sequence: u64) -> Self {
        Self {
            validator: Some(FixedSequence(sequence)),
            msp: None,
        }
    }

    /// Resources with neither validator nor membership manager
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach a membership manager
    pub fn with_msp(mut self, msp: TestMembershipManager) -> Self {
        self.msp = Some(msp);
        self
    }

    /// Remove the config validator
    pub fn without_validator(mut self) -> Self {
        self.validator = None;
        self
    }

    /// Current sequence, if a validator is present
    pub fn sequence(&self) -> Option<u64> {
        self.validator.map(|v| v.0)
    }
}

impl ChannelConfigResources for TestChannelResources {
    fn config_validator(&self) -> Option<&dyn ConfigValidator> {
        self.validator.as_ref().map(|v| v as &dyn ConfigValidator)
    }

    fn membership_manager(&self) -> Option<&dyn MembershipManager> {
        self.msp.as_ref().map(|m| m as &dyn MembershipManager)
    }
}

/// Channel config getter backed by a map
#[derive(Debug, Default)]
pub struct ChannelConfigStore {
    channels: RwLock<HashMap<ChannelId, Arc<TestChannelResources>>>,
}

impl ChannelConfigStore {
    /// Store with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace a channel's configuration
    pub fn set_channel(&self, channel: &str, resources: TestChannelResources) {
        self.channels
            .write()
            .insert(crate::channel(channel), Arc::new(resources));
    }

    /// Forget a channel
    pub fn remove_channel(&self, channel: &str) {
        self.channels.write().remove(&crate::channel(channel));
    }

    /// Apply a configuration update: sequence + 1, everything else kept
    ///
    /// Returns the new sequence.
    pub fn bump_sequence(&self, channel: &str) -> u64 {
        let id = crate::channel(channel);
        let mut channels = self.channels.write();
        let current = TestChannelResources::clone(
            channels.get(&id).expect("bump_sequence on unknown channel"),
        );
        let next = current.sequence().expect("channel has a validator") + 1;
        let updated = TestChannelResources {
            validator: Some(FixedSequence(next)),
            ..current
        };
        channels.insert(id, Arc::new(updated));
        tracing::debug!(channel, sequence = next, "Test channel config updated");
        next
    }
}

impl ChannelConfigGetter for ChannelConfigStore {
    fn channel_config(&self, channel: &ChannelId) -> Option<Arc<dyn ChannelConfigResources>> {
        self.channels
            .read()
            .get(channel)
            .map(|resources| Arc::clone(resources) as Arc<dyn ChannelConfigResources>)
    }
}
