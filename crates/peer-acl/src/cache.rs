//! Authorization cache
//!
//! Memoizes eligibility decisions, grants and denials alike, per channel.
//! Each channel partition remembers the configuration sequence it was filled
//! under; when the channel's sequence moves, the partition is discarded.
//! Principal checks pass straight through.

use crate::assertion::{Principal, SignedAssertion};
use crate::config::AuthCacheConfig;
use crate::errors::AclResult;
use crate::support::AccessControl;
use parking_lot::Mutex;
use peer_core::{ChannelId, ChannelScope, PeerConfig};
use std::collections::HashMap;

type AssertionDigest = [u8; 32];

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Decisions served from the cache
    pub hits: u64,
    /// Decisions computed and stored
    pub misses: u64,
    /// Partitions discarded after a sequence change
    pub invalidations: u64,
    /// Calls that skipped the cache because the sequence was unavailable
    pub bypasses: u64,
    /// Cached decisions across all partitions
    pub size: usize,
}

#[derive(Debug)]
struct CachedDecision {
    outcome: AclResult,
    last_access: u64,
}

#[derive(Debug)]
struct Partition {
    sequence: u64,
    entries: HashMap<AssertionDigest, CachedDecision>,
}

impl Partition {
    fn new(sequence: u64) -> Self {
        Self {
            sequence,
            entries: HashMap::new(),
        }
    }

    /// Drop least recently used entries until `keep` remain
    fn purge(&mut self, keep: usize) {
        if self.entries.len() <= keep {
            return;
        }
        let mut by_age: Vec<(u64, AssertionDigest)> = self
            .entries
            .iter()
            .map(|(digest, cached)| (cached.last_access, *digest))
            .collect();
        by_age.sort_unstable();
        let excess = self.entries.len() - keep;
        for (_, digest) in by_age.into_iter().take(excess) {
            self.entries.remove(&digest);
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    partitions: HashMap<ChannelScope, Partition>,
    clock: u64,
    stats: CacheStats,
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn size(&self) -> usize {
        self.partitions.values().map(|p| p.entries.len()).sum()
    }
}

/// Caching wrapper around an [`AccessControl`] implementation
#[derive(Debug)]
pub struct AuthCache<A> {
    inner: A,
    config: AuthCacheConfig,
    state: Mutex<CacheState>,
}

impl<A: AccessControl> AuthCache<A> {
    /// Wrap `inner`, validating `config` first
    pub fn new(inner: A, config: AuthCacheConfig) -> peer_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            inner,
            config,
            state: Mutex::new(CacheState::default()),
        })
    }

    /// The wrapped implementation
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            size: state.size(),
            ..state.stats.clone()
        }
    }

    /// Drop every cached decision
    pub fn clear(&self) {
        self.state.lock().partitions.clear();
    }

    fn lookup(
        &self,
        scope: &ChannelScope,
        sequence: u64,
        digest: &AssertionDigest,
    ) -> Option<AclResult> {
        let mut state = self.state.lock();
        let now = state.tick();

        let cached_sequence = state.partitions.get(scope).map(|p| p.sequence);
        if cached_sequence.is_some_and(|cached| cached > sequence) {
            // caller read the sequence before a concurrent update landed
            state.stats.bypasses += 1;
            return None;
        }
        if cached_sequence.is_some_and(|cached| cached < sequence) {
            tracing::debug!(
                channel = %scope,
                sequence,
                "Config sequence changed, invalidating cached decisions"
            );
            state.partitions.insert(scope.clone(), Partition::new(sequence));
            state.stats.invalidations += 1;
        }

        let hit = state
            .partitions
            .get_mut(scope)
            .and_then(|partition| partition.entries.get_mut(digest))
            .map(|cached| {
                cached.last_access = now;
                cached.outcome.clone()
            });

        if hit.is_some() {
            state.stats.hits += 1;
            tracing::trace!(channel = %scope, "Cached eligibility decision");
        } else {
            state.stats.misses += 1;
        }
        hit
    }

    fn store(
        &self,
        scope: &ChannelScope,
        sequence: u64,
        digest: AssertionDigest,
        outcome: AclResult,
    ) {
        let keep = self.config.retained_after_purge();
        let max_size = self.config.max_size;

        let mut state = self.state.lock();
        let now = state.tick();
        let partition = state
            .partitions
            .entry(scope.clone())
            .or_insert_with(|| Partition::new(sequence));

        if partition.sequence > sequence {
            // computed under an older configuration than the one now cached
            return;
        }
        if partition.sequence < sequence {
            *partition = Partition::new(sequence);
        }

        partition.entries.insert(
            digest,
            CachedDecision {
                outcome,
                last_access: now,
            },
        );
        if partition.entries.len() > max_size {
            partition.purge(keep);
            tracing::debug!(
                channel = %scope,
                retained = keep,
                "Purged authorization cache partition"
            );
        }
    }
}

impl<A: AccessControl> AccessControl for AuthCache<A> {
    fn eligible_for_service(
        &self,
        scope: &ChannelScope,
        assertion: &SignedAssertion,
    ) -> AclResult {
        if !self.config.enabled {
            return self.inner.eligible_for_service(scope, assertion);
        }

        let sequence = match self.inner.try_config_sequence(scope) {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::debug!(
                    channel = %scope,
                    error = %err,
                    "No config sequence, bypassing cache"
                );
                self.state.lock().stats.bypasses += 1;
                return self.inner.eligible_for_service(scope, assertion);
            }
        };

        let digest = assertion.digest();
        if let Some(outcome) = self.lookup(scope, sequence, &digest) {
            return outcome;
        }

        let outcome = self.inner.eligible_for_service(scope, assertion);
        self.store(scope, sequence, digest, outcome.clone());
        outcome
    }

    fn try_config_sequence(&self, scope: &ChannelScope) -> AclResult<u64> {
        self.inner.try_config_sequence(scope)
    }

    fn satisfies_principal(
        &self,
        channel: &ChannelId,
        raw_identity: &[u8],
        principal: &Principal,
    ) -> AclResult {
        self.inner.satisfies_principal(channel, raw_identity, principal)
    }
}
