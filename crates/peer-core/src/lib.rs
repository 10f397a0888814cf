//! Peer Core - shared foundation for the peer access-control crates
//!
//! Holds the pieces every other crate in the workspace leans on:
//!
//! - Identifiers: [`ChannelId`], [`ChannelScope`] and [`TxId`]
//! - The unified [`PeerError`] and [`Result`] alias
//! - The [`PeerConfig`] trait for TOML + environment configuration
//! - Tracing subscriber installation in [`telemetry`]
//!
//! Nothing in here knows about signatures, policies or ledgers.

#![forbid(unsafe_code)]

/// Unified error handling
pub mod errors;

/// Channel and transaction identifiers
pub mod identifiers;

/// Configuration loading and validation
pub mod config;

/// Tracing subscriber setup
pub mod telemetry;

pub use config::PeerConfig;
pub use errors::{PeerError, Result};
pub use identifiers::{ChannelId, ChannelScope, TxId};
pub use telemetry::{init_tracing, LogConfig};
