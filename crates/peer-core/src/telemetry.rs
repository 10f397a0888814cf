//! Tracing subscriber setup

use crate::config::{parse_env_value, PeerConfig};
use crate::errors::{PeerError, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `peer_acl=debug`
    pub filter: String,
    /// Include the event target in each line
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: true,
        }
    }
}

impl PeerConfig for LogConfig {
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "PEER_LOG_FILTER" => self.filter = value,
                "PEER_LOG_WITH_TARGET" => self.with_target = parse_env_value(&key, &value)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.filter)
            .map(|_| ())
            .map_err(|e| PeerError::config(format!("Invalid log filter '{}': {e}", self.filter)))
    }
}

/// Install the global `fmt` subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| PeerError::config(format!("Invalid log filter '{}': {e}", config.filter)))?;

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
