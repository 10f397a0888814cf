//! Access-control configuration
//!
//! ```toml
//! [auth_cache]
//! enabled = true
//! max_size = 1000
//! purge_retention_ratio = 0.75
//!
//! [log]
//! filter = "info"
//! ```

use peer_core::config::parse_env_value;
use peer_core::{LogConfig, PeerConfig, PeerError, Result};
use serde::{Deserialize, Serialize};

/// Authorization cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthCacheConfig {
    /// Cache eligibility decisions at all
    pub enabled: bool,
    /// Maximum cached decisions per channel before a purge
    pub max_size: usize,
    /// Fraction of `max_size` kept after a purge, in `(0, 1]`
    pub purge_retention_ratio: f64,
}

impl Default for AuthCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: 1000,
            purge_retention_ratio: 0.75,
        }
    }
}

impl AuthCacheConfig {
    /// Entries left in a partition after a purge
    pub fn retained_after_purge(&self) -> usize {
        // validated ratio keeps this within [1, max_size]
        ((self.max_size as f64) * self.purge_retention_ratio).floor() as usize
    }
}

impl PeerConfig for AuthCacheConfig {
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "PEER_ACL_AUTH_CACHE_ENABLED" => self.enabled = parse_env_value(&key, &value)?,
                "PEER_ACL_AUTH_CACHE_MAX_SIZE" => self.max_size = parse_env_value(&key, &value)?,
                "PEER_ACL_AUTH_CACHE_PURGE_RETENTION_RATIO" => {
                    self.purge_retention_ratio = parse_env_value(&key, &value)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(PeerError::config("auth_cache.max_size must be positive"));
        }
        let ratio = self.purge_retention_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(PeerError::config(format!(
                "auth_cache.purge_retention_ratio must be in (0, 1], got {ratio}"
            )));
        }
        if self.retained_after_purge() == 0 {
            return Err(PeerError::config(format!(
                "auth_cache.max_size {} with purge_retention_ratio {ratio} retains no entries",
                self.max_size
            )));
        }
        Ok(())
    }
}

/// Top-level access-control configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Authorization cache settings
    pub auth_cache: AuthCacheConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl PeerConfig for AclConfig {
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        self.auth_cache.merge_with_vars(vars.iter().cloned())?;
        self.log.merge_with_vars(vars)
    }

    fn validate(&self) -> Result<()> {
        self.auth_cache.validate()?;
        self.log.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults_validate() {
        let config = AclConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth_cache.retained_after_purge(), 750);
    }

    #[test]
    fn zero_max_size_rejected() {
        let config = AuthCacheConfig {
            max_size: 0,
            ..AuthCacheConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn retention_ratio_bounds() {
        for ratio in [0.0, -0.5, 1.01, f64::NAN] {
            let config = AuthCacheConfig {
                purge_retention_ratio: ratio,
                ..AuthCacheConfig::default()
            };
            assert!(config.validate().is_err(), "ratio {ratio} accepted");
        }
        let full = AuthCacheConfig {
            purge_retention_ratio: 1.0,
            ..AuthCacheConfig::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn purge_must_retain_an_entry() {
        let empty_after_purge = AuthCacheConfig {
            max_size: 1,
            purge_retention_ratio: 0.75,
            ..AuthCacheConfig::default()
        };
        assert_eq!(empty_after_purge.retained_after_purge(), 0);
        assert!(empty_after_purge.validate().is_err());

        let single = AuthCacheConfig {
            max_size: 1,
            purge_retention_ratio: 1.0,
            ..AuthCacheConfig::default()
        };
        assert!(single.validate().is_ok());
        assert_eq!(single.retained_after_purge(), 1);
    }

    #[test]
    fn env_overrides_reach_nested_sections() {
        let mut config = AclConfig::default();
        config
            .merge_with_vars(vars(&[
                ("PEER_ACL_AUTH_CACHE_ENABLED", "false"),
                ("PEER_ACL_AUTH_CACHE_MAX_SIZE", "10"),
                ("PEER_ACL_AUTH_CACHE_PURGE_RETENTION_RATIO", "0.5"),
                ("PEER_LOG_FILTER", "debug"),
            ]))
            .unwrap();
        assert!(!config.auth_cache.enabled);
        assert_eq!(config.auth_cache.max_size, 10);
        assert_eq!(config.auth_cache.retained_after_purge(), 5);
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn bad_env_value_is_error() {
        let mut config = AclConfig::default();
        assert!(config
            .merge_with_vars(vars(&[("PEER_ACL_AUTH_CACHE_MAX_SIZE", "lots")]))
            .is_err());
    }
}
