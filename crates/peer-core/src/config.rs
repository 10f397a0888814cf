//! Configuration trait for peer components
//!
//! Configs are plain serde structs with defaults for every field. They load
//! from TOML, accept `PEER_`-prefixed environment overrides, and validate
//! before use.

use crate::errors::{PeerError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::str::FromStr;

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "PEER_";

/// Core trait for peer configuration types
pub trait PeerConfig: Clone + Default + DeserializeOwned + Send + Sync + 'static {
    /// Parse a TOML document without validating it
    fn parse_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a TOML document and validate the result
    fn from_toml_str(content: &str) -> Result<Self> {
        let config = Self::parse_toml_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    fn load_from_file(path: &Path) -> Result<Self> {
        Self::from_toml_str(&read_config_file(path)?)
    }

    /// Load from an optional file, apply environment overrides, then validate
    fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_vars(path, std::env::vars())
    }

    /// As [`PeerConfig::load`], with overrides taken from `vars`
    ///
    /// The file is validated only after the overrides are merged, so an
    /// override can repair a bad file value.
    fn load_with_vars<I>(path: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = match path {
            Some(path) => Self::parse_toml_str(&read_config_file(path)?)?,
            None => Self::default(),
        };
        config.merge_with_vars(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge overrides from the process environment
    fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge overrides from `(key, value)` pairs; unknown keys are ignored
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>;

    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        PeerError::config(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })
}

/// Parse an environment override, naming the variable on failure
pub fn parse_env_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| PeerError::config(format!("Invalid value for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_env_value_names_variable() {
        let err = parse_env_value::<usize>("PEER_X", "abc").unwrap_err();
        assert_matches!(&err, PeerError::Config { message } if message.contains("PEER_X"));
        assert_eq!(parse_env_value::<usize>("PEER_X", " 42 ").unwrap(), 42);
    }
}
