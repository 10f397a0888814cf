//! Channel and transaction identifiers
//!
//! A request either targets a named channel or runs outside any channel.
//! [`ChannelScope`] makes that choice explicit so the channel-less case can
//! never be confused with a channel whose name happens to be empty.

use crate::errors::{PeerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a channel. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Create a channel identifier, rejecting the empty string
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(PeerError::invalid("channel name must not be empty"));
        }
        Ok(Self(name))
    }

    /// Borrow the channel name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelId {
    type Error = PeerError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ChannelId {
    type Error = PeerError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

/// Authorization domain of a request
///
/// `NoChannel` covers node-wide requests (e.g. "which channels exist") that are
/// checked against local policy. `Channel` covers requests scoped to one
/// channel's membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelScope {
    /// Request outside of any channel
    #[default]
    NoChannel,
    /// Request scoped to a named channel
    Channel(ChannelId),
}

impl ChannelScope {
    /// Interpret the legacy string form, where `""` means no channel
    pub fn from_wire(channel: &str) -> Self {
        match ChannelId::new(channel) {
            Ok(id) => Self::Channel(id),
            Err(_) => Self::NoChannel,
        }
    }

    /// Legacy string form of the scope
    pub fn as_wire(&self) -> &str {
        match self {
            Self::NoChannel => "",
            Self::Channel(id) => id.as_str(),
        }
    }

    /// The named channel, if any
    pub fn channel(&self) -> Option<&ChannelId> {
        match self {
            Self::NoChannel => None,
            Self::Channel(id) => Some(id),
        }
    }
}

impl From<ChannelId> for ChannelScope {
    fn from(id: ChannelId) -> Self {
        Self::Channel(id)
    }
}

impl fmt::Display for ChannelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChannel => f.write_str("<no channel>"),
            Self::Channel(id) => write!(f, "{id}"),
        }
    }
}

/// Transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId(String);

impl TxId {
    /// Create a transaction identifier, rejecting the empty string
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(PeerError::invalid("transaction id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Borrow the transaction id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TxId {
    type Error = PeerError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TxId> for String {
    fn from(id: TxId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn empty_channel_name_is_rejected() {
        assert_matches!(ChannelId::new(""), Err(PeerError::Invalid { .. }));
    }

    #[test]
    fn empty_wire_channel_means_no_channel() {
        assert_eq!(ChannelScope::from_wire(""), ChannelScope::NoChannel);
        assert_eq!(ChannelScope::NoChannel.as_wire(), "");
        assert!(ChannelScope::NoChannel.channel().is_none());
    }

    #[test]
    fn named_wire_channel_round_trips() {
        let scope = ChannelScope::from_wire("mychannel");
        assert_matches!(&scope, ChannelScope::Channel(id) if id.as_str() == "mychannel");
        assert_eq!(scope.as_wire(), "mychannel");
        assert_eq!(scope.to_string(), "mychannel");
    }

    #[test]
    fn channel_id_deserialization_validates() {
        #[derive(Deserialize)]
        struct Holder {
            channel: ChannelId,
        }

        let ok: Holder = toml::from_str("channel = \"mychannel\"").unwrap();
        assert_eq!(ok.channel.as_str(), "mychannel");
        assert!(toml::from_str::<Holder>("channel = \"\"").is_err());
    }

    #[test]
    fn empty_tx_id_is_rejected() {
        assert!(TxId::new("").is_err());
        assert_eq!(TxId::new("tx1").unwrap().as_str(), "tx1");
    }

    proptest! {
        #[test]
        fn non_empty_names_are_channels(name in "[a-z][a-z0-9.-]{0,30}") {
            let scope = ChannelScope::from_wire(&name);
            prop_assert_eq!(scope.channel().map(ChannelId::as_str), Some(name.as_str()));
        }
    }
}
