//! Port keys and connection pairs as they travel over the wire.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `<sourceKey>-<targetKey>`, where each key ends in a lowercase port id.
static ACTIVE_CONNECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*:[a-z]*)-(.*:[a-z]*)$").expect("valid regex"));

/// Composite identifier of a port: `<endpointId>:<portId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortKey(String);

impl PortKey {
    pub fn new(endpoint_id: &str, port_id: &str) -> Self {
        Self(format!("{}:{}", endpoint_id, port_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PortKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for PortKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for PortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed active connection `{0}`")]
pub struct ParseConnectionError(pub String);

/// A directed link between two ports.
///
/// Serializes to the body of the `connect` and `disconnect` requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionPair {
    pub source: PortKey,
    pub target: PortKey,
}

impl ConnectionPair {
    pub fn new(source: impl Into<PortKey>, target: impl Into<PortKey>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether this pair links the same two ports, in either direction.
    pub fn joins(&self, a: &PortKey, b: &PortKey) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    pub fn touches(&self, key: &PortKey) -> bool {
        &self.source == key || &self.target == key
    }

    /// The other end of the pair, if `key` is one of its ends.
    pub fn peer_of(&self, key: &PortKey) -> Option<&PortKey> {
        if &self.source == key {
            Some(&self.target)
        } else if &self.target == key {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl FromStr for ConnectionPair {
    type Err = ParseConnectionError;

    /// Parses the `activeConnections` form, `a.b:out-c.d:in`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = ACTIVE_CONNECTION
            .captures(s)
            .ok_or_else(|| ParseConnectionError(s.to_string()))?;
        Ok(Self::new(&caps[1], &caps[2]))
    }
}

impl fmt::Display for ConnectionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}
