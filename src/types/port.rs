//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSet` is the canonical, ascending, deduplicated set of ports a scan
//! operates on, built from a user-supplied range or comma list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange {
            value: i64::from(value),
        })
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port specification parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port token '{0}': not an integer")]
    InvalidToken(String),
    #[error("port {value} is out of valid range ({min}-{max})", min = Port::MIN, max = Port::MAX)]
    OutOfRange { value: i64 },
    #[error("no ports specified")]
    Empty,
}

/// An ascending, duplicate-free, non-empty set of ports.
///
/// Accepted input forms:
/// - Range: `"1-1024"`. Reversed bounds such as `"1024-1"` are swapped.
/// - List: `"22,80,443"`. Empty tokens are skipped, repeats collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    /// Parse a port specification string.
    pub fn parse(spec: &str) -> Result<Self, PortError> {
        let spec = spec.trim();
        let mut values = BTreeSet::new();

        match spec.split_once('-') {
            Some((start, end)) if !spec.contains(',') => {
                let mut start = parse_token(start)?;
                let mut end = parse_token(end)?;
                if start > end {
                    std::mem::swap(&mut start, &mut end);
                }
                // Clamp enumeration to one past the valid bounds so "0-99999"
                // still reports the offending edge without walking huge ranges.
                let lo = start.max(i64::from(Port::MIN) - 1);
                let hi = end.min(i64::from(Port::MAX) + 1);
                values.insert(start);
                values.insert(end);
                values.extend(lo..=hi);
            }
            _ => {
                for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    values.insert(parse_token(token)?);
                }
            }
        }

        let mut ports = Vec::with_capacity(values.len());
        for value in values {
            let port = u16::try_from(value)
                .ok()
                .and_then(Port::new)
                .ok_or(PortError::OutOfRange { value })?;
            ports.push(port);
        }

        if ports.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(Self { ports })
    }

    /// Build a set from already-validated ports, sorting and deduplicating.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Result<Self, PortError> {
        let ports: Vec<Port> = ports
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ports.is_empty() {
            return Err(PortError::Empty);
        }
        Ok(Self { ports })
    }

    /// Number of ports in the set.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always false: a `PortSet` cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    pub fn contains(&self, port: Port) -> bool {
        self.ports.binary_search(&port).is_ok()
    }

    pub fn first(&self) -> Port {
        self.ports[0]
    }

    pub fn last(&self) -> Port {
        self.ports[self.ports.len() - 1]
    }
}

impl FromStr for PortSet {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a PortSet {
    type Item = Port;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Port>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.iter().copied()
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

fn parse_token(token: &str) -> Result<i64, PortError> {
    let token = token.trim();
    token
        .parse::<i64>()
        .map_err(|_| PortError::InvalidToken(token.to_string()))
}
