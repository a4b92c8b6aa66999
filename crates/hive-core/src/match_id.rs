//! Namespaced match identifiers.
//!
//! A match lives on exactly one node. Its identifier carries that node's
//! name as a suffix, `<uuid>.<node>`, so any peer can tell where a match
//! must be served without asking a central directory.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// Separator between the match UUID and the owning node name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Errors produced when parsing a [`MatchId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchIdError {
    /// No `.` separator present.
    #[error("match id has no node namespace: {0}")]
    MissingNamespace(String),

    /// The part before the separator is not a UUID.
    #[error("match id has an invalid uuid: {0}")]
    InvalidUuid(String),

    /// The node namespace is empty.
    #[error("match id has an empty node namespace: {0}")]
    EmptyNamespace(String),
}

/// Returns the node namespace of a raw match identifier.
///
/// Only the first separator splits; node names containing further dots are
/// returned whole. Returns `None` when there is no separator at all.
pub fn namespace_of(raw: &str) -> Option<&str> {
    raw.split_once(NAMESPACE_SEPARATOR).map(|(_, node)| node)
}

/// A match identifier qualified with its owning node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchId {
    pub id: Uuid,
    pub node: String,
}

impl MatchId {
    /// Creates a new match identifier.
    pub fn new(id: Uuid, node: impl Into<String>) -> Self {
        Self {
            id,
            node: node.into(),
        }
    }

}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, NAMESPACE_SEPARATOR, self.node)
    }
}

impl FromStr for MatchId {
    type Err = MatchIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, node) = s
            .split_once(NAMESPACE_SEPARATOR)
            .ok_or_else(|| MatchIdError::MissingNamespace(s.to_string()))?;
        if node.is_empty() {
            return Err(MatchIdError::EmptyNamespace(s.to_string()));
        }
        let id = Uuid::parse_str(id).map_err(|_| MatchIdError::InvalidUuid(s.to_string()))?;
        Ok(Self::new(id, node))
    }
}
