//! Competitor and Identifier data structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a competitor (unique within a registry).
pub type CompetitorId = u32;

/// A competitor in the tournament. Immutable once registered.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Alternative names; share the namespace with names of all competitors.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Competitor {
    /// Create a competitor with no aliases.
    pub fn new(id: CompetitorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Add an alias (builder style).
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Every key this competitor answers to: name, then id, then aliases.
    pub fn keys(&self) -> Vec<Identifier> {
        let mut keys = Vec::with_capacity(self.aliases.len() + 2);
        keys.push(Identifier::Key(self.name.clone()));
        keys.push(Identifier::Id(self.id));
        keys.extend(self.aliases.iter().cloned().map(Identifier::Key));
        keys
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::Id(self.id)
    }
}

/// Any key a competitor can be looked up by.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// The numeric id.
    Id(CompetitorId),
    /// A name or an alias.
    Key(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{}", id),
            Identifier::Key(key) => write!(f, "\"{}\"", key),
        }
    }
}

impl From<CompetitorId> for Identifier {
    fn from(id: CompetitorId) -> Self {
        Identifier::Id(id)
    }
}

impl From<&str> for Identifier {
    fn from(key: &str) -> Self {
        Identifier::Key(key.to_string())
    }
}

impl From<String> for Identifier {
    fn from(key: String) -> Self {
        Identifier::Key(key)
    }
}

impl From<&Competitor> for Identifier {
    fn from(competitor: &Competitor) -> Self {
        competitor.identifier()
    }
}

impl From<&Identifier> for Identifier {
    fn from(identifier: &Identifier) -> Self {
        identifier.clone()
    }
}
