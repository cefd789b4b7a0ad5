//! Multi-key lookup (id, name, alias -> dense slot) and the competitor registry built on it.

use crate::models::competitor::{Competitor, Identifier};
use crate::models::error::BracketError;
use indexmap::IndexMap;

/// Maps every key of every competitor to one shared dense slot index.
///
/// Keys keep insertion order (name, id, aliases per competitor); `Differentials::combine`
/// relies on that order to pick the first matching key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyIndex {
    slots: IndexMap<Identifier, usize>,
    len: usize,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots (competitors), not keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, key: &Identifier) -> bool {
        self.slots.contains_key(key)
    }

    /// Slot for any key of a registered competitor.
    pub fn slot(&self, key: &Identifier) -> Result<usize, BracketError> {
        self.slots
            .get(key)
            .copied()
            .ok_or_else(|| BracketError::NotFound(key.clone()))
    }

    /// All keys with their slots, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = (&Identifier, usize)> {
        self.slots.iter().map(|(k, &slot)| (k, slot))
    }

    /// First key of `competitor` that is already taken, if any.
    fn first_collision(&self, competitor: &Competitor) -> Option<Identifier> {
        competitor.keys().into_iter().find(|k| self.contains(k))
    }

    /// Append a new slot for `competitor`. Fails if any of its keys is taken.
    pub fn insert(&mut self, competitor: &Competitor) -> Result<usize, BracketError> {
        if let Some(key) = self.first_collision(competitor) {
            return Err(BracketError::DuplicateRegistration(key));
        }
        let slot = self.len;
        for key in competitor.keys() {
            self.slots.insert(key, slot);
        }
        self.len += 1;
        Ok(slot)
    }
}

/// Registered competitors, addressable by id, name or alias.
#[derive(Clone, Debug, Default)]
pub struct CompetitorRegistry {
    competitors: Vec<Competitor>,
    index: KeyIndex,
}

impl CompetitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a competitor. Ids, names and aliases must be unique across the registry.
    pub fn register(&mut self, competitor: Competitor) -> Result<usize, BracketError> {
        let slot = self.index.insert(&competitor)?;
        log::debug!(
            "Registered competitor {} ({}) at slot {}",
            competitor.name,
            competitor.id,
            slot
        );
        self.competitors.push(competitor);
        Ok(slot)
    }

    /// Look up a competitor by any of its keys.
    pub fn resolve(&self, identifier: impl Into<Identifier>) -> Result<&Competitor, BracketError> {
        let slot = self.index.slot(&identifier.into())?;
        Ok(&self.competitors[slot])
    }

    /// Slot index of a competitor by any of its keys.
    pub fn slot(&self, identifier: impl Into<Identifier>) -> Result<usize, BracketError> {
        self.index.slot(&identifier.into())
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    /// Competitors in registration (slot) order.
    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}
