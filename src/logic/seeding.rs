//! Seeding: the ordered working list of competitors, with tie-break sorting and rematch
//! avoidance.

use crate::logic::differentials::DifferentialTrack;
use crate::logic::pairing::PairingStrategy;
use crate::models::{BracketError, Competitor, CompetitorRegistry, Identifier, ResultLog};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Where a sort criterion reads its per-competitor value from.
#[derive(Clone, Copy, Debug)]
pub enum SortSource<'a> {
    /// The competitor's value on a differential track.
    Track(&'a DifferentialTrack),
    /// The competitor's position in another seeding.
    Seeding(&'a Seeding),
}

/// One tiebreaker: `coefficient * value`. Negative coefficients sort descending.
#[derive(Clone, Copy, Debug)]
pub struct SortCriterion<'a> {
    pub coefficient: i64,
    pub source: SortSource<'a>,
}

impl<'a> SortCriterion<'a> {
    pub fn track(coefficient: i64, track: &'a DifferentialTrack) -> Self {
        Self {
            coefficient,
            source: SortSource::Track(track),
        }
    }

    pub fn seeding(coefficient: i64, seeding: &'a Seeding) -> Self {
        Self {
            coefficient,
            source: SortSource::Seeding(seeding),
        }
    }

    fn value(&self, competitor: &Competitor) -> Result<i64, BracketError> {
        let raw = match self.source {
            SortSource::Track(track) => track.get(competitor)?,
            SortSource::Seeding(seeding) => seeding
                .position(competitor)
                .ok_or_else(|| BracketError::NotFound(competitor.identifier()))?
                as i64,
        };
        Ok(self.coefficient * raw)
    }
}

/// Result of [`Seeding::sort_no_rematches`].
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RematchSearch {
    /// A rematch-free arrangement was found and applied.
    Rearranged,
    /// Every arrangement repeats a played pairing; the seeding keeps its sorted (or, for
    /// random pairing, shuffled) order.
    Exhausted,
}

/// Ordered slots of competitors; `None` is an unresolved slot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Seeding {
    slots: Vec<Option<Competitor>>,
}

impl Seeding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<Option<Competitor>>) -> Self {
        Self { slots }
    }

    /// Build a seeding by resolving each identifier through the registry.
    pub fn from_identifiers<I, K>(
        registry: &CompetitorRegistry,
        identifiers: I,
    ) -> Result<Self, BracketError>
    where
        I: IntoIterator<Item = Option<K>>,
        K: Into<Identifier>,
    {
        let mut seeding = Self::new();
        seeding.set_all(registry, identifiers)?;
        Ok(seeding)
    }

    /// Replace the whole sequence. On an unknown identifier the seeding is left unchanged.
    pub fn set_all<I, K>(
        &mut self,
        registry: &CompetitorRegistry,
        identifiers: I,
    ) -> Result<&mut Self, BracketError>
    where
        I: IntoIterator<Item = Option<K>>,
        K: Into<Identifier>,
    {
        let slots = identifiers
            .into_iter()
            .map(|id| id.map(|id| registry.resolve(id).cloned()).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        self.slots = slots;
        Ok(self)
    }

    pub fn get(&self, index: usize) -> Option<&Competitor> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Assign a slot, padding with unresolved slots when `index` is past the end.
    pub fn set(&mut self, index: usize, competitor: Option<Competitor>) -> &mut Self {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = competitor;
        self
    }

    pub fn slots(&self) -> &[Option<Competitor>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// First position of `competitor` (matched by id).
    pub fn position(&self, competitor: &Competitor) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|c| c.id == competitor.id))
    }

    /// Stable lexicographic sort on the per-criterion keys, in criteria order.
    /// Does nothing while any slot is unresolved.
    pub fn sort(&mut self, criteria: &[SortCriterion<'_>]) -> Result<&mut Self, BracketError> {
        if !self.is_resolved() {
            return Ok(self);
        }
        let mut keyed = Vec::with_capacity(self.slots.len());
        for competitor in self.slots.iter().flatten() {
            let key = criteria
                .iter()
                .map(|criterion| criterion.value(competitor))
                .collect::<Result<Vec<_>, _>>()?;
            keyed.push((key, competitor.clone()));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        self.slots = keyed.into_iter().map(|(_, c)| Some(c)).collect();
        Ok(self)
    }

    /// Optionally sort, then apply the first arrangement (in lexicographic permutation order
    /// of the current positions) whose pairings repeat no consumed result.
    ///
    /// For [`PairingStrategy::Random`] the slots are shuffled once with the thread RNG and
    /// the search runs under sequential pairing; pair the result with
    /// [`PairingStrategy::without_shuffle`], since a second shuffle voids the guarantee.
    ///
    /// Factorial in the number of slots; only meant for small pools.
    pub fn sort_no_rematches(
        &mut self,
        results: &ResultLog,
        strategy: PairingStrategy,
        criteria: &[SortCriterion<'_>],
    ) -> Result<RematchSearch, BracketError> {
        self.sort_no_rematches_with(results, strategy, criteria, &mut rand::thread_rng())
    }

    /// [`Seeding::sort_no_rematches`], drawing the random shuffle from `rng`.
    pub fn sort_no_rematches_with<R: Rng + ?Sized>(
        &mut self,
        results: &ResultLog,
        strategy: PairingStrategy,
        criteria: &[SortCriterion<'_>],
        rng: &mut R,
    ) -> Result<RematchSearch, BracketError> {
        if !criteria.is_empty() {
            self.sort(criteria)?;
        }
        if strategy == PairingStrategy::Random {
            self.slots.shuffle(rng);
        }
        let strategy = strategy.without_shuffle();

        let played: HashSet<(usize, usize)> = results
            .all_consumed()
            .into_iter()
            .filter_map(|r| Some((self.position(&r.first)?, self.position(&r.second)?)))
            .flat_map(|(a, b)| [(a, b), (b, a)])
            .collect();

        let n = self.slots.len();
        for (examined, permutation) in (0..n).permutations(n).enumerate() {
            let rematch = strategy
                .pair(&permutation)
                .into_iter()
                .any(|pair| played.contains(&pair));
            if !rematch {
                log::debug!(
                    "Rematch-free arrangement found after {} permutation(s)",
                    examined + 1
                );
                self.slots = permutation.iter().map(|&i| self.slots[i].clone()).collect();
                return Ok(RematchSearch::Rearranged);
            }
        }

        log::warn!("No rematch-free arrangement exists for {} slot(s)", n);
        Ok(RematchSearch::Exhausted)
    }
}
