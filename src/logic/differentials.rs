//! Tie-break differentials: four integer tracks per competitor, addressed through the key index.

use crate::models::{BracketError, CompetitorRegistry, Identifier, KeyIndex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Selects one of the four differential tracks.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Primary score margin.
    ScoreDiff,
    /// Secondary score margin.
    AltScoreDiff,
    /// Primary win margin (+1 per win, -1 per loss).
    WinDiff,
    /// Secondary win margin.
    AltWinDiff,
}

impl Track {
    pub const ALL: [Track; 4] = [
        Track::ScoreDiff,
        Track::AltScoreDiff,
        Track::WinDiff,
        Track::AltWinDiff,
    ];
}

/// One integer per competitor slot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DifferentialTrack {
    values: Vec<i64>,
    index: Rc<KeyIndex>,
}

impl DifferentialTrack {
    fn new(index: Rc<KeyIndex>, default: i64) -> Self {
        Self {
            values: vec![default; index.len()],
            index,
        }
    }

    pub fn get(&self, identifier: impl Into<Identifier>) -> Result<i64, BracketError> {
        let slot = self.index.slot(&identifier.into())?;
        Ok(self.values[slot])
    }

    pub fn set(
        &mut self,
        identifier: impl Into<Identifier>,
        value: i64,
    ) -> Result<(), BracketError> {
        let slot = self.index.slot(&identifier.into())?;
        self.values[slot] = value;
        Ok(())
    }

    pub fn add(
        &mut self,
        identifier: impl Into<Identifier>,
        delta: i64,
    ) -> Result<(), BracketError> {
        let slot = self.index.slot(&identifier.into())?;
        self.values[slot] += delta;
        Ok(())
    }

    /// New track over the same index; values are copied, or all set to `default` if given.
    pub fn copy(&self, default: Option<i64>) -> Self {
        match default {
            Some(value) => Self::new(Rc::clone(&self.index), value),
            None => self.clone(),
        }
    }

    /// Set every value to `default`.
    pub fn reset(&mut self, default: i64) {
        self.values.iter_mut().for_each(|v| *v = default);
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Add every nonzero value of `other` once per competitor, through the first of its
    /// keys (in `other`'s index order) that this track's index knows.
    fn absorb(&mut self, other: &DifferentialTrack) {
        let mut keys_by_slot: IndexMap<usize, Vec<&Identifier>> = IndexMap::new();
        for (key, slot) in other.index.keys() {
            if other.values[slot] == 0 {
                continue;
            }
            keys_by_slot.entry(slot).or_default().push(key);
        }
        for (slot, keys) in keys_by_slot {
            if let Some(target) = keys.into_iter().find_map(|k| self.index.slot(k).ok()) {
                self.values[target] += other.values[slot];
            }
        }
    }
}

/// Deltas applied to one competitor across all four tracks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DifferentialDelta {
    pub score_diff: i64,
    pub alt_score_diff: i64,
    pub win_diff: i64,
    pub alt_win_diff: i64,
}

impl DifferentialDelta {
    pub fn new(score_diff: i64, alt_score_diff: i64, win_diff: i64, alt_win_diff: i64) -> Self {
        Self {
            score_diff,
            alt_score_diff,
            win_diff,
            alt_win_diff,
        }
    }
}

/// The four tie-break tracks for one context (global, per round, or per pairing).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Differentials {
    pub score_diff: DifferentialTrack,
    pub alt_score_diff: DifferentialTrack,
    pub win_diff: DifferentialTrack,
    pub alt_win_diff: DifferentialTrack,
}

impl Differentials {
    /// All tracks start at zero for every registered competitor.
    pub fn new(registry: &CompetitorRegistry) -> Self {
        Self::with_defaults(registry, [0; 4])
    }

    /// Per-track starting values, in [`Track::ALL`] order.
    pub fn with_defaults(registry: &CompetitorRegistry, defaults: [i64; 4]) -> Self {
        let index = Rc::new(registry.index().clone());
        let score_diff = DifferentialTrack::new(index, defaults[0]);
        Self {
            alt_score_diff: score_diff.copy(Some(defaults[1])),
            win_diff: score_diff.copy(Some(defaults[2])),
            alt_win_diff: score_diff.copy(Some(defaults[3])),
            score_diff,
        }
    }

    pub fn track(&self, track: Track) -> &DifferentialTrack {
        match track {
            Track::ScoreDiff => &self.score_diff,
            Track::AltScoreDiff => &self.alt_score_diff,
            Track::WinDiff => &self.win_diff,
            Track::AltWinDiff => &self.alt_win_diff,
        }
    }

    pub fn track_mut(&mut self, track: Track) -> &mut DifferentialTrack {
        match track {
            Track::ScoreDiff => &mut self.score_diff,
            Track::AltScoreDiff => &mut self.alt_score_diff,
            Track::WinDiff => &mut self.win_diff,
            Track::AltWinDiff => &mut self.alt_win_diff,
        }
    }

    /// Slot of `identifier` in the index shared by all four tracks.
    pub fn slot(&self, identifier: impl Into<Identifier>) -> Result<usize, BracketError> {
        self.score_diff.index.slot(&identifier.into())
    }

    /// Add one delta per track for a single competitor.
    pub fn add(
        &mut self,
        identifier: impl Into<Identifier>,
        delta: DifferentialDelta,
    ) -> Result<(), BracketError> {
        let identifier = identifier.into();
        // resolve once up front so a bad key leaves every track untouched
        self.slot(&identifier)?;
        self.score_diff.add(&identifier, delta.score_diff)?;
        self.alt_score_diff.add(&identifier, delta.alt_score_diff)?;
        self.win_diff.add(&identifier, delta.win_diff)?;
        self.alt_win_diff.add(&identifier, delta.alt_win_diff)?;
        Ok(())
    }

    /// Merge other trackers into this one, track by track, under the first-match rule of
    /// [`DifferentialTrack`].
    pub fn combine<'a>(&mut self, others: impl IntoIterator<Item = &'a Differentials>) {
        for other in others {
            for track in Track::ALL {
                self.track_mut(track).absorb(other.track(track));
            }
        }
    }

    /// New tracker over the same index; values copied, or every track set to `default` if given.
    pub fn copy(&self, default: Option<i64>) -> Self {
        Self {
            score_diff: self.score_diff.copy(default),
            alt_score_diff: self.alt_score_diff.copy(default),
            win_diff: self.win_diff.copy(default),
            alt_win_diff: self.alt_win_diff.copy(default),
        }
    }

    /// Reset a single track in place.
    pub fn reset(&mut self, track: Track, default: i64) {
        self.track_mut(track).reset(default);
    }
}
