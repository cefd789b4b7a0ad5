//! Recorded match results and the consume-once result log.

use crate::models::competitor::{Competitor, CompetitorId, Identifier};
use crate::models::error::BracketError;
use crate::models::registry::CompetitorRegistry;
use std::collections::HashMap;

/// The outcome of one recorded series between two competitors.
///
/// Scores come in two bases: the primary score decides the winner; the secondary
/// (alternative) score only feeds differentials.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchResult {
    pub first: Competitor,
    pub second: Competitor,
    pub scores: [i64; 2],
    pub alt_scores: [i64; 2],
    pub wins: [bool; 2],
    pub alt_wins: [bool; 2],
    /// Set once the result has been matched to a pairing.
    pub consumed: bool,
}

impl MatchResult {
    /// Result with all overrides left at their defaults.
    pub fn new(first: Competitor, second: Competitor, score_1: i64, score_2: i64) -> Self {
        Self::builder(first, second, score_1, score_2).build()
    }

    pub fn builder(
        first: Competitor,
        second: Competitor,
        score_1: i64,
        score_2: i64,
    ) -> MatchResultBuilder {
        MatchResultBuilder {
            first,
            second,
            scores: [score_1, score_2],
            alt_scores: [None, None],
            wins: [None, None],
            alt_wins: [None, None],
        }
    }
}

/// Builder for [`MatchResult`]. Unset overrides fall back to values derived from the
/// primary scores; an explicit `false` or `0` is kept as given.
#[derive(Clone, Debug)]
pub struct MatchResultBuilder {
    first: Competitor,
    second: Competitor,
    scores: [i64; 2],
    alt_scores: [Option<i64>; 2],
    wins: [Option<bool>; 2],
    alt_wins: [Option<bool>; 2],
}

impl MatchResultBuilder {
    pub fn alt_scores(mut self, score_1: i64, score_2: i64) -> Self {
        self.alt_scores = [Some(score_1), Some(score_2)];
        self
    }

    pub fn alt_score_overrides(mut self, alt_scores: [Option<i64>; 2]) -> Self {
        self.alt_scores = alt_scores;
        self
    }

    pub fn wins(mut self, win_1: Option<bool>, win_2: Option<bool>) -> Self {
        self.wins = [win_1, win_2];
        self
    }

    pub fn alt_wins(mut self, win_1: Option<bool>, win_2: Option<bool>) -> Self {
        self.alt_wins = [win_1, win_2];
        self
    }

    pub fn build(self) -> MatchResult {
        let [s1, s2] = self.scores;
        let wins = [
            self.wins[0].unwrap_or(s1 > s2),
            self.wins[1].unwrap_or(s2 > s1),
        ];
        MatchResult {
            first: self.first,
            second: self.second,
            scores: self.scores,
            alt_scores: [self.alt_scores[0].unwrap_or(s1), self.alt_scores[1].unwrap_or(s2)],
            wins,
            alt_wins: [self.alt_wins[0].unwrap_or(wins[0]), self.alt_wins[1].unwrap_or(wins[1])],
            consumed: false,
        }
    }
}

/// Unordered competitor pair used as a bucket key.
fn pair_key(a: CompetitorId, b: CompetitorId) -> (CompetitorId, CompetitorId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Results grouped per unordered competitor pair, each usable exactly once.
#[derive(Clone, Debug, Default)]
pub struct ResultLog {
    buckets: Vec<Vec<MatchResult>>,
    index: HashMap<(CompetitorId, CompetitorId), usize>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result to the bucket of its pair (registration order is kept).
    pub fn register(&mut self, result: MatchResult) {
        let key = pair_key(result.first.id, result.second.id);
        match self.index.get(&key) {
            Some(&bucket) => self.buckets[bucket].push(result),
            None => {
                self.index.insert(key, self.buckets.len());
                self.buckets.push(vec![result]);
            }
        }
    }

    /// Consume the first unconsumed result between `a` and `b`.
    ///
    /// Returns `Ok(None)` when the pair has no results left; identifier errors propagate.
    pub fn take(
        &mut self,
        registry: &CompetitorRegistry,
        a: impl Into<Identifier>,
        b: impl Into<Identifier>,
    ) -> Result<Option<MatchResult>, BracketError> {
        let a = registry.resolve(a)?.id;
        let b = registry.resolve(b)?.id;
        let Some(&bucket) = self.index.get(&pair_key(a, b)) else {
            return Ok(None);
        };
        let next = self.buckets[bucket].iter_mut().find(|r| !r.consumed);
        Ok(next.map(|result| {
            result.consumed = true;
            result.clone()
        }))
    }

    /// All results between `a` and `b`, consumed or not, in registration order.
    pub fn results_between(
        &self,
        registry: &CompetitorRegistry,
        a: impl Into<Identifier>,
        b: impl Into<Identifier>,
    ) -> Result<&[MatchResult], BracketError> {
        let a = registry.resolve(a)?.id;
        let b = registry.resolve(b)?.id;
        Ok(self
            .index
            .get(&pair_key(a, b))
            .map(|&bucket| self.buckets[bucket].as_slice())
            .unwrap_or(&[]))
    }

    /// Every consumed result, bucket by bucket.
    pub fn all_consumed(&self) -> Vec<&MatchResult> {
        self.buckets
            .iter()
            .flatten()
            .filter(|r| r.consumed)
            .collect()
    }

    /// Clear every consumed flag so the log can be replayed from scratch.
    pub fn release_all(&mut self) {
        for result in self.buckets.iter_mut().flatten() {
            result.consumed = false;
        }
    }

    /// Number of registered results.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
