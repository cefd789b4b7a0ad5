//! Single pairing resolution: consume one recorded result and derive differential deltas.

use crate::logic::bracket::Outcomes;
use crate::logic::context::{BracketContext, BracketView};
use crate::logic::differentials::{DifferentialDelta, Differentials};
use crate::logic::seeding::Seeding;
use crate::models::{BracketError, Competitor, MatchResult};
use std::fmt;

type CompetitorLookup = Box<dyn Fn(&BracketView<'_>) -> Option<Competitor>>;

/// Where one side of a matchup comes from.
pub enum CompetitorSource {
    /// A fixed competitor, or `None` for a slot that is never filled.
    Direct(Option<Competitor>),
    /// Evaluated every time the matchup is resolved.
    Lookup(CompetitorLookup),
}

impl CompetitorSource {
    pub fn empty() -> Self {
        CompetitorSource::Direct(None)
    }

    pub fn lookup(f: impl Fn(&BracketView<'_>) -> Option<Competitor> + 'static) -> Self {
        CompetitorSource::Lookup(Box::new(f))
    }

    /// Slot `index` of the bracket's initial seeding.
    pub fn seed(index: usize) -> Self {
        Self::lookup(move |view| view.seeding.and_then(|s| s.get(index)).cloned())
    }

    /// Winner of an earlier node (first winners slot for a round node).
    pub fn winner_of(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::lookup(move |view| view.outcome(&key).and_then(|o| o.winner()).cloned())
    }

    /// Loser of an earlier node (first losers slot for a round node).
    pub fn loser_of(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::lookup(move |view| view.outcome(&key).and_then(|o| o.loser()).cloned())
    }

    pub fn get(&self, view: &BracketView<'_>) -> Option<Competitor> {
        match self {
            CompetitorSource::Direct(competitor) => competitor.clone(),
            CompetitorSource::Lookup(f) => f(view),
        }
    }
}

impl From<Competitor> for CompetitorSource {
    fn from(competitor: Competitor) -> Self {
        CompetitorSource::Direct(Some(competitor))
    }
}

impl From<Option<Competitor>> for CompetitorSource {
    fn from(competitor: Option<Competitor>) -> Self {
        CompetitorSource::Direct(competitor)
    }
}

impl fmt::Debug for CompetitorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitorSource::Direct(c) => f.debug_tuple("Direct").field(c).finish(),
            CompetitorSource::Lookup(_) => f.write_str("Lookup(..)"),
        }
    }
}

/// Scores and win flags of a resolved pairing, oriented to the matchup's own sides.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Scoreline {
    pub scores: [i64; 2],
    pub alt_scores: [i64; 2],
    pub wins: [bool; 2],
    pub alt_wins: [bool; 2],
}

impl Scoreline {
    /// Orient a recorded result so index 0 belongs to `first`.
    fn oriented(result: &MatchResult, first: &Competitor) -> Self {
        let line = Self {
            scores: result.scores,
            alt_scores: result.alt_scores,
            wins: result.wins,
            alt_wins: result.alt_wins,
        };
        if result.first.id == first.id {
            line
        } else {
            Self {
                scores: [line.scores[1], line.scores[0]],
                alt_scores: [line.alt_scores[1], line.alt_scores[0]],
                wins: [line.wins[1], line.wins[0]],
                alt_wins: [line.alt_wins[1], line.alt_wins[0]],
            }
        }
    }

    /// Differential deltas for side `side` (0 or 1).
    pub fn delta(&self, side: usize) -> DifferentialDelta {
        let other = 1 - side;
        let margin = |won: bool| if won { 1 } else { -1 };
        DifferentialDelta::new(
            self.scores[side] - self.scores[other],
            self.alt_scores[side] - self.alt_scores[other],
            margin(self.wins[side]),
            margin(self.alt_wins[side]),
        )
    }
}

/// Resolved state of one pairing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchupOutcome {
    pub first: Option<Competitor>,
    pub second: Option<Competitor>,
    /// `None` until a recorded result has been matched to the pairing.
    pub score: Option<Scoreline>,
    /// Decided by primary score only; `None` on a tie or without a result.
    pub winner: Option<Competitor>,
    pub loser: Option<Competitor>,
    pub winner_score: Option<i64>,
    pub loser_score: Option<i64>,
    /// This pairing's contribution alone.
    pub differentials: Option<Differentials>,
}

impl MatchupOutcome {
    fn unplayed(first: Option<Competitor>, second: Option<Competitor>) -> Self {
        Self {
            first,
            second,
            ..Self::default()
        }
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }
}

/// Resolve a pairing of already looked-up competitors against the context.
pub(crate) fn resolve_pairing(
    first: Option<Competitor>,
    second: Option<Competitor>,
    ctx: &mut BracketContext<'_>,
) -> Result<MatchupOutcome, BracketError> {
    let (Some(a), Some(b)) = (first.as_ref(), second.as_ref()) else {
        return Ok(MatchupOutcome::unplayed(first, second));
    };
    // both sides must be known to the shared tracker before a result is consumed
    if let Some(tracker) = ctx.tracker.as_deref() {
        tracker.slot(a)?;
        tracker.slot(b)?;
    }
    let Some(result) = ctx.results.take(ctx.registry, a, b)? else {
        log::debug!("No result available for {} vs {}", a.name, b.name);
        return Ok(MatchupOutcome::unplayed(first, second));
    };

    let line = Scoreline::oriented(&result, a);
    let (delta_a, delta_b) = (line.delta(0), line.delta(1));

    let mut differentials = Differentials::new(ctx.registry);
    differentials.add(a, delta_a)?;
    differentials.add(b, delta_b)?;
    if let Some(tracker) = ctx.tracker.as_deref_mut() {
        tracker.add(a, delta_a)?;
        tracker.add(b, delta_b)?;
    }

    let [score_a, score_b] = line.scores;
    let decided = match score_a.cmp(&score_b) {
        std::cmp::Ordering::Greater => Some((a, b, score_a, score_b)),
        std::cmp::Ordering::Less => Some((b, a, score_b, score_a)),
        std::cmp::Ordering::Equal => None,
    };
    let (winner, loser, winner_score, loser_score) = match decided {
        Some((w, l, ws, ls)) => (Some(w.clone()), Some(l.clone()), Some(ws), Some(ls)),
        None => (None, None, None, None),
    };

    Ok(MatchupOutcome {
        first: first.clone(),
        second: second.clone(),
        score: Some(line),
        winner,
        loser,
        winner_score,
        loser_score,
        differentials: Some(differentials),
    })
}

/// One head-to-head pairing whose sides may be fixed or looked up lazily.
#[derive(Debug)]
pub struct MatchupResolver {
    pub first: CompetitorSource,
    pub second: CompetitorSource,
}

impl MatchupResolver {
    pub fn new(first: impl Into<CompetitorSource>, second: impl Into<CompetitorSource>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Resolve outside of a bracket (lookups see no seeding and no node outcomes).
    pub fn resolve(&self, ctx: &mut BracketContext<'_>) -> Result<MatchupOutcome, BracketError> {
        self.resolve_in(ctx, None, None)
    }

    pub(crate) fn resolve_in(
        &self,
        ctx: &mut BracketContext<'_>,
        seeding: Option<&Seeding>,
        outcomes: Option<&Outcomes>,
    ) -> Result<MatchupOutcome, BracketError> {
        let (first, second) = {
            let view = ctx.view(seeding, outcomes);
            (self.first.get(&view), self.second.get(&view))
        };
        resolve_pairing(first, second, ctx)
    }
}
