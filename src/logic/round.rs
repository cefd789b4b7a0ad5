//! Round resolution: pair a whole seeding, resolve every pairing, split winners from losers.

use crate::logic::bracket::Outcomes;
use crate::logic::context::{BracketContext, BracketView};
use crate::logic::differentials::Differentials;
use crate::logic::matchup::{resolve_pairing, MatchupOutcome};
use crate::logic::pairing::PairingStrategy;
use crate::logic::seeding::{RematchSearch, Seeding};
use crate::models::BracketError;
use std::fmt;

type SeedingLookup = Box<dyn Fn(&BracketView<'_>) -> Result<Seeding, BracketError>>;

/// Where a round's seeding comes from.
pub enum SeedingSource {
    Direct(Seeding),
    /// Evaluated every time the round is resolved.
    Lookup(SeedingLookup),
}

impl SeedingSource {
    pub fn lookup(f: impl Fn(&BracketView<'_>) -> Result<Seeding, BracketError> + 'static) -> Self {
        SeedingSource::Lookup(Box::new(f))
    }

    /// The bracket's initial seeding (empty outside a bracket).
    pub fn initial() -> Self {
        Self::lookup(|view| Ok(view.seeding.cloned().unwrap_or_default()))
    }

    /// Winners of an earlier node, in pairing order.
    pub fn winners_of(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::lookup(move |view| {
            Ok(view
                .outcome(&key)
                .map(|o| o.winners_seeding())
                .unwrap_or_default())
        })
    }

    /// Losers of an earlier node, in pairing order.
    pub fn losers_of(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::lookup(move |view| {
            Ok(view
                .outcome(&key)
                .map(|o| o.losers_seeding())
                .unwrap_or_default())
        })
    }

    pub fn get(&self, view: &BracketView<'_>) -> Result<Seeding, BracketError> {
        match self {
            SeedingSource::Direct(seeding) => Ok(seeding.clone()),
            SeedingSource::Lookup(f) => f(view),
        }
    }
}

impl From<Seeding> for SeedingSource {
    fn from(seeding: Seeding) -> Self {
        SeedingSource::Direct(seeding)
    }
}

impl fmt::Debug for SeedingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedingSource::Direct(s) => f.debug_tuple("Direct").field(s).finish(),
            SeedingSource::Lookup(_) => f.write_str("Lookup(..)"),
        }
    }
}

/// Resolved state of a full round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    pub matchups: Vec<MatchupOutcome>,
    /// One slot per pairing; unresolved where the pairing has no winner.
    pub winners: Seeding,
    pub losers: Seeding,
    /// Sum of every pairing's contribution.
    pub differentials: Differentials,
}

/// A round: one seeding split into pairings by a strategy.
#[derive(Debug)]
pub struct RoundResolver {
    pub seeding: SeedingSource,
    pub strategy: PairingStrategy,
    /// Reorder the seeding so no pairing repeats a consumed result, when possible.
    pub avoid_rematches: bool,
}

impl RoundResolver {
    pub fn new(seeding: impl Into<SeedingSource>, strategy: PairingStrategy) -> Self {
        Self {
            seeding: seeding.into(),
            strategy,
            avoid_rematches: false,
        }
    }

    /// Search for a rematch-free arrangement before pairing.
    ///
    /// A random round is shuffled once by the search and then paired sequentially.
    pub fn avoiding_rematches(mut self) -> Self {
        self.avoid_rematches = true;
        self
    }

    /// Resolve outside of a bracket (lookups see no seeding and no node outcomes).
    pub fn resolve(&self, ctx: &mut BracketContext<'_>) -> Result<RoundOutcome, BracketError> {
        self.resolve_in(ctx, None, None)
    }

    pub(crate) fn resolve_in(
        &self,
        ctx: &mut BracketContext<'_>,
        seeding: Option<&Seeding>,
        outcomes: Option<&Outcomes>,
    ) -> Result<RoundOutcome, BracketError> {
        let mut seeding = self.seeding.get(&ctx.view(seeding, outcomes))?;
        let strategy = if self.avoid_rematches {
            if seeding.sort_no_rematches(&*ctx.results, self.strategy, &[])?
                == RematchSearch::Exhausted
            {
                log::warn!("Keeping seeding order; every arrangement contains a rematch");
            }
            self.strategy.without_shuffle()
        } else {
            self.strategy
        };
        let pairings = strategy.pair_seeding(&seeding);

        let matchups = pairings
            .into_iter()
            .map(|(first, second)| resolve_pairing(first, second, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let mut differentials = Differentials::new(ctx.registry);
        differentials.combine(matchups.iter().filter_map(|m| m.differentials.as_ref()));

        let winners = Seeding::from_slots(matchups.iter().map(|m| m.winner.clone()).collect());
        let losers = Seeding::from_slots(matchups.iter().map(|m| m.loser.clone()).collect());

        Ok(RoundOutcome {
            matchups,
            winners,
            losers,
            differentials,
        })
    }
}
