//! Bracket orchestration: keyed matchup/round nodes recomputed against shared context.

use crate::logic::context::BracketContext;
use crate::logic::matchup::{MatchupOutcome, MatchupResolver};
use crate::logic::round::{RoundOutcome, RoundResolver};
use crate::logic::seeding::Seeding;
use crate::models::{BracketError, Competitor};
use indexmap::IndexMap;

/// Latest outcome of every node, keyed like the nodes.
pub type Outcomes = IndexMap<String, NodeOutcome>;

/// A node of the bracket.
#[derive(Debug)]
pub enum BracketNode {
    Matchup(MatchupResolver),
    Round(RoundResolver),
}

impl BracketNode {
    fn resolve(
        &self,
        ctx: &mut BracketContext<'_>,
        seeding: &Seeding,
        outcomes: &Outcomes,
    ) -> Result<NodeOutcome, BracketError> {
        Ok(match self {
            BracketNode::Matchup(m) => {
                NodeOutcome::Matchup(m.resolve_in(ctx, Some(seeding), Some(outcomes))?)
            }
            BracketNode::Round(r) => {
                NodeOutcome::Round(r.resolve_in(ctx, Some(seeding), Some(outcomes))?)
            }
        })
    }
}

impl From<MatchupResolver> for BracketNode {
    fn from(m: MatchupResolver) -> Self {
        BracketNode::Matchup(m)
    }
}

impl From<RoundResolver> for BracketNode {
    fn from(r: RoundResolver) -> Self {
        BracketNode::Round(r)
    }
}

/// Outcome of a node, matching its kind.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeOutcome {
    Matchup(MatchupOutcome),
    Round(RoundOutcome),
}

impl NodeOutcome {
    /// The matchup winner, or the first winners slot of a round.
    pub fn winner(&self) -> Option<&Competitor> {
        match self {
            NodeOutcome::Matchup(m) => m.winner.as_ref(),
            NodeOutcome::Round(r) => r.winners.get(0),
        }
    }

    /// The matchup loser, or the first losers slot of a round.
    pub fn loser(&self) -> Option<&Competitor> {
        match self {
            NodeOutcome::Matchup(m) => m.loser.as_ref(),
            NodeOutcome::Round(r) => r.losers.get(0),
        }
    }

    /// Winners as a seeding (a single slot for a matchup).
    pub fn winners_seeding(&self) -> Seeding {
        match self {
            NodeOutcome::Matchup(m) => Seeding::from_slots(vec![m.winner.clone()]),
            NodeOutcome::Round(r) => r.winners.clone(),
        }
    }

    /// Losers as a seeding (a single slot for a matchup).
    pub fn losers_seeding(&self) -> Seeding {
        match self {
            NodeOutcome::Matchup(m) => Seeding::from_slots(vec![m.loser.clone()]),
            NodeOutcome::Round(r) => r.losers.clone(),
        }
    }

    pub fn as_matchup(&self) -> Option<&MatchupOutcome> {
        match self {
            NodeOutcome::Matchup(m) => Some(m),
            NodeOutcome::Round(_) => None,
        }
    }

    pub fn as_round(&self) -> Option<&RoundOutcome> {
        match self {
            NodeOutcome::Round(r) => Some(r),
            NodeOutcome::Matchup(_) => None,
        }
    }
}

/// Owns every node and its latest outcome.
///
/// Nodes are recomputed in insertion order. Nodes that feed on each other do so through
/// lookup sources, which read the outcome recorded most recently under the referenced key.
#[derive(Debug, Default)]
pub struct Bracket {
    nodes: IndexMap<String, BracketNode>,
    outcomes: Outcomes,
    complete: bool,
}

impl Bracket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a node under `key`.
    pub fn next(&mut self, key: impl Into<String>, node: impl Into<BracketNode>) -> &mut Self {
        self.nodes.insert(key.into(), node.into());
        self
    }

    pub fn node(&self, key: &str) -> Option<&BracketNode> {
        self.nodes.get(key)
    }

    pub fn outcome(&self, key: &str) -> Option<&NodeOutcome> {
        self.outcomes.get(key)
    }

    pub fn outcomes(&self) -> &Outcomes {
        &self.outcomes
    }

    /// True after the last recompute if every node had a determined winner.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Resolve every node against `seeding` and the shared context; returns the completion flag.
    pub fn recompute(
        &mut self,
        seeding: &Seeding,
        ctx: &mut BracketContext<'_>,
    ) -> Result<bool, BracketError> {
        self.complete = false;
        let mut complete = true;
        for (key, node) in &self.nodes {
            let outcome = node.resolve(ctx, seeding, &self.outcomes)?;
            match outcome.winner() {
                Some(winner) => log::debug!("Node {} resolved, winner {}", key, winner.name),
                None => {
                    log::debug!("Node {} unresolved", key);
                    complete = false;
                }
            }
            self.outcomes.insert(key.clone(), outcome);
        }
        self.complete = complete;
        if complete {
            log::info!("Bracket complete ({} node(s))", self.nodes.len());
        }
        Ok(complete)
    }
}
