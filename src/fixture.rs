//! Tournament fixtures: a JSON description of competitors, results and bracket nodes,
//! and the standings report produced by running it.

use crate::logic::{
    Bracket, BracketContext, BracketNode, CompetitorSource, Differentials, MatchupResolver,
    PairingStrategy, RoundResolver, Seeding, SeedingSource, SortCriterion, Track,
};
use crate::models::{
    BracketError, Competitor, CompetitorRegistry, Identifier, MatchResult, ResultLog,
};
use serde::{Deserialize, Serialize};

/// A full tournament description.
#[derive(Clone, Debug, Deserialize)]
pub struct Fixture {
    pub competitors: Vec<Competitor>,
    /// Initial seeding; `null` entries are unresolved slots.
    #[serde(default)]
    pub seeding: Vec<Option<Identifier>>,
    #[serde(default)]
    pub results: Vec<ResultRecord>,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    /// Standings order, highest priority first.
    #[serde(default = "default_tiebreakers")]
    pub tiebreakers: Vec<Tiebreaker>,
}

fn default_tiebreakers() -> Vec<Tiebreaker> {
    vec![
        Tiebreaker {
            track: Track::WinDiff,
            coefficient: -1,
        },
        Tiebreaker {
            track: Track::ScoreDiff,
            coefficient: -1,
        },
    ]
}

/// One recorded series. Unset overrides use the defaults of [`MatchResult`].
#[derive(Clone, Debug, Deserialize)]
pub struct ResultRecord {
    pub first: Identifier,
    pub second: Identifier,
    pub scores: [i64; 2],
    #[serde(default)]
    pub alt_scores: [Option<i64>; 2],
    #[serde(default)]
    pub wins: [Option<bool>; 2],
    #[serde(default)]
    pub alt_wins: [Option<bool>; 2],
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Tiebreaker {
    pub track: Track,
    pub coefficient: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeConfig {
    pub key: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Matchup {
        first: SlotConfig,
        second: SlotConfig,
    },
    Round {
        seeding: SeedingConfig,
        #[serde(default)]
        strategy: PairingStrategy,
        /// Reorder the seeding to avoid consumed pairings before pairing it.
        #[serde(default)]
        avoid_rematches: bool,
    },
}

/// One side of a matchup node.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotConfig {
    Seed(usize),
    Competitor(Identifier),
    WinnerOf(String),
    LoserOf(String),
    Empty,
}

/// The seeding a round node pairs.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingConfig {
    Initial,
    WinnersOf(String),
    LosersOf(String),
    Competitors(Vec<Option<Identifier>>),
}

/// Output of [`Fixture::run`].
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub complete: bool,
    pub nodes: Vec<NodeReport>,
    pub standings: Vec<StandingRow>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NodeReport {
    pub key: String,
    pub winners: Vec<Option<String>>,
    pub losers: Vec<Option<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StandingRow {
    pub rank: usize,
    pub name: String,
    pub score_diff: i64,
    pub alt_score_diff: i64,
    pub win_diff: i64,
    pub alt_win_diff: i64,
}

fn names(seeding: &Seeding) -> Vec<Option<String>> {
    seeding
        .slots()
        .iter()
        .map(|slot| slot.as_ref().map(|c| c.name.clone()))
        .collect()
}

impl SlotConfig {
    fn source(&self, registry: &CompetitorRegistry) -> Result<CompetitorSource, BracketError> {
        Ok(match self {
            SlotConfig::Seed(index) => CompetitorSource::seed(*index),
            SlotConfig::Competitor(id) => registry.resolve(id)?.clone().into(),
            SlotConfig::WinnerOf(key) => CompetitorSource::winner_of(key.as_str()),
            SlotConfig::LoserOf(key) => CompetitorSource::loser_of(key.as_str()),
            SlotConfig::Empty => CompetitorSource::empty(),
        })
    }
}

impl SeedingConfig {
    fn source(&self, registry: &CompetitorRegistry) -> Result<SeedingSource, BracketError> {
        Ok(match self {
            SeedingConfig::Initial => SeedingSource::initial(),
            SeedingConfig::WinnersOf(key) => SeedingSource::winners_of(key.as_str()),
            SeedingConfig::LosersOf(key) => SeedingSource::losers_of(key.as_str()),
            SeedingConfig::Competitors(ids) => {
                Seeding::from_identifiers(registry, ids.iter().cloned())?.into()
            }
        })
    }
}

impl NodeKind {
    fn build(&self, registry: &CompetitorRegistry) -> Result<BracketNode, BracketError> {
        Ok(match self {
            NodeKind::Matchup { first, second } => {
                MatchupResolver::new(first.source(registry)?, second.source(registry)?).into()
            }
            NodeKind::Round {
                seeding,
                strategy,
                avoid_rematches,
            } => {
                let round = RoundResolver::new(seeding.source(registry)?, *strategy);
                if *avoid_rematches {
                    round.avoiding_rematches().into()
                } else {
                    round.into()
                }
            }
        })
    }
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn registry(&self) -> Result<CompetitorRegistry, BracketError> {
        let mut registry = CompetitorRegistry::new();
        for competitor in &self.competitors {
            registry.register(competitor.clone())?;
        }
        Ok(registry)
    }

    pub fn result_log(&self, registry: &CompetitorRegistry) -> Result<ResultLog, BracketError> {
        let mut log = ResultLog::new();
        for record in &self.results {
            let first = registry.resolve(&record.first)?.clone();
            let second = registry.resolve(&record.second)?.clone();
            let result = MatchResult::builder(first, second, record.scores[0], record.scores[1])
                .alt_score_overrides(record.alt_scores)
                .wins(record.wins[0], record.wins[1])
                .alt_wins(record.alt_wins[0], record.alt_wins[1])
                .build();
            log.register(result);
        }
        Ok(log)
    }

    pub fn bracket(&self, registry: &CompetitorRegistry) -> Result<Bracket, BracketError> {
        let mut bracket = Bracket::new();
        for node in &self.nodes {
            bracket.next(node.key.clone(), node.kind.build(registry)?);
        }
        Ok(bracket)
    }

    /// Build everything, resolve the bracket once and rank all competitors by the tiebreakers.
    pub fn run(&self) -> Result<Report, BracketError> {
        let registry = self.registry()?;
        let mut results = self.result_log(&registry)?;
        let seeding = Seeding::from_identifiers(&registry, self.seeding.iter().cloned())?;
        let mut bracket = self.bracket(&registry)?;
        let mut tracker = Differentials::new(&registry);

        let complete = {
            let mut ctx = BracketContext::new(&registry, &mut results).with_tracker(&mut tracker);
            bracket.recompute(&seeding, &mut ctx)?
        };

        let nodes = bracket
            .outcomes()
            .iter()
            .map(|(key, outcome)| NodeReport {
                key: key.clone(),
                winners: names(&outcome.winners_seeding()),
                losers: names(&outcome.losers_seeding()),
            })
            .collect();

        let criteria: Vec<SortCriterion<'_>> = self
            .tiebreakers
            .iter()
            .map(|t| SortCriterion::track(t.coefficient, tracker.track(t.track)))
            .collect();
        let mut table =
            Seeding::from_slots(registry.competitors().iter().cloned().map(Some).collect());
        table.sort(&criteria)?;

        let mut standings = Vec::with_capacity(table.len());
        for (rank, competitor) in table.slots().iter().flatten().enumerate() {
            standings.push(StandingRow {
                rank: rank + 1,
                name: competitor.name.clone(),
                score_diff: tracker.score_diff.get(competitor)?,
                alt_score_diff: tracker.alt_score_diff.get(competitor)?,
                win_diff: tracker.win_diff.get(competitor)?,
                alt_win_diff: tracker.alt_win_diff.get(competitor)?,
            });
        }

        Ok(Report {
            complete,
            nodes,
            standings,
        })
    }
}
