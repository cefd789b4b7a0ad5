//! Tournament bracket engine: library with models and resolution logic.
//!
//! Pure and synchronous: callers register competitors and recorded results, then resolve
//! matchups, rounds or a whole bracket against them.

pub mod fixture;
pub mod logic;
pub mod models;

pub use logic::{
    Bracket, BracketContext, BracketNode, BracketView, CompetitorSource, DifferentialDelta,
    DifferentialTrack, Differentials, MatchupOutcome, MatchupResolver, NodeOutcome, Outcomes,
    PairingStrategy, RematchSearch, RoundOutcome, RoundResolver, Scoreline, Seeding,
    SeedingSource, SortCriterion, SortSource, Track,
};
pub use models::{
    BracketError, Competitor, CompetitorId, CompetitorRegistry, Identifier, KeyIndex, MatchResult,
    MatchResultBuilder, ResultLog,
};
