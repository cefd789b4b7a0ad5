//! Bracket engine logic: differentials, seeding, pairing and resolution.

mod bracket;
mod context;
mod differentials;
mod matchup;
mod pairing;
mod round;
mod seeding;

pub use bracket::{Bracket, BracketNode, NodeOutcome, Outcomes};
pub use context::{BracketContext, BracketView};
pub use differentials::{DifferentialDelta, DifferentialTrack, Differentials, Track};
pub use matchup::{CompetitorSource, MatchupOutcome, MatchupResolver, Scoreline};
pub use pairing::PairingStrategy;
pub use round::{RoundOutcome, RoundResolver, SeedingSource};
pub use seeding::{RematchSearch, Seeding, SortCriterion, SortSource};
