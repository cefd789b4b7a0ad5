//! Data structures for the bracket engine: competitors, key index, recorded results.

mod competitor;
mod error;
mod registry;
mod result;

pub use competitor::{Competitor, CompetitorId, Identifier};
pub use error::BracketError;
pub use registry::{CompetitorRegistry, KeyIndex};
pub use result::{MatchResult, MatchResultBuilder, ResultLog};
