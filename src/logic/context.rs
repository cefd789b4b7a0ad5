//! Shared resolution context passed through every resolver.

use crate::logic::bracket::{NodeOutcome, Outcomes};
use crate::logic::differentials::Differentials;
use crate::logic::seeding::Seeding;
use crate::models::{CompetitorRegistry, ResultLog};

/// Everything a resolver reads or mutates: the registry, the result log it consumes
/// from, and an optional shared tracker that every resolved pairing also feeds.
pub struct BracketContext<'a> {
    pub registry: &'a CompetitorRegistry,
    pub results: &'a mut ResultLog,
    pub tracker: Option<&'a mut Differentials>,
}

impl<'a> BracketContext<'a> {
    pub fn new(registry: &'a CompetitorRegistry, results: &'a mut ResultLog) -> Self {
        Self {
            registry,
            results,
            tracker: None,
        }
    }

    pub fn with_tracker(mut self, tracker: &'a mut Differentials) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Read-only snapshot handed to lazy source lookups.
    pub(crate) fn view<'v>(
        &'v self,
        seeding: Option<&'v Seeding>,
        outcomes: Option<&'v Outcomes>,
    ) -> BracketView<'v> {
        BracketView {
            registry: self.registry,
            results: &*self.results,
            tracker: self.tracker.as_deref(),
            seeding,
            outcomes,
        }
    }
}

/// What a lazy competitor or seeding lookup can see when it is evaluated.
pub struct BracketView<'a> {
    pub registry: &'a CompetitorRegistry,
    pub results: &'a ResultLog,
    pub tracker: Option<&'a Differentials>,
    /// The bracket's initial seeding, when resolving inside a bracket.
    pub seeding: Option<&'a Seeding>,
    outcomes: Option<&'a Outcomes>,
}

impl<'a> BracketView<'a> {
    /// Latest recorded outcome of a bracket node, if it has been computed.
    pub fn outcome(&self, key: &str) -> Option<&'a NodeOutcome> {
        self.outcomes.and_then(|outcomes| outcomes.get(key))
    }
}
