//! Pairing strategies: turn an ordered seeding into head-to-head pairs.

use crate::logic::seeding::Seeding;
use crate::models::Competitor;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a seeding is split into pairs. An odd trailing entry always sits out.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Top half position `i` meets bottom half position `i`: [A,B,C,D] -> (A,C),(B,D).
    #[default]
    Sequential,
    /// Top half position `i` meets the mirrored bottom half position: [A,B,C,D] -> (A,D),(B,C).
    Cross,
    /// Shuffle, then pair sequentially.
    Random,
}

impl PairingStrategy {
    /// Pair `items` using the thread RNG for [`PairingStrategy::Random`].
    pub fn pair<T: Clone>(self, items: &[T]) -> Vec<(T, T)> {
        self.pair_with(items, &mut rand::thread_rng())
    }

    /// Pair `items`, drawing any randomness from `rng`.
    pub fn pair_with<T: Clone, R: Rng + ?Sized>(self, items: &[T], rng: &mut R) -> Vec<(T, T)> {
        let mut items = items.to_vec();
        if self == PairingStrategy::Random {
            items.shuffle(rng);
        }
        if items.len() % 2 == 1 {
            items.pop();
        }
        let bottom = items.split_off(items.len() / 2);
        match self {
            PairingStrategy::Sequential | PairingStrategy::Random => {
                items.into_iter().zip(bottom).collect()
            }
            PairingStrategy::Cross => items.into_iter().zip(bottom.into_iter().rev()).collect(),
        }
    }

    /// The strategy that pairs a seeding whose order has already been drawn:
    /// [`PairingStrategy::Random`] becomes [`PairingStrategy::Sequential`].
    pub fn without_shuffle(self) -> Self {
        match self {
            PairingStrategy::Random => PairingStrategy::Sequential,
            other => other,
        }
    }

    /// Pair the slots of a seeding; unresolved slots pair as `None`.
    pub fn pair_seeding(self, seeding: &Seeding) -> Vec<(Option<Competitor>, Option<Competitor>)> {
        self.pair(seeding.slots())
    }
}
