//! The house side of a table.

use super::entities::{Choice, RoundReport};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of the opponent's hand for each round.
pub trait Opponent: Send {
    fn draw(&mut self) -> Choice;
}

/// Draws uniformly from rock, scissors and paper.
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible opponent for simulations.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn draw(&mut self) -> Choice {
        Choice::ALL[self.rng.random_range(0..Choice::ALL.len())]
    }
}

/// Always throws the same hand.
#[derive(Clone, Copy, Debug)]
pub struct FixedOpponent(pub Choice);

impl Opponent for FixedOpponent {
    fn draw(&mut self) -> Choice {
        self.0
    }
}

/// Plays one round of `choice` against a fresh draw from `opponent`.
pub fn resolve(choice: Choice, opponent: &mut dyn Opponent) -> RoundReport {
    RoundReport::new(choice, opponent.draw())
}
