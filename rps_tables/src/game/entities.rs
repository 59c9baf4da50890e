use std::fmt;

/// A hand a player (or the house) can throw.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Choice {
    Rock,
    Scissors,
    Paper,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Scissors, Choice::Paper];

    /// The choice this one defeats.
    pub fn beats(self) -> Choice {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Rock => "rock",
            Self::Scissors => "scissors",
            Self::Paper => "paper",
        };
        write!(f, "{repr}")
    }
}

/// Outcome of a round from the player's point of view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Outcome {
    Victory,
    Defeat,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Victory => "Victory",
            Self::Defeat => "Defeat",
            Self::Draw => "Draw",
        };
        write!(f, "{repr}")
    }
}

/// Decides a round. Rock beats scissors, scissors beats paper,
/// paper beats rock and equal hands draw.
pub fn judge(player: Choice, opponent: Choice) -> Outcome {
    if player == opponent {
        Outcome::Draw
    } else if player.beats() == opponent {
        Outcome::Victory
    } else {
        Outcome::Defeat
    }
}

/// What a table posts back after resolving one round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoundReport {
    pub player: Choice,
    pub opponent: Choice,
    pub outcome: Outcome,
}

impl RoundReport {
    pub fn new(player: Choice, opponent: Choice) -> Self {
        Self {
            player,
            opponent,
            outcome: judge(player, opponent),
        }
    }

    pub fn win_increment(&self) -> u32 {
        u32::from(self.outcome == Outcome::Victory)
    }

    pub fn lose_increment(&self) -> u32 {
        u32::from(self.outcome == Outcome::Defeat)
    }

    /// Reply text shown to the player.
    pub fn text(&self) -> String {
        match self.outcome {
            Outcome::Victory => format!(
                "{}: your {} beats {}",
                self.outcome, self.player, self.opponent
            ),
            Outcome::Defeat => format!(
                "{}: {} beats your {}",
                self.outcome, self.opponent, self.player
            ),
            Outcome::Draw => format!("{}: both threw {}", self.outcome, self.player),
        }
    }
}
