//! Rock-paper-scissors rules.
//!
//! This module provides:
//! - The three hands and the outcome of a round
//! - The pure judging rule
//! - Opponents that draw the house hand for each round

pub mod entities;
pub mod opponent;

pub use entities::{Choice, Outcome, RoundReport, judge};
pub use opponent::{FixedOpponent, Opponent, RandomOpponent, resolve};
