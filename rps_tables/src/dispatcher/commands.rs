//! Command vocabulary understood by the dispatcher.

use crate::game::Choice;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A recognised command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open a table for the sender
    Join,

    /// Leave the sender's table
    Exit,

    /// Throw a hand at the sender's table
    Play(Choice),
}

/// Text that is not part of the vocabulary
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown command: {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/join" => Ok(Self::Join),
            "/exit" => Ok(Self::Exit),
            "/rock" => Ok(Self::Play(Choice::Rock)),
            "/scissors" => Ok(Self::Play(Choice::Scissors)),
            "/paper" => Ok(Self::Play(Choice::Paper)),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join => write!(f, "/join"),
            Self::Exit => write!(f, "/exit"),
            Self::Play(choice) => write!(f, "/{choice}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!("/join".parse::<Command>(), Ok(Command::Join));
        assert_eq!("/exit".parse::<Command>(), Ok(Command::Exit));
        assert_eq!("/rock".parse::<Command>(), Ok(Command::Play(Choice::Rock)));
        assert_eq!("/scissors".parse::<Command>(), Ok(Command::Play(Choice::Scissors)));
        assert_eq!("/paper".parse::<Command>(), Ok(Command::Play(Choice::Paper)));
    }

    #[test]
    fn test_parse_is_case_sensitive_and_exact() {
        for text in ["/Join", "/ROCK", "rock", " /rock", "/rock ", "", "/lizard"] {
            assert_eq!(
                text.parse::<Command>(),
                Err(UnknownCommand(text.to_string())),
                "{text:?} should be unknown"
            );
        }
    }

    #[test]
    fn test_display_matches_vocabulary() {
        for text in ["/join", "/exit", "/rock", "/scissors", "/paper"] {
            let command: Command = text.parse().unwrap();
            assert_eq!(command.to_string(), text);
        }
    }
}
