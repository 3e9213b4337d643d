//! Line-oriented input adapter: turns typed keys and words into game commands.

use std::str::FromStr;

use crate::engine::{Direction, Input};

/// A parsed command from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Input),
    Quit,
    Help,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseInputError {
    #[error("empty input")]
    Empty,
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(ParseInputError::Empty);
        }
        if let Ok(dir) = token.parse::<Direction>() {
            return Ok(Command::Play(Input::Move(dir)));
        }
        let dir = match token.to_ascii_lowercase().as_str() {
            "w" | "k" | "\u{2191}" => Direction::Up,
            "s" | "j" | "\u{2193}" => Direction::Down,
            "a" | "h" | "\u{2190}" => Direction::Left,
            "d" | "l" | "\u{2192}" => Direction::Right,
            "n" | "r" | "new" | "reset" => return Ok(Command::Play(Input::Reset)),
            "q" | "quit" | "exit" => return Ok(Command::Quit),
            "?" | "help" => return Ok(Command::Help),
            _ => return Err(ParseInputError::Unknown(token.to_string())),
        };
        Ok(Command::Play(Input::Move(dir)))
    }
}

pub const HELP: &str = "\
moves: w/a/s/d, h/j/k/l, arrows, or up/down/left/right
new:   n, r, new, reset
quit:  q, quit";
