#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use engine::*;
pub use error::*;
pub use normalize::*;
pub use observation::*;
pub use types::*;

mod engine;
mod error;
mod normalize;
mod observation;
mod types;

/// Word and life budget a round is started from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    word: SecretWord,
    starting_lives: Lives,
}

impl RoundConfig {
    pub const DEFAULT_LIVES: Lives = 5;

    pub fn new(word: &str, starting_lives: Lives) -> Result<Self> {
        if starting_lives == 0 {
            return Err(ConfigIssue::NoLives.into());
        }
        let word = SecretWord::parse(word)?;
        Ok(Self {
            word,
            starting_lives,
        })
    }

    pub fn with_default_lives(word: &str) -> Result<Self> {
        Self::new(word, Self::DEFAULT_LIVES)
    }

    pub fn word(&self) -> &SecretWord {
        &self.word
    }

    pub const fn starting_lives(&self) -> Lives {
        self.starting_lives
    }
}

/// Word positions uncovered by a single guess.
pub type Positions = SmallVec<[usize; 4]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    RoundOver,
    ErrorFlash,
    Malformed,
    AlreadyGuessed(char),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored(IgnoreReason),
    Correct {
        letter: char,
        positions: Positions,
        won: bool,
    },
    Incorrect {
        letter: char,
        lives_left: Lives,
        lost: bool,
    },
}

impl MoveOutcome {
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    /// Whether the guess changed the round.
    pub const fn has_update(&self) -> bool {
        !self.is_ignored()
    }

    pub const fn wants_haptic(&self) -> bool {
        self.has_update()
    }

    /// Whether this move ended the round, which also means scanning should stop.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Correct { won: true, .. } | Self::Incorrect { lost: true, .. }
        )
    }

    pub const fn letter(&self) -> Option<char> {
        match *self {
            Self::Ignored(IgnoreReason::AlreadyGuessed(letter))
            | Self::Correct { letter, .. }
            | Self::Incorrect { letter, .. } => Some(letter),
            Self::Ignored(_) => None,
        }
    }
}
