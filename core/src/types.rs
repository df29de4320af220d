use alloc::vec::Vec;
use core::fmt::{self, Write};
use serde::{Deserialize, Serialize};

use crate::*;

/// Count type used for remaining and starting lives.
pub type Lives = u8;

/// Reveal state of one position of the secret word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Unknown,
    Revealed(char),
}

impl Slot {
    /// Marker shown in place of a letter that was not found yet.
    pub const PLACEHOLDER: char = '_';

    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Unknown => Self::PLACEHOLDER,
            Self::Revealed(letter) => letter,
        }
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Round identity, bumped every time a round starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u32);

impl Epoch {
    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one armed error flash.
///
/// Only the ticket of the flash that is currently armed, in the current round,
/// is able to clear it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlashTicket {
    epoch: Epoch,
    seq: u32,
}

impl FlashTicket {
    pub(crate) const fn new(epoch: Epoch, seq: u32) -> Self {
        Self { epoch, seq }
    }

    pub const fn epoch(self) -> Epoch {
        self.epoch
    }
}

/// Canonical letters of the word being guessed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SecretWord(Vec<char>);

impl SecretWord {
    pub fn parse(raw: &str) -> Result<Self> {
        let letters = canonicalize_word(raw);
        if letters.is_empty() {
            return Err(ConfigIssue::EmptyWord.into());
        }
        if letters.iter().any(|letter| letter.is_whitespace()) {
            return Err(ConfigIssue::WhitespaceInWord.into());
        }
        Ok(Self(letters))
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn letters(&self) -> &[char] {
        &self.0
    }

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&letter)
    }

    pub fn positions_of(&self, letter: char) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(move |&(_, &candidate)| candidate == letter)
            .map(|(pos, _)| pos)
    }
}

impl fmt::Display for SecretWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|&letter| f.write_char(letter))
    }
}
