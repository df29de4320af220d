use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid round configuration: {0}")]
    InvalidConfiguration(ConfigIssue),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("secret word is empty")]
    EmptyWord,
    #[error("secret word contains whitespace")]
    WhitespaceInWord,
    #[error("starting lives must be at least 1")]
    NoLives,
}

impl From<ConfigIssue> for GameError {
    fn from(issue: ConfigIssue) -> Self {
        Self::InvalidConfiguration(issue)
    }
}

/// Why a raw scan could not be turned into a canonical character.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Scan does not hold exactly one character")]
    NotSingleCharacter,
}

pub type Result<T> = core::result::Result<T, GameError>;
