use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only snapshot of a round, for whoever renders it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub epoch: Epoch,
    pub progress: Vec<Slot>,
    pub lives: Lives,
    pub starting_lives: Lives,
    pub status: RoundStatus,
    pub error_flash: bool,
    pub guessed: Vec<char>,
    /// The secret word, only disclosed once the round is over.
    pub solution: Option<String>,
}

impl Observation {
    pub fn from_engine(engine: &PlayEngine) -> Self {
        let solution = engine
            .is_finished()
            .then(|| engine.secret_word().to_string());

        Self {
            epoch: engine.epoch(),
            progress: engine.progress().to_vec(),
            lives: engine.lives(),
            starting_lives: engine.starting_lives(),
            status: engine.state(),
            error_flash: engine.is_error_flash_active(),
            guessed: engine.guessed(),
            solution,
        }
    }

    /// Progress mask with `_` for letters not found yet.
    pub fn masked_word(&self) -> String {
        self.progress.iter().map(|slot| slot.as_char()).collect()
    }
}
