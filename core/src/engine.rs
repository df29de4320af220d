use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for RoundStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Sole owner of a round: secret word, progress mask, lives and guesses.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEngine {
    config: RoundConfig,
    progress: Vec<Slot>,
    lives: Lives,
    guessed: HashSet<char>,
    state: RoundStatus,
    error_flash: Option<FlashTicket>,
    epoch: Epoch,
    flash_seq: u32,
}

impl PlayEngine {
    pub fn new(secret_word: &str, starting_lives: Lives) -> Result<Self> {
        RoundConfig::new(secret_word, starting_lives).map(Self::from_config)
    }

    pub fn from_config(config: RoundConfig) -> Self {
        Self::fresh(config, Epoch::default())
    }

    fn fresh(config: RoundConfig, epoch: Epoch) -> Self {
        log::info!(
            "round {} started: {} letters, {} lives",
            epoch,
            config.word().len(),
            config.starting_lives()
        );
        Self {
            progress: alloc::vec![Slot::Unknown; config.word().len()],
            lives: config.starting_lives(),
            guessed: HashSet::new(),
            state: Default::default(),
            error_flash: None,
            epoch,
            flash_seq: 0,
            config,
        }
    }

    /// Replaces the current round. On error the current round is left as it was.
    pub fn start_round(&mut self, secret_word: &str, starting_lives: Lives) -> Result<()> {
        let config = RoundConfig::new(secret_word, starting_lives)?;
        self.start_round_with(config);
        Ok(())
    }

    pub fn start_round_with(&mut self, config: RoundConfig) {
        *self = Self::fresh(config, self.epoch.next());
    }

    /// Plays the same word again with a full life budget.
    pub fn reset(&mut self) {
        self.start_round_with(self.config.clone());
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn secret_word(&self) -> &SecretWord {
        self.config.word()
    }

    pub fn state(&self) -> RoundStatus {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn lives(&self) -> Lives {
        self.lives
    }

    pub fn starting_lives(&self) -> Lives {
        self.config.starting_lives()
    }

    pub fn progress(&self) -> &[Slot] {
        &self.progress
    }

    pub fn unknown_count(&self) -> usize {
        self.progress.iter().filter(|slot| slot.is_unknown()).count()
    }

    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed.contains(&letter)
    }

    /// Guessed letters in ascending order.
    pub fn guessed(&self) -> Vec<char> {
        let mut guessed: Vec<char> = self.guessed.iter().copied().collect();
        guessed.sort_unstable();
        guessed
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn error_flash(&self) -> Option<FlashTicket> {
        self.error_flash
    }

    pub fn is_error_flash_active(&self) -> bool {
        self.error_flash.is_some()
    }

    /// Clears the error flash if `ticket` belongs to the flash armed in this round.
    pub fn clear_error_flash(&mut self, ticket: FlashTicket) -> bool {
        if self.error_flash == Some(ticket) {
            self.error_flash = None;
            true
        } else {
            log::trace!(
                "stale flash ticket from round {} ignored in round {}",
                ticket.epoch(),
                self.epoch
            );
            false
        }
    }

    /// Applies one raw scan as a move.
    ///
    /// Malformed scans, repeats, and anything arriving while the error flash is
    /// shown or after the round ended are ignored without touching the round.
    pub fn submit_guess(&mut self, raw: &str) -> MoveOutcome {
        if let Err(reason) = self.check_accepting() {
            log::trace!("scan {:?} ignored: {:?}", raw, reason);
            return MoveOutcome::Ignored(reason);
        }

        let letter = match normalize(raw) {
            Ok(letter) => letter,
            Err(err) => {
                log::trace!("scan {:?} ignored: {}", raw, err);
                return MoveOutcome::Ignored(IgnoreReason::Malformed);
            }
        };

        if !self.guessed.insert(letter) {
            log::trace!("letter {:?} already guessed", letter);
            return MoveOutcome::Ignored(IgnoreReason::AlreadyGuessed(letter));
        }

        let positions: Positions = self.config.word().positions_of(letter).collect();
        if positions.is_empty() {
            self.miss(letter)
        } else {
            self.hit(letter, positions)
        }
    }

    fn hit(&mut self, letter: char, positions: Positions) -> MoveOutcome {
        for &pos in &positions {
            self.progress[pos] = Slot::Revealed(letter);
        }

        let won = self.progress.iter().all(|slot| !slot.is_unknown());
        if won {
            self.end_round(RoundStatus::Won);
        }
        log::debug!("letter {:?} revealed at {:?}", letter, positions.as_slice());

        MoveOutcome::Correct {
            letter,
            positions,
            won,
        }
    }

    fn miss(&mut self, letter: char) -> MoveOutcome {
        self.lives = self.lives.saturating_sub(1);
        self.flash_seq = self.flash_seq.wrapping_add(1);
        self.error_flash = Some(FlashTicket::new(self.epoch, self.flash_seq));

        let lost = self.lives == 0;
        if lost {
            self.end_round(RoundStatus::Lost);
        }
        log::debug!("letter {:?} missed, {} lives left", letter, self.lives);

        MoveOutcome::Incorrect {
            letter,
            lives_left: self.lives,
            lost,
        }
    }

    fn end_round(&mut self, status: RoundStatus) {
        if self.state.is_finished() {
            return;
        }
        self.state = status;
        log::info!("round {} finished: {:?}", self.epoch, status);
    }

    fn check_accepting(&self) -> core::result::Result<(), IgnoreReason> {
        if self.state.is_finished() {
            Err(IgnoreReason::RoundOver)
        } else if self.error_flash.is_some() {
            Err(IgnoreReason::ErrorFlash)
        } else {
            Ok(())
        }
    }
}
