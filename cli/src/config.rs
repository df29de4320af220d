use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use scanword_core::{Lives, RoundConfig};
use scanword_session::SessionConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Words played in order.
    pub words: Vec<String>,
    pub starting_lives: Lives,
    #[serde(flatten)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words: vec!["COELHO".into()],
            starting_lives: RoundConfig::DEFAULT_LIVES,
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Checks that every word of the pool can start a round.
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            bail!("word list is empty");
        }
        for word in &self.words {
            RoundConfig::new(word, self.starting_lives)
                .with_context(|| format!("cannot play {word:?}"))?;
        }
        Ok(())
    }
}

/// Cycles through the configured words.
#[derive(Clone, Debug)]
pub struct WordPool {
    words: Vec<String>,
    index: usize,
    starting_lives: Lives,
}

impl WordPool {
    pub fn new(config: &Config) -> Self {
        Self {
            words: config.words.clone(),
            index: 0,
            starting_lives: config.starting_lives,
        }
    }

    pub fn current(&self) -> Result<RoundConfig> {
        let word = self
            .words
            .get(self.index)
            .context("word list is empty")?;
        Ok(RoundConfig::new(word, self.starting_lives)?)
    }

    pub fn advance(&mut self) -> Result<RoundConfig> {
        if !self.words.is_empty() {
            self.index = (self.index + 1) % self.words.len();
        }
        self.current()
    }
}
