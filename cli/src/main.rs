//! Terminal host for a scanword round.
//!
//! Scan batches are read from stdin, one JSON batch per line (or one raw
//! payload per line with `--plain`), and applied to a single session.

use std::io;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use futures::executor::block_on;
use scanword_session::{Session, command_channel};

use crate::alarm::FlashAlarm;
use crate::config::{Config, WordPool};
use crate::input::{StdinScanner, forward_lines};
use crate::render::TextObserver;

mod alarm;
mod config;
mod input;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with the word list and timings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Play this word instead of the configured list
    #[arg(short, long)]
    word: Option<String>,

    /// Starting lives
    #[arg(short, long)]
    lives: Option<u8>,

    /// How long input is blocked after a wrong letter, in milliseconds
    #[arg(long)]
    flash_ms: Option<u64>,

    /// Treat every input line as a raw payload instead of a JSON batch
    #[arg(long)]
    plain: bool,

    /// Simulate the camera permission being refused
    #[arg(long)]
    deny_camera: bool,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(word) = &self.word {
            config.words = vec![word.clone()];
        }
        if let Some(lives) = self.lives {
            config.starting_lives = lives;
        }
        if let Some(flash_ms) = self.flash_ms {
            config.session.error_flash = std::time::Duration::from_millis(flash_ms);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.load_config().context("Invalid configuration")?;
    log::debug!("config: {:?}", config);

    let pool = WordPool::new(&config);
    let round = pool.current()?;

    let (tx, rx) = command_channel();
    let alarm = FlashAlarm::new(tx.clone(), config.session.error_flash);
    let plain = args.plain;
    let reader = thread::spawn(move || forward_lines(io::stdin().lock(), tx, plain, pool));

    let mut session = Session::new(
        round,
        StdinScanner {
            denied: args.deny_camera,
        },
        (TextObserver::new(io::stdout()), alarm),
        config.session,
    );

    block_on(async {
        // a refused camera is reported to the player; `:camera` retries
        if session.activate_camera().await.is_err() {
            log::warn!("camera refused, scans are ignored until it starts");
        }
        session.run(rx).await;
    });

    if reader.join().is_err() {
        log::error!("stdin reader panicked");
    }
    Ok(())
}
