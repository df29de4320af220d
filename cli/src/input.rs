use std::future::{Future, ready};
use std::io::BufRead;

use anyhow::Result;
use scanword_protocol::ScanBatch;
use scanword_session::{CaptureConstraints, CommandSender, ScanCapability, SessionCommand};

use crate::config::WordPool;

/// Stands in for the camera: scans arrive on stdin, so starting only checks
/// that the user did not deny access.
#[derive(Debug, Default)]
pub struct StdinScanner {
    pub denied: bool,
}

impl ScanCapability for StdinScanner {
    type Error = &'static str;

    fn start(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        log::debug!("opening scanner with {:?}", constraints);
        if self.denied {
            return ready(Err("permission denied"));
        }
        ready(Ok(()))
    }

    fn stop(&mut self) {
        log::debug!("scanner closed");
    }
}

#[derive(Debug, PartialEq)]
pub enum Line {
    Command(SessionCommand),
    Skip,
    Quit,
}

/// Reads one stdin line: a JSON scan batch, a raw payload in `plain` mode,
/// or one of the `:reset`, `:next`, `:camera`, `:quit` commands.
pub fn parse_line(line: &str, plain: bool, pool: &mut WordPool) -> Result<Line> {
    let command = match line.trim() {
        "" => return Ok(Line::Skip),
        ":quit" => return Ok(Line::Quit),
        ":reset" => SessionCommand::Reset,
        ":camera" => SessionCommand::ToggleCamera,
        ":next" => SessionCommand::StartRound(pool.advance()?),
        _ if plain => SessionCommand::Scan(ScanBatch::from_text(line)),
        json => SessionCommand::Scan(ScanBatch::parse(json)?),
    };
    Ok(Line::Command(command))
}

/// Forwards stdin to the session until EOF, `:quit`, or the session goes away,
/// then closes the command stream for every sender.
pub fn forward_lines(input: impl BufRead, tx: CommandSender, plain: bool, mut pool: WordPool) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read stdin: {}", err);
                break;
            }
        };

        match parse_line(&line, plain, &mut pool) {
            Ok(Line::Command(command)) => {
                if !tx.send(command) {
                    break;
                }
            }
            Ok(Line::Skip) => {}
            Ok(Line::Quit) => break,
            Err(err) => log::warn!("skipping line {:?}: {:#}", line, err),
        }
    }
    tx.close();
}
