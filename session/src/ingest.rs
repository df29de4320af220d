use std::pin::pin;

use futures_channel::mpsc;
use futures_util::{Stream, StreamExt};
use scanword_core::RoundConfig;
use scanword_protocol::ScanBatch;
use web_time::Instant;

use crate::*;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Scan(ScanBatch),
    /// Lets a due error flash expire without a scan arriving.
    Tick,
    ToggleCamera,
    Reset,
    StartRound(RoundConfig),
}

/// Cloneable handle for any number of scan sources.
#[derive(Clone, Debug)]
pub struct CommandSender(mpsc::UnboundedSender<SessionCommand>);

impl CommandSender {
    /// Queues a command. Returns `false` once the session stopped listening.
    pub fn send(&self, command: SessionCommand) -> bool {
        self.0.unbounded_send(command).is_ok()
    }

    pub fn scan(&self, batch: ScanBatch) -> bool {
        self.send(SessionCommand::Scan(batch))
    }

    /// Ends the command stream for every sender; queued commands are still applied.
    pub fn close(&self) {
        self.0.close_channel();
    }
}

/// Channel feeding a single session; the receiving end goes to [`Session::run`].
pub fn command_channel() -> (CommandSender, mpsc::UnboundedReceiver<SessionCommand>) {
    let (tx, rx) = mpsc::unbounded();
    (CommandSender(tx), rx)
}

impl<C: ScanCapability, O: SessionObserver> Session<C, O> {
    /// Applies commands in arrival order until every sender is gone.
    pub async fn run<S>(&mut self, commands: S)
    where
        S: Stream<Item = SessionCommand>,
    {
        let mut commands = pin!(commands);
        while let Some(command) = commands.next().await {
            self.apply(command).await;
        }
        log::debug!("command stream closed");
    }

    pub async fn apply(&mut self, command: SessionCommand) {
        let now = Instant::now();
        match command {
            SessionCommand::Scan(batch) => {
                self.ingest(&batch, now);
            }
            SessionCommand::Tick => {
                self.tick(now);
            }
            SessionCommand::ToggleCamera => {
                // failures already reached the observer as a notice
                if let Err(err) = self.toggle_camera().await {
                    log::debug!("camera toggle failed: {}", err);
                }
            }
            SessionCommand::Reset => self.reset(),
            SessionCommand::StartRound(round) => self.start_round_with(round),
        }
    }
}
