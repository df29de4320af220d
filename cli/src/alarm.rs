use std::thread;
use std::time::Duration;

use scanword_session::{CommandSender, Feedback, SessionCommand, SessionObserver};

/// Wakes the session with a `Tick` once an error flash has run its course,
/// so the flash ends on time even if no further scan arrives.
#[derive(Clone, Debug)]
pub struct FlashAlarm {
    tx: CommandSender,
    delay: Duration,
}

impl FlashAlarm {
    pub fn new(tx: CommandSender, delay: Duration) -> Self {
        Self { tx, delay }
    }

    fn schedule(&self) {
        let tx = self.tx.clone();
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            if !tx.send(SessionCommand::Tick) {
                log::trace!("session gone before the flash ended");
            }
        });
    }
}

impl SessionObserver for FlashAlarm {
    fn notify(&mut self, feedback: Feedback) {
        if feedback == Feedback::ErrorFlash(true) {
            self.schedule();
        }
    }
}
