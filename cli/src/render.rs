use std::io::Write;

use scanword_core::RoundStatus;
use scanword_session::{Feedback, SessionObserver, SessionView};

/// Prints the round as text lines.
#[derive(Debug)]
pub struct TextObserver<W> {
    out: W,
}

impl<W: Write> TextObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            log::warn!("could not write to output: {}", err);
        }
    }
}

pub fn status_line(view: &SessionView) -> String {
    let round = &view.round;
    let masked: Vec<String> = round.progress.iter().map(|slot| slot.as_char().to_string()).collect();
    let guessed: String = round.guessed.iter().collect();
    let status = match round.status {
        RoundStatus::InProgress if round.error_flash => "wrong!",
        RoundStatus::InProgress => "playing",
        RoundStatus::Won => "won",
        RoundStatus::Lost => "lost",
    };
    let camera = if view.camera_active { "on" } else { "off" };

    format!(
        "{}   lives {}/{}   guessed [{}]   {}   camera {}",
        masked.join(" "),
        round.lives,
        round.starting_lives,
        guessed,
        status,
        camera
    )
}

impl<W: Write> SessionObserver for TextObserver<W> {
    fn notify(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::Haptic => log::debug!("haptic pulse"),
            Feedback::ErrorFlash(true) => self.emit("  X  not in the word"),
            Feedback::ErrorFlash(false) => {}
            Feedback::RoundOver {
                status: RoundStatus::Won,
                solution,
            } => self.emit(&format!("You won! The word was {solution}.")),
            Feedback::RoundOver { solution, .. } => {
                self.emit(&format!("Game over. The word was {solution}."))
            }
            Feedback::Camera(active) => log::info!("camera {}", if active { "on" } else { "off" }),
            Feedback::Notice(notice) => self.emit(&format!("! {notice}")),
        }
    }

    fn render(&mut self, view: &SessionView) {
        let line = status_line(view);
        self.emit(&line);
    }
}
