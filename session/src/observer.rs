use scanword_core::{Observation, RoundStatus};
use serde::{Deserialize, Serialize};

/// Round state plus the camera indicator, as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub round: Observation,
    pub camera_active: bool,
}

/// User-facing reactions requested by the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Short vibration confirming that a scan was taken into account.
    Haptic,
    ErrorFlash(bool),
    RoundOver {
        status: RoundStatus,
        solution: String,
    },
    Camera(bool),
    Notice(String),
}

pub trait SessionObserver {
    fn notify(&mut self, feedback: Feedback);

    /// Called after anything visible changed.
    fn render(&mut self, _view: &SessionView) {}
}

impl SessionObserver for () {
    fn notify(&mut self, _feedback: Feedback) {}
}

impl SessionObserver for Vec<Feedback> {
    fn notify(&mut self, feedback: Feedback) {
        self.push(feedback);
    }
}

/// Feeds every event to both observers, left first.
impl<A: SessionObserver, B: SessionObserver> SessionObserver for (A, B) {
    fn notify(&mut self, feedback: Feedback) {
        self.0.notify(feedback.clone());
        self.1.notify(feedback);
    }

    fn render(&mut self, view: &SessionView) {
        self.0.render(view);
        self.1.render(view);
    }
}
