use scanword_core::{Lives, MoveOutcome, Observation, PlayEngine, RoundConfig};
use scanword_protocol::ScanBatch;
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long input stays suppressed after a wrong guess.
    #[serde(with = "millis", rename = "error_flash_ms")]
    pub error_flash: Duration,
    pub camera: CaptureConstraints,
}

impl SessionConfig {
    pub const DEFAULT_ERROR_FLASH: Duration = Duration::from_millis(1500);
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            error_flash: Self::DEFAULT_ERROR_FLASH,
            camera: CaptureConstraints::default(),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Owns the engine and the scanning capability for one player.
///
/// Every mutation goes through `&mut self`, so scans, timer fires and camera
/// requests are applied one at a time.
#[derive(Debug)]
pub struct Session<C, O = ()> {
    engine: PlayEngine,
    capability: C,
    observer: O,
    camera_active: bool,
    flash: FlashTimer,
    config: SessionConfig,
}

impl<C: ScanCapability, O: SessionObserver> Session<C, O> {
    pub fn new(round: RoundConfig, capability: C, observer: O, config: SessionConfig) -> Self {
        Self {
            engine: PlayEngine::from_config(round),
            capability,
            observer,
            camera_active: false,
            flash: FlashTimer::default(),
            config,
        }
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn capability(&self) -> &C {
        &self.capability
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_camera_active(&self) -> bool {
        self.camera_active
    }

    /// When the pending error flash runs out, if one is pending.
    pub fn flash_deadline(&self) -> Option<Instant> {
        self.flash.deadline()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            round: Observation::from_engine(&self.engine),
            camera_active: self.camera_active,
        }
    }

    pub fn into_parts(self) -> (PlayEngine, C, O) {
        (self.engine, self.capability, self.observer)
    }

    /// Starts scanning. On failure the camera indicator is rolled back and the
    /// player gets a notice; the round itself is not touched.
    ///
    /// A finished round keeps the camera off until a new round starts.
    pub async fn activate_camera(&mut self) -> Result<()> {
        if self.camera_active {
            return Ok(());
        }
        if self.engine.is_finished() {
            log::debug!("round {} is over, camera stays off", self.engine.epoch());
            return Ok(());
        }

        self.set_camera_active(true);
        match start_with_fallback(&mut self.capability, &self.config.camera).await {
            Ok(used) => {
                log::info!("camera started with {:?}", used);
                self.render();
                Ok(())
            }
            Err(err) => {
                self.set_camera_active(false);
                self.observer.notify(Feedback::Notice(err.to_string()));
                self.render();
                Err(err)
            }
        }
    }

    pub fn deactivate_camera(&mut self) {
        if self.stop_scanning() {
            self.render();
        }
    }

    pub async fn toggle_camera(&mut self) -> Result<()> {
        if self.camera_active {
            self.deactivate_camera();
            Ok(())
        } else {
            self.activate_camera().await
        }
    }

    /// Fires the error-flash timer if it is due. Returns whether the flash ended.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(ticket) = self.flash.fire_due(now) else {
            return false;
        };

        let cleared = self.engine.clear_error_flash(ticket);
        if cleared {
            self.observer.notify(Feedback::ErrorFlash(false));
            self.render();
        }
        cleared
    }

    /// Forwards the first payload of `batch` to the engine.
    ///
    /// Batches come from the camera, so they are dropped while it is off, as
    /// are batches without any payload. Both yield `None`.
    pub fn ingest(&mut self, batch: &ScanBatch, now: Instant) -> Option<MoveOutcome> {
        if !self.camera_active {
            self.tick(now);
            log::trace!("batch of {} results dropped, camera is off", batch.len());
            return None;
        }
        let payload = batch.first_payload()?;
        Some(self.submit(&payload, now))
    }

    /// Applies one raw payload, whatever the camera state.
    pub fn submit(&mut self, raw: &str, now: Instant) -> MoveOutcome {
        self.tick(now);

        let outcome = self.engine.submit_guess(raw);
        if !outcome.has_update() {
            return outcome;
        }

        if outcome.wants_haptic() {
            self.observer.notify(Feedback::Haptic);
        }
        if let (MoveOutcome::Incorrect { .. }, Some(ticket)) = (&outcome, self.engine.error_flash()) {
            self.flash.arm(ticket, now + self.config.error_flash);
            self.observer.notify(Feedback::ErrorFlash(true));
        }
        if outcome.is_terminal() {
            self.finish_round();
        }
        self.render();

        outcome
    }

    /// Plays the current word again.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.flash.cancel();
        self.render();
    }

    pub fn start_round(&mut self, word: &str, starting_lives: Lives) -> Result<()> {
        self.engine.start_round(word, starting_lives)?;
        self.flash.cancel();
        self.render();
        Ok(())
    }

    pub fn start_round_with(&mut self, round: RoundConfig) {
        self.engine.start_round_with(round);
        self.flash.cancel();
        self.render();
    }

    fn stop_scanning(&mut self) -> bool {
        if !self.camera_active {
            return false;
        }
        self.capability.stop();
        self.set_camera_active(false);
        log::info!("camera stopped");
        true
    }

    fn finish_round(&mut self) {
        self.stop_scanning();
        self.observer.notify(Feedback::RoundOver {
            status: self.engine.state(),
            solution: self.engine.secret_word().to_string(),
        });
    }

    fn set_camera_active(&mut self, active: bool) {
        self.camera_active = active;
        self.observer.notify(Feedback::Camera(active));
    }

    fn render(&mut self) {
        let view = self.view();
        self.observer.render(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::tests::FakeCamera;
    use futures::executor::block_on;
    use scanword_core::{IgnoreReason, RoundStatus};

    fn session(word: &str, lives: Lives, camera: FakeCamera) -> Session<FakeCamera, Vec<Feedback>> {
        let round = RoundConfig::new(word, lives).unwrap();
        Session::new(round, camera, Vec::new(), SessionConfig::default())
    }

    fn batch(json: &str) -> ScanBatch {
        ScanBatch::parse(json).unwrap()
    }

    #[test]
    fn winning_stops_the_camera() {
        let mut session = session("OI", 5, FakeCamera::default());
        block_on(session.activate_camera()).unwrap();
        let now = Instant::now();

        session.ingest(&batch(r#"[{"value":"o"}]"#), now);
        let outcome = session.ingest(&batch(r#"[{"data":"i"}]"#), now).unwrap();

        assert!(outcome.is_terminal());
        assert_eq!(session.engine().state(), RoundStatus::Won);
        assert!(!session.is_camera_active());
        assert!(!session.capability().running);
        assert_eq!(
            session.observer().last(),
            Some(&Feedback::RoundOver {
                status: RoundStatus::Won,
                solution: "OI".into(),
            })
        );
    }

    #[test]
    fn losing_stops_the_camera_even_if_it_never_started() {
        let mut session = session("OI", 1, FakeCamera::default());

        let outcome = session.submit("x", Instant::now());

        assert!(outcome.is_terminal());
        assert_eq!(session.engine().state(), RoundStatus::Lost);
        assert_eq!(session.capability().stops, 0);
        assert!(session.observer().contains(&Feedback::RoundOver {
            status: RoundStatus::Lost,
            solution: "OI".into(),
        }));
    }

    #[test]
    fn empty_batches_are_dropped() {
        let mut session = session("OI", 5, FakeCamera::default());
        block_on(session.activate_camera()).unwrap();
        let now = Instant::now();

        assert_eq!(session.ingest(&batch("null"), now), None);
        assert_eq!(session.ingest(&batch("[]"), now), None);
        assert_eq!(session.ingest(&batch(r#"[{"format":"QR_CODE"}]"#), now), None);
        assert_eq!(session.observer().as_slice(), &[Feedback::Camera(true)]);
    }

    #[test]
    fn batches_are_dropped_while_the_camera_is_off() {
        let mut session = session("OI", 5, FakeCamera::default());
        let now = Instant::now();

        assert_eq!(session.ingest(&batch(r#"[{"value":"o"}]"#), now), None);
        assert!(!session.engine().has_guessed('O'));

        block_on(session.activate_camera()).unwrap();
        assert!(session.ingest(&batch(r#"[{"value":"o"}]"#), now).is_some());

        session.deactivate_camera();
        assert_eq!(session.ingest(&batch(r#"[{"value":"i"}]"#), now), None);
        assert_eq!(session.engine().state(), RoundStatus::InProgress);
        assert_eq!(session.view().round.masked_word(), "O_");
    }

    #[test]
    fn camera_stays_off_after_the_round_ends() {
        let mut session = session("OI", 1, FakeCamera::default());
        session.submit("x", Instant::now());
        assert!(session.engine().is_finished());

        block_on(session.activate_camera()).unwrap();
        assert!(!session.is_camera_active());
        assert!(session.capability().attempts.is_empty());

        session.reset();
        block_on(session.activate_camera()).unwrap();
        assert!(session.is_camera_active());
    }

    #[test]
    fn wrong_guess_suppresses_input_for_the_flash_window() {
        let mut session = session("GATO", 5, FakeCamera::default());
        let start = Instant::now();

        session.submit("x", start);
        assert_eq!(
            session.submit("g", start + Duration::from_millis(1000)),
            MoveOutcome::Ignored(IgnoreReason::ErrorFlash)
        );
        assert!(matches!(
            session.submit("g", start + Duration::from_millis(1500)),
            MoveOutcome::Correct { .. }
        ));
        assert_eq!(session.engine().lives(), 4);
        assert_eq!(
            session.observer().as_slice(),
            &[
                Feedback::Haptic,
                Feedback::ErrorFlash(true),
                Feedback::ErrorFlash(false),
                Feedback::Haptic,
            ]
        );
    }

    #[test]
    fn tick_clears_the_flash_on_time() {
        let mut session = session("GATO", 5, FakeCamera::default());
        let start = Instant::now();

        session.submit("x", start);
        assert_eq!(session.flash_deadline(), Some(start + Duration::from_millis(1500)));
        assert!(!session.tick(start + Duration::from_millis(100)));
        assert!(session.tick(start + Duration::from_millis(1600)));
        assert!(!session.engine().is_error_flash_active());
        assert_eq!(session.flash_deadline(), None);
    }

    #[test]
    fn reset_drops_the_pending_flash() {
        let mut session = session("GATO", 5, FakeCamera::default());
        let start = Instant::now();

        session.submit("x", start);
        session.reset();

        assert_eq!(session.flash_deadline(), None);
        assert!(!session.engine().is_error_flash_active());
        assert_eq!(session.engine().lives(), 5);
        assert!(!session.tick(start + Duration::from_secs(5)));
    }

    #[test]
    fn camera_failure_rolls_back_indicator() {
        let mut session = session("GATO", 5, FakeCamera::failing(2));

        let err = block_on(session.activate_camera()).unwrap_err();

        assert!(matches!(err, SessionError::CameraUnavailable(_)));
        assert!(!session.is_camera_active());
        assert_eq!(session.engine().lives(), 5);
        assert_eq!(
            session.observer().as_slice(),
            &[
                Feedback::Camera(true),
                Feedback::Camera(false),
                Feedback::Notice("Camera unavailable: NotAllowedError".into()),
            ]
        );
    }

    #[test]
    fn toggle_camera_starts_and_stops() {
        let mut session = session("GATO", 5, FakeCamera::failing(1));

        block_on(session.toggle_camera()).unwrap();
        assert!(session.is_camera_active());
        assert_eq!(session.capability().attempts.len(), 2);

        block_on(session.toggle_camera()).unwrap();
        assert!(!session.is_camera_active());
        assert_eq!(session.capability().stops, 1);
    }

    #[test]
    fn start_round_rejects_bad_words() {
        let mut session = session("GATO", 5, FakeCamera::default());

        assert!(matches!(
            session.start_round(" ", 5),
            Err(SessionError::Game(_))
        ));
        session.start_round("pato", 2).unwrap();
        assert_eq!(session.engine().starting_lives(), 2);
        assert_eq!(session.view().round.masked_word(), "____");
    }

    #[test]
    fn config_reads_milliseconds() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"error_flash_ms":250,"camera":{"width":640}}"#).unwrap();
        assert_eq!(config.error_flash, Duration::from_millis(250));
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.camera.height, 720);
    }
}
