use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Environment,
    User,
}

/// Video constraints handed to the scanning capability on start.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
    pub facing: Facing,
    /// Require `facing` rather than just prefer it.
    pub exact_facing: bool,
}

impl CaptureConstraints {
    /// Same request with the facing mode turned into a preference.
    pub const fn relaxed(self) -> Self {
        Self {
            exact_facing: false,
            ..self
        }
    }
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            facing: Facing::Environment,
            exact_facing: true,
        }
    }
}

/// Camera plus QR decoder, owned by the session.
pub trait ScanCapability {
    type Error: fmt::Display;

    fn start(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> impl Future<Output = core::result::Result<(), Self::Error>>;

    /// Best effort; the round does not depend on it.
    fn stop(&mut self);
}

/// Starts the capability with `strict`, retrying once with relaxed constraints.
///
/// Returns the constraints that worked.
pub async fn start_with_fallback<C: ScanCapability>(
    capability: &mut C,
    strict: &CaptureConstraints,
) -> Result<CaptureConstraints> {
    let first_err = match capability.start(strict).await {
        Ok(()) => return Ok(*strict),
        Err(err) => err,
    };

    let relaxed = strict.relaxed();
    log::warn!("camera start failed ({}), retrying with {:?}", first_err, relaxed);

    match capability.start(&relaxed).await {
        Ok(()) => Ok(relaxed),
        Err(err) => {
            log::error!("camera start failed again: {}", err);
            Err(SessionError::CameraUnavailable(err.to_string()))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::future::ready;

    /// Scripted capability: fails the first `failures` start attempts.
    #[derive(Debug, Default)]
    pub(crate) struct FakeCamera {
        pub failures: usize,
        pub attempts: Vec<CaptureConstraints>,
        pub running: bool,
        pub stops: usize,
    }

    impl FakeCamera {
        pub(crate) fn failing(failures: usize) -> Self {
            Self {
                failures,
                ..Default::default()
            }
        }
    }

    impl ScanCapability for FakeCamera {
        type Error = &'static str;

        fn start(
            &mut self,
            constraints: &CaptureConstraints,
        ) -> impl Future<Output = core::result::Result<(), &'static str>> {
            self.attempts.push(*constraints);
            if self.attempts.len() <= self.failures {
                ready(Err("NotAllowedError"))
            } else {
                self.running = true;
                ready(Ok(()))
            }
        }

        fn stop(&mut self) {
            self.running = false;
            self.stops += 1;
        }
    }

    #[test]
    fn strict_start_succeeds_without_retry() {
        let mut camera = FakeCamera::default();
        let strict = CaptureConstraints::default();

        let used = block_on(start_with_fallback(&mut camera, &strict)).unwrap();

        assert_eq!(used, strict);
        assert_eq!(camera.attempts.len(), 1);
        assert!(camera.running);
    }

    #[test]
    fn retries_once_with_relaxed_facing() {
        let mut camera = FakeCamera::failing(1);
        let strict = CaptureConstraints::default();

        let used = block_on(start_with_fallback(&mut camera, &strict)).unwrap();

        assert!(!used.exact_facing);
        assert_eq!(camera.attempts, vec![strict, strict.relaxed()]);
    }

    #[test]
    fn gives_up_after_relaxed_attempt() {
        let mut camera = FakeCamera::failing(2);

        let err = block_on(start_with_fallback(
            &mut camera,
            &CaptureConstraints::default(),
        ))
        .unwrap_err();

        assert_eq!(err, SessionError::CameraUnavailable("NotAllowedError".into()));
        assert_eq!(camera.attempts.len(), 2);
        assert!(!camera.running);
    }

    #[test]
    fn constraints_read_from_partial_config() {
        let constraints: CaptureConstraints = serde_json::from_str(r#"{"facing":"user"}"#).unwrap();
        assert_eq!(constraints.facing, Facing::User);
        assert_eq!(constraints.width, 1280);
        assert!(constraints.exact_facing);
    }
}
