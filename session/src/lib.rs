//! Session layer around the round engine.
//!
//! A [`Session`] owns the [`scanword_core::PlayEngine`], the scanning
//! capability and an observer. Scan batches go through [`Session::ingest`],
//! the error flash is timed by a [`FlashTimer`] checked on every event, and
//! the camera is stopped as soon as the round is won or lost.
//!
//! Several scan sources can share one session through [`command_channel`]:
//! the session stays the only mutator and applies commands in order.

pub use capability::*;
pub use controller::*;
pub use error::*;
pub use flash::*;
pub use ingest::*;
pub use observer::*;

mod capability;
mod controller;
mod error;
mod flash;
mod ingest;
mod observer;
