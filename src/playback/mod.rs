//! Scripted playback of timed control steps.
//!
//! A [`Sequence`] holds [`ControlStep`]s in authoring order and is advanced
//! once per tick. Each tick yields the controls of the current step until
//! the total duration has elapsed, after which it yields nothing.

mod sequence;
mod step;

pub use sequence::Sequence;
pub use step::ControlStep;

use crate::schema::ControlError;

/// Errors building a playback sequence.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Step duration must be finite and positive, got {0}")]
    InvalidDuration(f64),
    #[error("Total time must be finite and non-negative, got {0}")]
    InvalidTotalTime(f64),
    #[error("Action {index}: {source}")]
    InvalidControls {
        index: usize,
        #[source]
        source: ControlError,
    },
}
