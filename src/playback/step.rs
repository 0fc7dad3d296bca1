//! A control output held for a fixed duration.

use crate::schema::ControllerState;

use super::PlaybackError;

/// Immutable `(duration, controls)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlStep {
    duration: f64,
    controls: ControllerState,
}

impl ControlStep {
    /// Create a step. `duration` must be finite and positive.
    pub fn new(duration: f64, controls: ControllerState) -> Result<Self, PlaybackError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(PlaybackError::InvalidDuration(duration));
        }
        Ok(Self { duration, controls })
    }

    /// Step emitting neutral controls.
    pub fn idle(duration: f64) -> Result<Self, PlaybackError> {
        Self::new(duration, ControllerState::default())
    }

    /// Seconds this step is held.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn controls(&self) -> &ControllerState {
        &self.controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_duration() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(ControlStep::idle(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_idle_is_neutral() {
        let step = ControlStep::idle(1.5).unwrap();
        assert_eq!(step.duration(), 1.5);
        assert!(step.controls().is_neutral());
    }
}
