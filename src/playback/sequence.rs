//! Tick-driven playback of a list of control steps.

use crate::schema::{ActionSpec, ControllerState};

use super::{ControlStep, PlaybackError};

/// Floor of the slack allowed when testing a step boundary, in seconds.
const MIN_BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Host clocks are single precision. Deltas taken from them are off by up to
/// one ulp of the clock value, so boundaries get this many ulps of slack.
const CLOCK_ULPS: f64 = 4.0;

/// Ordered control steps plus playback cursor.
///
/// The sequence is `RUNNING` until elapsed time passes the end of the last
/// step, then `FINISHED` for good. Time left over when a step ends carries
/// into the next step, so step boundaries do not drift with the tick rate.
/// A boundary counts as reached when elapsed time is within the clock's
/// rounding error of it, so `D` seconds at tick size `dt` give `ceil(D/dt)`
/// outputs even when neither is a binary fraction.
///
/// Usage:
/// ```ignore
/// let mut sequence = Sequence::from_actions(&scenario.actions, scenario.time)?;
/// while let Some(controls) = sequence.tick(packet.clock()) {
///     // send controls, wait for next packet
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Sequence {
    steps: Vec<ControlStep>,
    /// Seconds spent in the current step.
    elapsed_in_step: f64,
    step_index: usize,
    done: bool,
    /// Clock value of the previous `tick`.
    last_clock: Option<f64>,
    /// Slack used at step boundaries, scaled to the last clock value.
    tolerance: f64,
}

impl Sequence {
    /// Create a sequence. An empty list is finished immediately.
    pub fn new(steps: Vec<ControlStep>) -> Self {
        let done = steps.is_empty();
        Self {
            steps,
            elapsed_in_step: 0.0,
            step_index: 0,
            done,
            last_clock: None,
            tolerance: MIN_BOUNDARY_TOLERANCE,
        }
    }

    /// Build a sequence from authored actions.
    ///
    /// If the actions end before `total_time`, one idle step covers the rest
    /// so the agent keeps ticking (and being recorded) for the whole scenario.
    pub fn from_actions(actions: &[ActionSpec], total_time: f64) -> Result<Self, PlaybackError> {
        if !total_time.is_finite() || total_time < 0.0 {
            return Err(PlaybackError::InvalidTotalTime(total_time));
        }

        let mut steps = Vec::with_capacity(actions.len() + 1);
        let mut scripted = 0.0;
        for (index, action) in actions.iter().enumerate() {
            let controls = action
                .controls()
                .map_err(|source| PlaybackError::InvalidControls { index, source })?;
            steps.push(ControlStep::new(action.duration, controls)?);
            scripted += action.duration;
        }

        if total_time - scripted > MIN_BOUNDARY_TOLERANCE {
            steps.push(ControlStep::idle(total_time - scripted)?);
        }

        Ok(Self::new(steps))
    }

    /// Advance to the absolute simulation clock `now`.
    ///
    /// The first call anchors the clock and adds no time; later calls add
    /// `now` minus the previous clock. A clock that moves backwards adds nothing.
    pub fn tick(&mut self, now: f64) -> Option<&ControllerState> {
        let delta = match self.last_clock {
            Some(last) => now - last,
            None => 0.0,
        };
        self.last_clock = Some(now);
        self.tolerance = clock_tolerance(now);
        self.advance(delta)
    }

    /// Add `delta` seconds and return the controls of the step now current,
    /// or `None` once every step has elapsed.
    pub fn advance(&mut self, delta: f64) -> Option<&ControllerState> {
        if self.done {
            return None;
        }
        if delta.is_finite() && delta > 0.0 {
            self.elapsed_in_step += delta;
        }

        while let Some(step) = self.steps.get(self.step_index) {
            if self.elapsed_in_step + self.tolerance < step.duration() {
                break;
            }
            self.elapsed_in_step -= step.duration();
            self.step_index += 1;
            log::debug!(
                "Playback step {} -> {} ({:.3}s carried over)",
                self.step_index - 1,
                self.step_index,
                self.elapsed_in_step
            );
        }

        match self.steps.get(self.step_index) {
            Some(step) => Some(step.controls()),
            None => {
                self.done = true;
                log::debug!("Playback finished after {} steps", self.steps.len());
                None
            }
        }
    }

    /// True once the sequence is `FINISHED`.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Index of the current step (equals `len()` once finished through time).
    #[inline]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    #[inline]
    pub fn elapsed_in_step(&self) -> f64 {
        self.elapsed_in_step
    }

    pub fn steps(&self) -> &[ControlStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all step durations.
    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(ControlStep::duration).sum()
    }
}

fn clock_tolerance(now: f64) -> f64 {
    if !now.is_finite() {
        return MIN_BOUNDARY_TOLERANCE;
    }
    (now.abs() * f64::from(f32::EPSILON) * CLOCK_ULPS).max(MIN_BOUNDARY_TOLERANCE)
}
