//! Replay agent - per-tick entry point tying playback and recording together.

use std::path::PathBuf;

use crate::host::{GameHost, GameTickPacket, HostError};
use crate::playback::{PlaybackError, Sequence};
use crate::recording::{DumpOutcome, TickLogError, TickRecorder};
use crate::schema::{
    ActionSpec, AgentConfig, ControllerState, Scenario, ScenarioError, Settings, SettingsError,
};

/// Role of an agent instance within a shared scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Writes the initial world state and records the tick log to `log_path`.
    Lead { log_path: PathBuf },
    /// Only plays its actions.
    Follower,
}

impl Role {
    #[inline]
    pub fn is_lead(&self) -> bool {
        matches!(self, Role::Lead { .. })
    }
}

/// Lifecycle phase reported by [`ReplayAgent::phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    /// No tick received yet.
    Uninitialized,
    /// Playing actions.
    Active,
    /// Playback over; neutral controls from now on.
    Completed,
}

#[derive(Debug)]
enum Phase {
    Uninitialized,
    Active {
        sequence: Sequence,
        /// Present only for the lead.
        recorder: Option<TickRecorder<GameTickPacket>>,
    },
    Completed,
}

/// Plays a scenario's actions one tick at a time.
///
/// The first tick sets up playback and returns neutral controls. The lead
/// logs every packet from then on, including the packet of the tick on which
/// playback finishes, and writes the log exactly once on that tick.
///
/// Usage:
/// ```ignore
/// let mut agent = ReplayAgent::from_config(&config)?;
/// loop {
///     let packet = host.next_packet();
///     let controls = agent.get_output(&packet, &mut host)?;
///     // send controls to the car
/// }
/// ```
#[derive(Debug)]
pub struct ReplayAgent {
    role: Role,
    scenario: Scenario,
    actions: Vec<ActionSpec>,
    phase: Phase,
    ticks: u64,
}

impl ReplayAgent {
    /// Create an agent playing the actions of `car_id` (or the scenario actions).
    pub fn new(scenario: Scenario, car_id: Option<&str>, role: Role) -> Result<Self, AgentError> {
        scenario.validate()?;
        let actions = scenario.actions_for(car_id)?.to_vec();
        Ok(Self {
            role,
            scenario,
            actions,
            phase: Phase::Uninitialized,
            ticks: 0,
        })
    }

    /// Load settings and scenario named by `config` and create the agent.
    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let settings = Settings::load(&config.settings)?;
        let scenario = Scenario::load(settings.scenario_path())?;
        let role = if config.lead {
            Role::Lead {
                log_path: settings.log_path(&scenario.name),
            }
        } else {
            Role::Follower
        };
        log::info!(
            "Loaded scenario '{}' ({:.2}s) as {}",
            scenario.name,
            scenario.time,
            if role.is_lead() { "lead" } else { "follower" }
        );
        Self::new(scenario, config.car_id.as_deref(), role)
    }

    /// Controls for this tick.
    pub fn get_output<H: GameHost + ?Sized>(
        &mut self,
        packet: &GameTickPacket,
        host: &mut H,
    ) -> Result<ControllerState, AgentError> {
        self.ticks += 1;

        let (sequence, recorder) = match &mut self.phase {
            Phase::Uninitialized => {
                self.setup(host)?;
                return Ok(ControllerState::default());
            }
            Phase::Active { sequence, recorder } => (sequence, recorder),
            Phase::Completed => return Ok(ControllerState::default()),
        };

        // Log before ticking so each snapshot pairs with the controls applied on it.
        if let Some(recorder) = recorder.as_mut() {
            recorder.log(packet.clone());
        }
        if let Some(controls) = sequence.tick(packet.clock()) {
            return Ok(*controls);
        }

        self.complete()?;
        Ok(ControllerState::default())
    }

    fn setup<H: GameHost + ?Sized>(&mut self, host: &mut H) -> Result<(), AgentError> {
        let recorder = match &self.role {
            Role::Lead { log_path } => {
                let state = self.scenario.initial_game_state();
                if !state.is_empty() {
                    host.set_game_state(&state)?;
                }
                log::info!(
                    "Initial state written: {} cars, ball {}",
                    state.cars.len(),
                    if state.ball.is_some() { "set" } else { "unset" }
                );
                Some(TickRecorder::new(log_path.clone()))
            }
            Role::Follower => None,
        };

        let sequence = Sequence::from_actions(&self.actions, self.scenario.time)?;
        log::info!(
            "Playback ready: {} steps, {:.2}s",
            sequence.len(),
            sequence.total_duration()
        );
        self.phase = Phase::Active { sequence, recorder };
        Ok(())
    }

    fn complete(&mut self) -> Result<(), AgentError> {
        let previous = std::mem::replace(&mut self.phase, Phase::Completed);
        log::info!("Playback complete after {} ticks", self.ticks);

        if let Phase::Active {
            recorder: Some(mut recorder),
            ..
        } = previous
        {
            match recorder.dump()? {
                DumpOutcome::Written(stats) => log::info!("Recorded {}", stats),
                DumpOutcome::AlreadyDumped => {}
            }
        }
        Ok(())
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn phase(&self) -> AgentPhase {
        match self.phase {
            Phase::Uninitialized => AgentPhase::Uninitialized,
            Phase::Active { .. } => AgentPhase::Active,
            Phase::Completed => AgentPhase::Completed,
        }
    }

    /// Seconds of playback: the scenario time, or the summed action durations
    /// when the actions run longer.
    pub fn playback_duration(&self) -> f64 {
        let scripted: f64 = self.actions.iter().map(|a| a.duration).sum();
        scripted.max(self.scenario.time)
    }

    /// Host ticks needed to reach `Completed` at `tick_rate` Hz: the setup
    /// tick, one tick per output, the finishing tick and a little slack.
    pub fn tick_budget(&self, tick_rate: f64) -> u64 {
        (self.playback_duration() * tick_rate).ceil() as u64 + 4
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Completed)
    }

    /// Ticks received so far, including the setup tick.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Snapshots buffered but not yet written. Always 0 for followers.
    pub fn pending_snapshots(&self) -> usize {
        match &self.phase {
            Phase::Active {
                recorder: Some(recorder),
                ..
            } => recorder.len(),
            _ => 0,
        }
    }
}

/// Errors surfaced to the host.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("Playback setup failed: {0}")]
    Playback(#[from] PlaybackError),
    #[error("Host request failed: {0}")]
    Host(#[from] HostError),
    #[error("Tick log dump failed: {0}")]
    Dump(#[from] TickLogError),
}
