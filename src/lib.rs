//! Replay Bot - Scripted control playback with per-tick snapshot recording.
//!
//! An agent runs inside a host simulation loop. On every tick it returns the
//! controls of a pre-authored, timed action list, and the lead agent records
//! every packet it sees to a compressed tick log written once playback ends.
//!
//! # Architecture
//!
//! - `schema`: Scenario, settings and control types
//! - `playback`: Control steps and the tick-driven sequence
//! - `recording`: Tick recorder, log format and reader
//! - `host`: Host interface, packets and the headless host
//! - `agent`: Per-tick coordinator
//!
//! # Example
//!
//! ```rust,no_run
//! use replay_bot::{AgentConfig, HeadlessHost, ReplayAgent};
//!
//! let config = AgentConfig::new("settings.json", true);
//! let mut agent = ReplayAgent::from_config(&config).unwrap();
//! let mut host = HeadlessHost::new(120.0);
//!
//! while !agent.is_finished() {
//!     let packet = host.next_packet();
//!     let controls = agent.get_output(&packet, &mut host).unwrap();
//!     println!("t={:.3} throttle={}", packet.seconds_elapsed, controls.throttle);
//! }
//! ```

pub mod agent;
pub mod host;
pub mod playback;
pub mod recording;
pub mod schema;

// Re-export commonly used types
pub use agent::{AgentError, AgentPhase, ReplayAgent, Role};
pub use host::{GameHost, GameTickPacket, HeadlessHost};
pub use playback::{ControlStep, Sequence};
pub use recording::{TickLogReader, TickRecorder};
pub use schema::{AgentConfig, ControllerState, Scenario, Settings};
