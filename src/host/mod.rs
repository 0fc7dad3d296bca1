//! Host interface - the simulation the agent runs inside.
//!
//! The host calls the agent once per tick with a [`GameTickPacket`] and accepts
//! world state writes through [`GameHost`]. [`HeadlessHost`] is an in-process
//! host without physics, used by the CLI and by tests.

mod headless;
mod packet;
mod state;

pub use headless::HeadlessHost;
pub use packet::*;
pub use state::*;

/// Requests the agent can make of the host.
pub trait GameHost {
    /// Overwrite the state of the listed objects.
    fn set_game_state(&mut self, state: &GameState) -> Result<(), HostError>;
}

/// Host-side failures.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Host rejected game state: {0}")]
    Rejected(String),
}
