//! Desired world state submitted to the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Physics;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarState {
    pub physics: Physics,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallState {
    pub physics: Physics,
}

/// World state write request. Cars are keyed by host car index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub cars: BTreeMap<usize, CarState>,
    pub ball: Option<BallState>,
}

impl GameState {
    /// True if applying this state would change nothing.
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty() && self.ball.is_none()
    }
}
