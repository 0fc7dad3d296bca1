//! In-process host that replays the last written world state at a fixed rate.

use super::{CarInfo, GameHost, GameState, GameTickPacket, HostError};

/// Fixed-rate host without physics.
///
/// Every packet reports the objects exactly as last written through
/// [`GameHost::set_game_state`]; only the clock advances.
///
/// Usage:
/// ```ignore
/// let mut host = HeadlessHost::new(120.0);
/// loop {
///     let packet = host.next_packet();
///     let controls = agent.get_output(&packet, &mut host)?;
///     if agent.is_finished() { break; }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    tick_rate: f64,
    frame: u64,
    state: GameState,
    state_writes: usize,
}

impl HeadlessHost {
    /// Create a host ticking `tick_rate` times per simulated second.
    ///
    /// Non-positive or non-finite rates fall back to 120 Hz.
    pub fn new(tick_rate: f64) -> Self {
        let tick_rate = if tick_rate.is_finite() && tick_rate > 0.0 {
            tick_rate
        } else {
            log::warn!("Invalid tick rate {}, using 120 Hz", tick_rate);
            120.0
        };
        Self {
            tick_rate,
            frame: 0,
            state: GameState::default(),
            state_writes: 0,
        }
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Seconds between two packets.
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.tick_rate
    }

    /// Produce the packet for the current frame and advance the clock.
    pub fn next_packet(&mut self) -> GameTickPacket {
        let cars = self
            .state
            .cars
            .values()
            .map(|car| CarInfo {
                physics: car.physics,
                has_wheel_contact: true,
                ..Default::default()
            })
            .collect();
        let ball = self.state.ball.map(|b| b.physics).unwrap_or_default();

        let packet = GameTickPacket {
            seconds_elapsed: (self.frame as f64 / self.tick_rate) as f32,
            frame: self.frame,
            ball,
            cars,
        };
        self.frame += 1;
        packet
    }

    /// Last world state written by an agent.
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// Number of world state writes received.
    pub fn state_writes(&self) -> usize {
        self.state_writes
    }

    /// Frames produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl GameHost for HeadlessHost {
    fn set_game_state(&mut self, state: &GameState) -> Result<(), HostError> {
        for (&index, car) in &state.cars {
            self.state.cars.insert(index, *car);
        }
        if let Some(ball) = state.ball {
            self.state.ball = Some(ball);
        }
        self.state_writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BallState, CarState, Physics, Vector3};

    #[test]
    fn test_clock_advances_per_packet() {
        let mut host = HeadlessHost::new(4.0);
        let times: Vec<f32> = (0..5).map(|_| host.next_packet().seconds_elapsed).collect();
        assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(host.frame(), 5);
    }

    #[test]
    fn test_packets_reflect_written_state() {
        let mut host = HeadlessHost::new(60.0);
        let mut state = GameState::default();
        let physics = Physics {
            location: Vector3 {
                x: 10.0,
                y: -20.0,
                z: 17.0,
            },
            ..Default::default()
        };
        state.cars.insert(0, CarState { physics });
        state.ball = Some(BallState { physics });

        host.set_game_state(&state).unwrap();
        assert_eq!(host.state_writes(), 1);

        let packet = host.next_packet();
        assert_eq!(packet.cars.len(), 1);
        assert_eq!(packet.cars[0].physics, physics);
        assert_eq!(packet.ball, physics);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let host = HeadlessHost::new(0.0);
        assert_eq!(host.tick_rate(), 120.0);
    }
}
