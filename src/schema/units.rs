//! Unit systems for authored scenario values.
//!
//! The host expects Unreal units: centimetres (uu) for distances, uu/s for
//! velocities and radians for angles. Scenarios may be authored in metric
//! units instead and are converted before the initial world state is written.

use serde::{Deserialize, Serialize};

use crate::host::{Rotator, Vector3};

/// Unreal units per metre.
pub const UU_PER_METER: f64 = 100.0;

/// Unit system a scenario's start values are authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Host units (uu, uu/s, radians, rad/s).
    #[default]
    Unreal,
    /// Metres, metres per second, degrees and degrees per second.
    Metric,
}

impl UnitSystem {
    /// Convert a distance (or linear velocity) to Unreal units.
    #[inline]
    pub fn distance_to_unreal(self, value: f64) -> f64 {
        match self {
            UnitSystem::Unreal => value,
            UnitSystem::Metric => value * UU_PER_METER,
        }
    }

    /// Convert an angle (or angular velocity) to radians.
    #[inline]
    pub fn angle_to_radians(self, value: f64) -> f64 {
        match self {
            UnitSystem::Unreal => value,
            UnitSystem::Metric => value.to_radians(),
        }
    }
}

/// Authored three-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Linear quantity in host units.
    pub fn to_unreal_vector(self, units: UnitSystem) -> Vector3 {
        Vector3 {
            x: units.distance_to_unreal(self.x) as f32,
            y: units.distance_to_unreal(self.y) as f32,
            z: units.distance_to_unreal(self.z) as f32,
        }
    }

    /// Angular velocity in rad/s, as a host vector.
    pub fn to_angular_vector(self, units: UnitSystem) -> Vector3 {
        Vector3 {
            x: units.angle_to_radians(self.x) as f32,
            y: units.angle_to_radians(self.y) as f32,
            z: units.angle_to_radians(self.z) as f32,
        }
    }

    /// Euler angles (x = pitch, y = yaw, z = roll) as a host rotator.
    pub fn to_rotator(self, units: UnitSystem) -> Rotator {
        Rotator {
            pitch: units.angle_to_radians(self.x) as f32,
            yaw: units.angle_to_radians(self.y) as f32,
            roll: units.angle_to_radians(self.z) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreal_is_identity() {
        let v = Vec3::new(100.0, -250.5, 17.0);
        let out = v.to_unreal_vector(UnitSystem::Unreal);
        assert_eq!(out, Vector3 { x: 100.0, y: -250.5, z: 17.0 });

        let rot = Vec3::new(0.5, 1.0, -0.25).to_rotator(UnitSystem::Unreal);
        assert_eq!(rot.pitch, 0.5);
        assert_eq!(rot.yaw, 1.0);
        assert_eq!(rot.roll, -0.25);
    }

    #[test]
    fn test_metric_conversion() {
        let v = Vec3::new(1.0, -2.5, 0.17).to_unreal_vector(UnitSystem::Metric);
        assert!((v.x - 100.0).abs() < 1e-4);
        assert!((v.y + 250.0).abs() < 1e-4);
        assert!((v.z - 17.0).abs() < 1e-4);

        let rot = Vec3::new(90.0, 180.0, 0.0).to_rotator(UnitSystem::Metric);
        assert!((rot.pitch - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((rot.yaw - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(rot.roll, 0.0);
    }

    #[test]
    fn test_unit_system_serde() {
        let units: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(units, UnitSystem::Metric);
        assert_eq!(UnitSystem::default(), UnitSystem::Unreal);
    }
}
