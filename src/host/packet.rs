//! Per-tick observation delivered by the host.

use serde::{Deserialize, Serialize};

/// Vector in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    #[serde(with = "json_f32")]
    pub x: f32,
    #[serde(with = "json_f32")]
    pub y: f32,
    #[serde(with = "json_f32")]
    pub z: f32,
}

/// Orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    #[serde(with = "json_f32")]
    pub pitch: f32,
    #[serde(with = "json_f32")]
    pub yaw: f32,
    #[serde(with = "json_f32")]
    pub roll: f32,
}

/// Rigid body state of a car or the ball.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Physics {
    pub location: Vector3,
    pub rotation: Rotator,
    pub velocity: Vector3,
    pub angular_velocity: Vector3,
}

/// Observed state of one car.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarInfo {
    pub physics: Physics,
    pub team: u8,
    #[serde(with = "json_f32")]
    pub boost: f32,
    pub has_wheel_contact: bool,
    pub is_super_sonic: bool,
    pub jumped: bool,
    pub double_jumped: bool,
}

/// Snapshot of the simulation at one tick.
///
/// Packets are owned values; the recorder keeps its own copy of each one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameTickPacket {
    /// Host simulation clock in seconds.
    #[serde(with = "json_f32")]
    pub seconds_elapsed: f32,
    /// Host frame number.
    pub frame: u64,
    pub ball: Physics,
    pub cars: Vec<CarInfo>,
}

impl GameTickPacket {
    /// Simulation clock widened for accumulation.
    #[inline]
    pub fn clock(&self) -> f64 {
        f64::from(self.seconds_elapsed)
    }
}

/// Packets are recorded as JSON, which has no NaN or infinity. Finite values
/// stay numbers; the others are written as the strings `"NaN"`, `"inf"` and
/// `"-inf"` so a recorded packet reads back bit-for-bit.
mod json_f32 {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f32(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        deserializer.deserialize_any(F32Visitor)
    }

    struct F32Visitor;

    impl Visitor<'_> for F32Visitor {
        type Value = f32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or one of \"NaN\", \"inf\", \"-inf\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f32, E> {
            match v {
                "NaN" => Ok(f32::NAN),
                "inf" => Ok(f32::INFINITY),
                "-inf" => Ok(f32::NEG_INFINITY),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }
}
