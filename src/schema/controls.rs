//! Controller output schema.
//!
//! Scenario actions name their inputs by string. Every name is looked up in a
//! fixed table of [`ControlField`]s; names outside the table are rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Control output returned to the host for one tick.
///
/// `Default` is the neutral (idle) output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    /// Forward/backward drive in [-1, 1].
    pub throttle: f32,
    /// Left/right steering in [-1, 1].
    pub steer: f32,
    /// Air pitch in [-1, 1].
    pub pitch: f32,
    /// Air yaw in [-1, 1].
    pub yaw: f32,
    /// Air roll in [-1, 1].
    pub roll: f32,
    pub jump: bool,
    pub boost: bool,
    pub handbrake: bool,
    pub use_item: bool,
}

/// Value of a single authored input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Number(f64),
}

impl From<f64> for InputValue {
    fn from(v: f64) -> Self {
        InputValue::Number(v)
    }
}

impl From<bool> for InputValue {
    fn from(v: bool) -> Self {
        InputValue::Bool(v)
    }
}

/// Named field of a [`ControllerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlField {
    Throttle,
    Steer,
    Pitch,
    Yaw,
    Roll,
    Jump,
    Boost,
    Handbrake,
    UseItem,
}

impl ControlField {
    /// All fields in declaration order.
    pub const ALL: [ControlField; 9] = [
        ControlField::Throttle,
        ControlField::Steer,
        ControlField::Pitch,
        ControlField::Yaw,
        ControlField::Roll,
        ControlField::Jump,
        ControlField::Boost,
        ControlField::Handbrake,
        ControlField::UseItem,
    ];

    /// Input name as written in scenario files.
    pub fn name(self) -> &'static str {
        match self {
            ControlField::Throttle => "throttle",
            ControlField::Steer => "steer",
            ControlField::Pitch => "pitch",
            ControlField::Yaw => "yaw",
            ControlField::Roll => "roll",
            ControlField::Jump => "jump",
            ControlField::Boost => "boost",
            ControlField::Handbrake => "handbrake",
            ControlField::UseItem => "use_item",
        }
    }

    /// Whether this field is an analog axis (as opposed to a button).
    pub fn is_analog(self) -> bool {
        matches!(
            self,
            ControlField::Throttle
                | ControlField::Steer
                | ControlField::Pitch
                | ControlField::Yaw
                | ControlField::Roll
        )
    }
}

impl FromStr for ControlField {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ControlError::UnknownInput {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ControllerState {
    /// Build a control output from named inputs applied over the neutral state.
    ///
    /// Later inputs overwrite earlier ones with the same name.
    pub fn from_inputs<'a, I>(inputs: I) -> Result<Self, ControlError>
    where
        I: IntoIterator<Item = (&'a str, InputValue)>,
    {
        let mut controls = Self::default();
        for (name, value) in inputs {
            controls.set_input(name, value)?;
        }
        Ok(controls)
    }

    /// Set the field called `name`.
    pub fn set_input(&mut self, name: &str, value: InputValue) -> Result<(), ControlError> {
        let field: ControlField = name.parse()?;
        self.set(field, value)
    }

    /// Set a field. Analog values are clamped to [-1, 1]; booleans map to 1.0 / 0.0.
    /// Buttons accept booleans or numbers (non-zero is pressed).
    pub fn set(&mut self, field: ControlField, value: InputValue) -> Result<(), ControlError> {
        if let InputValue::Number(v) = value {
            if !v.is_finite() {
                return Err(ControlError::NonFinite {
                    name: field.name().to_string(),
                    value: v,
                });
            }
        }

        match field {
            ControlField::Throttle => self.throttle = axis_value(field, value),
            ControlField::Steer => self.steer = axis_value(field, value),
            ControlField::Pitch => self.pitch = axis_value(field, value),
            ControlField::Yaw => self.yaw = axis_value(field, value),
            ControlField::Roll => self.roll = axis_value(field, value),
            ControlField::Jump => self.jump = button_value(value),
            ControlField::Boost => self.boost = button_value(value),
            ControlField::Handbrake => self.handbrake = button_value(value),
            ControlField::UseItem => self.use_item = button_value(value),
        }
        Ok(())
    }

    /// True if every field holds its neutral value.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

fn axis_value(field: ControlField, value: InputValue) -> f32 {
    let raw = match value {
        InputValue::Number(v) => v,
        InputValue::Bool(b) => f64::from(u8::from(b)),
    };
    let clamped = raw.clamp(-1.0, 1.0);
    if clamped != raw {
        log::warn!("Input '{}' value {} clamped to {}", field, raw, clamped);
    }
    clamped as f32
}

fn button_value(value: InputValue) -> bool {
    match value {
        InputValue::Bool(b) => b,
        InputValue::Number(v) => v != 0.0,
    }
}

/// Errors raised while building a control output.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Unknown control input '{name}'")]
    UnknownInput { name: String },
    #[error("Control input '{name}' has non-finite value {value}")]
    NonFinite { name: String, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let controls = ControllerState::default();
        assert!(controls.is_neutral());
        assert_eq!(controls.throttle, 0.0);
        assert!(!controls.jump);
    }

    #[test]
    fn test_from_inputs_sets_named_fields() {
        let controls = ControllerState::from_inputs([
            ("throttle", InputValue::Number(1.0)),
            ("steer", InputValue::Number(-0.5)),
            ("boost", InputValue::Bool(true)),
            ("use_item", InputValue::Number(1.0)),
        ])
        .unwrap();

        assert_eq!(controls.throttle, 1.0);
        assert_eq!(controls.steer, -0.5);
        assert!(controls.boost);
        assert!(controls.use_item);
        assert!(!controls.jump);
        assert!(!controls.is_neutral());
    }

    #[test]
    fn test_unknown_input_rejected() {
        let err = ControllerState::from_inputs([("nitro", InputValue::Bool(true))]).unwrap_err();
        match err {
            ControlError::UnknownInput { name } => assert_eq!(name, "nitro"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_analog_clamped_and_bool_coerced() {
        let mut controls = ControllerState::default();
        controls.set(ControlField::Throttle, InputValue::Number(3.0)).unwrap();
        assert_eq!(controls.throttle, 1.0);

        controls.set(ControlField::Yaw, InputValue::Bool(true)).unwrap();
        assert_eq!(controls.yaw, 1.0);

        controls.set(ControlField::Jump, InputValue::Number(0.0)).unwrap();
        assert!(!controls.jump);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut controls = ControllerState::default();
        assert!(matches!(
            controls.set_input("pitch", InputValue::Number(f64::NAN)),
            Err(ControlError::NonFinite { .. })
        ));
        assert!(controls.is_neutral());
    }

    #[test]
    fn test_field_names_parse_back() {
        for field in ControlField::ALL {
            assert_eq!(field.name().parse::<ControlField>().unwrap(), field);
        }
    }

    #[test]
    fn test_input_value_untagged() {
        let v: InputValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, InputValue::Bool(true));
        let v: InputValue = serde_json::from_str("0.75").unwrap();
        assert_eq!(v, InputValue::Number(0.75));
        let v: InputValue = serde_json::from_str("1").unwrap();
        assert_eq!(v, InputValue::Number(1.0));
    }
}
