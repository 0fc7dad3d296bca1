//! Scenario files: timed actions plus initial object placements.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use super::{ControlError, ControllerState, InputValue, UnitSystem, Vec3};
use crate::host::{BallState, CarState, GameState, Physics};

/// Authored test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Scenario name; also names the tick log.
    pub name: String,
    /// Total scenario time in seconds.
    pub time: f64,
    /// Units the start values are authored in.
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// Actions played by agents without per-car actions.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub game_objects: Vec<GameObjectSpec>,
}

/// One timed action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Seconds the inputs are held.
    pub duration: f64,
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
}

/// A named control input and its value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub value: InputValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameObjectKind {
    Car,
    Ball,
}

/// A car or ball placed at scenario start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameObjectSpec {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub game_object: GameObjectKind,
    #[serde(default)]
    pub start_values: StartValues,
    /// Actions for the agent driving this car. Empty means use the scenario actions.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartValues {
    #[serde(default)]
    pub location: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default)]
    pub angular_velocity: Vec3,
}

impl StartValues {
    pub fn is_finite(&self) -> bool {
        self.location.is_finite()
            && self.rotation.is_finite()
            && self.velocity.is_finite()
            && self.angular_velocity.is_finite()
    }

    /// Convert to host physics.
    pub fn to_physics(&self, units: UnitSystem) -> Physics {
        Physics {
            location: self.location.to_unreal_vector(units),
            rotation: self.rotation.to_rotator(units),
            velocity: self.velocity.to_unreal_vector(units),
            angular_velocity: self.angular_velocity.to_angular_vector(units),
        }
    }
}

impl ActionSpec {
    /// Control output for this action, applied over the neutral state.
    pub fn controls(&self) -> Result<ControllerState, ControlError> {
        ControllerState::from_inputs(self.inputs.iter().map(|i| (i.name.as_str(), i.value)))
    }
}

impl Scenario {
    /// Read, parse and validate a scenario file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a scenario from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Validate times, inputs and object definitions.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !is_file_stem(&self.name) {
            return Err(ScenarioError::InvalidName(self.name.clone()));
        }
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(ScenarioError::InvalidTime(self.time));
        }
        validate_actions("scenario", &self.actions)?;

        let mut seen = HashSet::new();
        for object in &self.game_objects {
            if !seen.insert(object.id.as_str()) {
                return Err(ScenarioError::DuplicateObject(object.id.clone()));
            }
            if !object.start_values.is_finite() {
                return Err(ScenarioError::NonFiniteStartValues(object.id.clone()));
            }
            validate_actions(&format!("game object '{}'", object.id), &object.actions)?;
        }
        Ok(())
    }

    /// Actions played by the agent driving `car_id`.
    ///
    /// A car with its own non-empty action list plays those; everyone else
    /// plays the scenario-level list.
    pub fn actions_for(&self, car_id: Option<&str>) -> Result<&[ActionSpec], ScenarioError> {
        let Some(id) = car_id else {
            return Ok(&self.actions);
        };
        let object = self
            .game_objects
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ScenarioError::UnknownCar(id.to_string()))?;
        if object.actions.is_empty() {
            Ok(&self.actions)
        } else {
            Ok(&object.actions)
        }
    }

    /// World state placing every configured object at its start values.
    ///
    /// Cars are numbered in the order they appear; a later ball replaces an earlier one.
    pub fn initial_game_state(&self) -> GameState {
        let mut state = GameState::default();
        for object in &self.game_objects {
            let physics = object.start_values.to_physics(self.unit_system);
            match object.game_object {
                GameObjectKind::Car => {
                    let index = state.cars.len();
                    state.cars.insert(index, CarState { physics });
                }
                GameObjectKind::Ball => state.ball = Some(BallState { physics }),
            }
        }
        state
    }
}

/// The name becomes a file name inside the results directory, so it must be
/// a single non-empty path component.
fn is_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn validate_actions(scope: &str, actions: &[ActionSpec]) -> Result<(), ScenarioError> {
    for (index, action) in actions.iter().enumerate() {
        if !action.duration.is_finite() || action.duration <= 0.0 {
            return Err(ScenarioError::InvalidDuration {
                scope: scope.to_string(),
                index,
                duration: action.duration,
            });
        }
        action
            .controls()
            .map_err(|source| ScenarioError::InvalidInput {
                scope: scope.to_string(),
                index,
                source,
            })?;
    }
    Ok(())
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Scenario loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Scenario name '{0}' is not a plain file name")]
    InvalidName(String),
    #[error("Scenario time must be finite and non-negative, got {0}")]
    InvalidTime(f64),
    #[error("Action {index} of {scope} must have a finite positive duration, got {duration}")]
    InvalidDuration {
        scope: String,
        index: usize,
        duration: f64,
    },
    #[error("Action {index} of {scope}: {source}")]
    InvalidInput {
        scope: String,
        index: usize,
        #[source]
        source: ControlError,
    },
    #[error("Duplicate game object id '{0}'")]
    DuplicateObject(String),
    #[error("Game object '{0}' has non-finite start values")]
    NonFiniteStartValues(String),
    #[error("No game object with id '{0}'")]
    UnknownCar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const KICKOFF: &str = r#"{
        "name": "kickoff",
        "time": 5.0,
        "actions": [
            { "duration": 2.0, "inputs": [{ "name": "throttle", "value": 1.0 }] }
        ],
        "gameObjects": [
            {
                "id": 1,
                "gameObject": "car",
                "startValues": {
                    "location": { "x": 0.0, "y": -4608.0, "z": 17.0 },
                    "rotation": { "x": 0.0, "y": 1.5708, "z": 0.0 },
                    "velocity": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "angularVelocity": { "x": 0.0, "y": 0.0, "z": 0.0 }
                },
                "actions": [
                    { "duration": 1.0, "inputs": [{ "name": "boost", "value": true }] }
                ]
            },
            {
                "id": "2",
                "gameObject": "car",
                "startValues": { "location": { "x": 0.0, "y": 4608.0, "z": 17.0 } }
            },
            {
                "id": "ball",
                "gameObject": "ball",
                "startValues": { "location": { "x": 0.0, "y": 0.0, "z": 92.75 } }
            }
        ]
    }"#;

    #[test]
    fn test_parse_and_validate() {
        let scenario = Scenario::from_json(KICKOFF).unwrap();
        assert_eq!(scenario.name, "kickoff");
        assert_eq!(scenario.time, 5.0);
        assert_eq!(scenario.unit_system, UnitSystem::Unreal);
        assert_eq!(scenario.actions.len(), 1);
        assert_eq!(scenario.game_objects.len(), 3);
        assert_eq!(scenario.game_objects[0].id, "1");
        assert_eq!(scenario.game_objects[2].game_object, GameObjectKind::Ball);
    }

    #[test]
    fn test_actions_for_car() {
        let scenario = Scenario::from_json(KICKOFF).unwrap();

        let own = scenario.actions_for(Some("1")).unwrap();
        assert_eq!(own.len(), 1);
        assert!(own[0].controls().unwrap().boost);

        let shared = scenario.actions_for(Some("2")).unwrap();
        assert_eq!(shared[0].controls().unwrap().throttle, 1.0);

        assert_eq!(scenario.actions_for(None).unwrap().len(), 1);
        assert!(matches!(
            scenario.actions_for(Some("9")),
            Err(ScenarioError::UnknownCar(id)) if id == "9"
        ));
    }

    #[test]
    fn test_initial_game_state() {
        let scenario = Scenario::from_json(KICKOFF).unwrap();
        let state = scenario.initial_game_state();

        assert_eq!(state.cars.len(), 2);
        assert_eq!(state.cars[&0].physics.location.y, -4608.0);
        assert_eq!(state.cars[&1].physics.location.y, 4608.0);
        assert!((state.cars[&0].physics.rotation.yaw - 1.5708).abs() < 1e-6);
        let ball = state.ball.unwrap();
        assert_eq!(ball.physics.location.z, 92.75);
    }

    #[test]
    fn test_metric_start_values_converted() {
        let json = r#"{
            "name": "metric",
            "time": 1.0,
            "unitSystem": "metric",
            "gameObjects": [
                { "id": "ball", "gameObject": "ball",
                  "startValues": { "location": { "x": 1.0, "y": 2.0, "z": 0.9275 },
                                   "velocity": { "x": 0.0, "y": 10.0, "z": 0.0 } } }
            ]
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        let ball = scenario.initial_game_state().ball.unwrap();
        assert!((ball.physics.location.x - 100.0).abs() < 1e-3);
        assert!((ball.physics.location.z - 92.75).abs() < 1e-3);
        assert!((ball.physics.velocity.y - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_duration() {
        let json = r#"{ "name": "bad", "time": 1.0, "actions": [{ "duration": 0.0 }] }"#;
        assert!(matches!(
            Scenario::from_json(json),
            Err(ScenarioError::InvalidDuration { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_negative_time() {
        let json = r#"{ "name": "bad", "time": -1.0 }"#;
        assert!(matches!(
            Scenario::from_json(json),
            Err(ScenarioError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_input() {
        let json = r#"{ "name": "bad", "time": 1.0,
            "actions": [{ "duration": 1.0, "inputs": [{ "name": "warp", "value": 1 }] }] }"#;
        let err = Scenario::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::InvalidInput {
                source: ControlError::UnknownInput { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{ "name": "dup", "time": 1.0, "gameObjects": [
            { "id": "a", "gameObject": "car" }, { "id": "a", "gameObject": "ball" } ] }"#;
        assert!(matches!(
            Scenario::from_json(json),
            Err(ScenarioError::DuplicateObject(id)) if id == "a"
        ));
    }

    #[test]
    fn test_rejects_name_escaping_results_dir() {
        for name in ["../outside", "a/b", "a\\\\b", "..", ".", ""] {
            let json = format!(r#"{{ "name": "{name}", "time": 1.0 }}"#);
            assert!(
                matches!(Scenario::from_json(&json), Err(ScenarioError::InvalidName(_))),
                "accepted name {name:?}"
            );
        }
        assert!(Scenario::from_json(r#"{ "name": "kickoff.v2", "time": 1.0 }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Scenario::from_json("{ not json"),
            Err(ScenarioError::Parse(_))
        ));
    }
}
