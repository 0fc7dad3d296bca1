//! Settings and per-agent configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extension of recorded tick logs.
pub const TICK_LOG_EXTENSION: &str = "ticklog";

fn default_lead() -> bool {
    true
}

/// Shared settings file: where scenarios are read from and logs written to.
///
/// Relative paths are resolved against the directory containing the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory holding scenario files.
    pub scenario_dir: PathBuf,
    /// Scenario file name within `scenario_dir`.
    pub scenario_file: PathBuf,
    /// Directory tick logs are written to.
    pub results_dir: PathBuf,
}

impl Settings {
    /// Read and validate a settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;

        if let Some(base) = path.parent() {
            settings.scenario_dir = base.join(&settings.scenario_dir);
            settings.results_dir = base.join(&settings.results_dir);
        }
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.scenario_file.as_os_str().is_empty() {
            return Err(SettingsError::MissingScenarioFile);
        }
        Ok(())
    }

    /// Full path of the scenario file.
    pub fn scenario_path(&self) -> PathBuf {
        self.scenario_dir.join(&self.scenario_file)
    }

    /// Tick log path for the named scenario.
    pub fn log_path(&self, scenario_name: &str) -> PathBuf {
        self.results_dir
            .join(format!("{scenario_name}.{TICK_LOG_EXTENSION}"))
    }
}

/// Configuration of one agent instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Path to the settings file.
    pub settings: PathBuf,
    /// Lead agents record the tick log and write the initial world state.
    #[serde(default = "default_lead")]
    pub lead: bool,
    /// Game object this agent drives.
    #[serde(default)]
    pub car_id: Option<String>,
}

impl AgentConfig {
    pub fn new<P: Into<PathBuf>>(settings: P, lead: bool) -> Self {
        Self {
            settings: settings.into(),
            lead,
            car_id: None,
        }
    }

    pub fn with_car_id(mut self, car_id: impl Into<String>) -> Self {
        self.car_id = Some(car_id.into());
        self
    }

    /// Derive the car id from an agent name of the form `<prefix>_<id>[_...]`.
    pub fn with_agent_name(mut self, name: &str) -> Self {
        self.car_id = name.split('_').nth(1).map(str::to_string);
        self
    }
}

/// Settings loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Settings do not name a scenario file")]
    MissingScenarioFile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "scenarioDir": "scenarios", "scenarioFile": "kickoff.json", "resultsDir": "out" }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(
            settings.scenario_path(),
            dir.path().join("scenarios").join("kickoff.json")
        );
        assert_eq!(
            settings.log_path("kickoff"),
            dir.path().join("out").join("kickoff.ticklog")
        );
    }

    #[test]
    fn test_absolute_paths_kept() {
        let dir = tempdir().unwrap();
        let abs = dir.path().join("abs");
        let path = dir.path().join("settings.json");
        let json = serde_json::json!({
            "scenarioDir": abs,
            "scenarioFile": "s.json",
            "resultsDir": abs,
        });
        fs::write(&path, json.to_string()).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.scenario_path(), abs.join("s.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = Settings::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_empty_scenario_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "scenarioDir": ".", "scenarioFile": "", "resultsDir": "." }"#,
        )
        .unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::MissingScenarioFile)
        ));
    }

    #[test]
    fn test_agent_config_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{ "settings": "s.json" }"#).unwrap();
        assert!(config.lead);
        assert_eq!(config.car_id, None);

        let config = AgentConfig::new("s.json", false).with_agent_name("ReplayBot_2");
        assert!(!config.lead);
        assert_eq!(config.car_id.as_deref(), Some("2"));
    }
}
