//! Scenario parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or saving scenarios.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported scenario file format: {0}")]
    UnsupportedFormat(String),

    #[error("Scenario validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Broad family a scenario belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCategory {
    FileOps,
    CodeSearch,
    Debugging,
    MultiStep,
    EdgeCases,
    HallucinationTests,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// The prompt handed to the model.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Prompt {
    pub user_query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default)]
    pub files_mentioned: Vec<String>,
}

/// The tool-usage contract a model is judged against.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExpectedBehavior {
    /// Tools that must be called at least once
    #[serde(default)]
    pub required_tools: Vec<String>,

    /// Tools that may be called without penalty
    #[serde(default)]
    pub optional_tools: Vec<String>,

    /// Tools whose use fails the scenario outright
    #[serde(default)]
    pub forbidden_tools: Vec<String>,

    /// tool name -> parameter name -> exact expected value
    #[serde(default)]
    pub required_parameters: BTreeMap<String, BTreeMap<String, Value>>,

    #[serde(default)]
    pub sequence_matters: bool,

    #[serde(default)]
    pub expected_sequence: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tool_calls: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tool_calls: Option<u32>,
}

/// Known ways a model tends to fake its work on this scenario.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HallucinationTraps {
    pub description: String,

    #[serde(default)]
    pub common_mistakes: Vec<String>,
}

fn default_expected_time() -> u32 {
    10
}

/// A tool-calling test scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub id: String,

    pub name: String,

    pub category: ScenarioCategory,

    pub prompt: Prompt,

    #[serde(default)]
    pub expected_behavior: ExpectedBehavior,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hallucination_traps: Option<HallucinationTraps>,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Expected completion time in seconds
    #[serde(default = "default_expected_time")]
    pub expected_time: u32,
}

impl Scenario {
    /// Build a scenario in code. Mostly useful in tests and tooling.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ScenarioCategory,
        user_query: impl Into<String>,
        expected_behavior: ExpectedBehavior,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            prompt: Prompt {
                user_query: user_query.into(),
                ..Prompt::default()
            },
            expected_behavior,
            hallucination_traps: None,
            difficulty: Difficulty::default(),
            expected_time: default_expected_time(),
        }
    }

    /// Parse a scenario from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let format = ScenarioFormat::from_path(path)?;
        let contents = fs::read_to_string(path)?;
        match format {
            ScenarioFormat::Yaml => Self::from_yaml(&contents),
            ScenarioFormat::Json => Self::from_json(&contents),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the scenario to disk, picking the format from the extension.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let path = path.as_ref();
        let contents = match ScenarioFormat::from_path(path)? {
            ScenarioFormat::Yaml => self.to_yaml()?,
            ScenarioFormat::Json => self.to_json()?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate load-time invariants.
    ///
    /// Softer authoring rules live in [`super::ScenarioLinter`].
    fn validate(&self) -> Result<(), ScenarioError> {
        if self.id.trim().is_empty() {
            return Err(ScenarioError::MissingField("id".to_string()));
        }

        if self.name.trim().is_empty() {
            return Err(ScenarioError::MissingField("name".to_string()));
        }

        let behavior = &self.expected_behavior;
        if behavior.sequence_matters && behavior.expected_sequence.is_empty() {
            return Err(ScenarioError::ValidationError(
                "expected_sequence required when sequence_matters is true".to_string(),
            ));
        }

        Ok(())
    }
}

/// On-disk scenario encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScenarioFormat {
    Yaml,
    Json,
}

impl ScenarioFormat {
    pub(crate) fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(ScenarioFormat::Yaml),
            Some("json") => Ok(ScenarioFormat::Json),
            other => Err(ScenarioError::UnsupportedFormat(
                other.map(|e| format!(".{e}")).unwrap_or_else(|| path.display().to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SCENARIO: &str = r#"
id: "file_read_001"
name: "Simple file read"
category: file_ops
prompt:
  user_query: "What does config.yaml contain?"
  files_mentioned:
    - "config.yaml"
expected_behavior:
  required_tools:
    - read_file
  forbidden_tools:
    - run_terminal_command
  required_parameters:
    read_file:
      file_path: "config.yaml"
  max_tool_calls: 2
difficulty: easy
"#;

    #[test]
    fn test_parse_valid_scenario() {
        let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();
        assert_eq!(scenario.id, "file_read_001");
        assert_eq!(scenario.category, ScenarioCategory::FileOps);
        assert_eq!(scenario.difficulty, Difficulty::Easy);
        assert_eq!(scenario.expected_time, 10);
        assert_eq!(scenario.expected_behavior.max_tool_calls, Some(2));
        assert_eq!(
            scenario.expected_behavior.required_parameters["read_file"]["file_path"],
            "config.yaml"
        );
    }

    #[test]
    fn test_defaults_apply() {
        let json = r#"{
            "id": "s1",
            "name": "Defaults",
            "category": "debugging",
            "prompt": {"user_query": "Find the bug in main.py"}
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert_eq!(scenario.difficulty, Difficulty::Medium);
        assert!(scenario.expected_behavior.required_tools.is_empty());
        assert!(!scenario.expected_behavior.sequence_matters);
        assert!(scenario.hallucination_traps.is_none());
    }

    #[test]
    fn test_empty_id_rejected() {
        let yaml = r#"
id: "  "
name: "Test"
category: file_ops
prompt:
  user_query: "Read the file please"
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(result, Err(ScenarioError::MissingField(f)) if f == "id"));
    }

    #[test]
    fn test_sequence_without_steps_rejected() {
        let yaml = r#"
id: "seq"
name: "Sequence"
category: multi_step
prompt:
  user_query: "Read then edit the file"
expected_behavior:
  sequence_matters: true
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(result, Err(ScenarioError::ValidationError(_))));
    }

    #[test]
    fn test_negative_bounds_rejected_at_parse() {
        let yaml = r#"
id: "neg"
name: "Negative"
category: edge_cases
prompt:
  user_query: "Do nothing at all"
expected_behavior:
  min_tool_calls: -1
"#;
        assert!(matches!(
            Scenario::from_yaml(yaml),
            Err(ScenarioError::YamlError(_))
        ));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = Scenario::from_file("scenario.toml");
        assert!(matches!(result, Err(ScenarioError::UnsupportedFormat(ext)) if ext == ".toml"));
    }

    #[test]
    fn test_file_roundtrip_preserves_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();

        let yaml_path = dir.path().join("nested/file_read.yaml");
        scenario.to_file(&yaml_path).unwrap();
        assert_eq!(Scenario::from_file(&yaml_path).unwrap(), scenario);

        let json_path = dir.path().join("file_read.json");
        scenario.to_file(&json_path).unwrap();
        assert_eq!(Scenario::from_file(&json_path).unwrap(), scenario);
    }
}
