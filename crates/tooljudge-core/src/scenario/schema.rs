//! JSON Schema validation for scenarios.
//!
//! Scenario files are checked against `schema/scenario.schema.json`, which is
//! embedded at compile time. Typed deserialization catches shape errors too,
//! but the schema reports every problem at once with instance paths, which is
//! what authors want when linting a scenario library.

use std::sync::OnceLock;
use thiserror::Error;

const SCENARIO_SCHEMA_JSON: &str = include_str!("../../schema/scenario.schema.json");

/// Compiled validator, built on first use.
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(SCENARIO_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {e}"))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {e}"))
    });

    result
        .as_ref()
        .map_err(|e| SchemaError::LoadError(e.clone()))
}

/// Validate a scenario document against the embedded schema.
///
/// Returns every violation as `"<message> at <instance path>"`.
pub fn validate_scenario_schema(scenario_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(scenario_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check raw scenario text, YAML or JSON, against the embedded schema.
///
/// JSON is a subset of YAML, so one parser covers both encodings. Text that
/// is not a document at all comes back as a single error.
pub fn validate_scenario_text(text: &str) -> Result<(), Vec<String>> {
    let document: serde_json::Value = serde_yaml::from_str(text)
        .map_err(|e| vec![format!("not a YAML/JSON document: {e}")])?;
    validate_scenario_schema(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_scenario_passes_schema() {
        let value = json!({
            "id": "file_read_001",
            "name": "Read a config file",
            "category": "file_ops",
            "prompt": { "user_query": "What port does config.yaml set?" },
            "expected_behavior": {
                "required_tools": ["read_file"],
                "required_parameters": { "read_file": { "file_path": "config.yaml" } },
                "max_tool_calls": 3
            },
            "difficulty": "easy"
        });
        assert!(validate_scenario_schema(&value).is_ok());
    }

    #[test]
    fn test_missing_required_fields_fail() {
        let value = json!({ "id": "x" });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_unknown_category_fails() {
        let value = json!({
            "id": "x",
            "name": "Bad category",
            "category": "networking",
            "prompt": { "user_query": "Ping the server please" }
        });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("/category")));
    }

    #[test]
    fn test_negative_call_bound_fails() {
        let value = json!({
            "id": "x",
            "name": "Negative",
            "category": "edge_cases",
            "prompt": { "user_query": "Do nothing at all" },
            "expected_behavior": { "min_tool_calls": -2 }
        });
        assert!(validate_scenario_schema(&value).is_err());
    }

    #[test]
    fn test_yaml_text_is_checked() {
        let text =
            "id: s\nname: S\ncategory: debugging\nprompt:\n  user_query: Fix the failing test\n";
        assert!(validate_scenario_text(text).is_ok());

        let errors = validate_scenario_text("id: s\nname: S\ncategory: nope\n").unwrap_err();
        assert!(errors.iter().any(|e| e.contains("/category")));
    }

    #[test]
    fn test_unparseable_text_is_one_error() {
        let errors = validate_scenario_text("id: [unterminated").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("not a YAML/JSON document"));
    }
}
