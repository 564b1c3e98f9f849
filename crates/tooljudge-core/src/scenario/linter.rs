//! Authoring rules for scenarios.
//!
//! The validation engine trusts its scenario. These checks are where a
//! scenario library gets policed: overlapping required/forbidden sets,
//! sequences naming undeclared tools, inverted call bounds and so on.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Difficulty, Scenario};

const MIN_QUERY_LEN: usize = 10;
const EASY_MAX_SECONDS: u32 = 30;
const HARD_MIN_SECONDS: u32 = 10;

/// One authoring problem in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioIssue {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ScenarioIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ScenarioIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks scenarios against the authoring rules.
pub struct ScenarioLinter;

impl ScenarioLinter {
    pub fn new() -> Self {
        Self
    }

    /// Return every rule the scenario breaks, in a stable order.
    pub fn lint(&self, scenario: &Scenario) -> Vec<ScenarioIssue> {
        let mut issues = Vec::new();
        self.lint_prompt(scenario, &mut issues);
        self.lint_expected_behavior(scenario, &mut issues);
        self.lint_timing(scenario, &mut issues);
        issues
    }

    pub fn is_valid(&self, scenario: &Scenario) -> bool {
        self.lint(scenario).is_empty()
    }

    fn lint_prompt(&self, scenario: &Scenario, issues: &mut Vec<ScenarioIssue>) {
        let query = &scenario.prompt.user_query;

        if query.trim().is_empty() {
            issues.push(ScenarioIssue::new("prompt.user_query", "Cannot be empty"));
        }

        if query.chars().count() < MIN_QUERY_LEN {
            issues.push(ScenarioIssue::new(
                "prompt.user_query",
                format!("Too short (minimum {MIN_QUERY_LEN} characters)"),
            ));
        }
    }

    fn lint_expected_behavior(&self, scenario: &Scenario, issues: &mut Vec<ScenarioIssue>) {
        let behavior = &scenario.expected_behavior;
        let required: BTreeSet<&str> = behavior.required_tools.iter().map(String::as_str).collect();
        let optional: BTreeSet<&str> = behavior.optional_tools.iter().map(String::as_str).collect();
        let forbidden: BTreeSet<&str> =
            behavior.forbidden_tools.iter().map(String::as_str).collect();
        let declared = |tool: &str| required.contains(tool) || optional.contains(tool);

        if required.is_empty() && optional.is_empty() {
            issues.push(ScenarioIssue::new(
                "expected_behavior",
                "Must specify at least one required or optional tool",
            ));
        }

        let overlap: Vec<&str> = required.intersection(&forbidden).copied().collect();
        if !overlap.is_empty() {
            issues.push(ScenarioIssue::new(
                "expected_behavior",
                format!("Tools cannot be both required and forbidden: {}", overlap.join(", ")),
            ));
        }

        let overlap: Vec<&str> = optional.intersection(&forbidden).copied().collect();
        if !overlap.is_empty() {
            issues.push(ScenarioIssue::new(
                "expected_behavior",
                format!("Tools cannot be both optional and forbidden: {}", overlap.join(", ")),
            ));
        }

        if behavior.sequence_matters {
            if behavior.expected_sequence.is_empty() {
                issues.push(ScenarioIssue::new(
                    "expected_behavior.expected_sequence",
                    "Required when sequence_matters is true",
                ));
            }

            for tool in &behavior.expected_sequence {
                if !declared(tool.as_str()) {
                    issues.push(ScenarioIssue::new(
                        "expected_behavior.expected_sequence",
                        format!("Tool '{tool}' in sequence but not in required or optional tools"),
                    ));
                }
            }
        }

        if let (Some(min), Some(max)) = (behavior.min_tool_calls, behavior.max_tool_calls) {
            if min > max {
                issues.push(ScenarioIssue::new(
                    "expected_behavior",
                    format!("min_tool_calls ({min}) cannot be greater than max_tool_calls ({max})"),
                ));
            }
        }

        for tool in behavior.required_parameters.keys() {
            if !declared(tool.as_str()) {
                issues.push(ScenarioIssue::new(
                    "expected_behavior.required_parameters",
                    format!(
                        "Tool '{tool}' has required parameters but is not in required or optional tools"
                    ),
                ));
            }
        }
    }

    fn lint_timing(&self, scenario: &Scenario, issues: &mut Vec<ScenarioIssue>) {
        match scenario.difficulty {
            Difficulty::Easy if scenario.expected_time > EASY_MAX_SECONDS => {
                issues.push(ScenarioIssue::new(
                    "expected_time",
                    format!("Easy scenarios should complete in under {EASY_MAX_SECONDS} seconds"),
                ));
            }
            Difficulty::Hard if scenario.expected_time < HARD_MIN_SECONDS => {
                issues.push(ScenarioIssue::new(
                    "expected_time",
                    format!("Hard scenarios typically take more than {HARD_MIN_SECONDS} seconds"),
                ));
            }
            _ => {}
        }
    }
}

impl Default for ScenarioLinter {
    fn default() -> Self {
        Self::new()
    }
}
