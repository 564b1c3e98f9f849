//! Structural requirement checks.
//!
//! Each check compares one part of a scenario's expected behavior with the
//! action log and yields a [`RequirementCheck`]. Checks are independent of
//! each other and of the claim log.

use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::actions::ActionLog;
use crate::scenario::Scenario;
use crate::types::{RequirementCheck, ValidationStatus};

/// Required tools that were never called.
pub fn check_required_tools(scenario: &Scenario, actions: &ActionLog) -> RequirementCheck {
    let required = dedup(&scenario.expected_behavior.required_tools);
    let used = &actions.summary().unique_tools_used;

    let missing: Vec<String> = required
        .iter()
        .filter(|tool| !used.contains(tool.as_str()))
        .cloned()
        .collect();

    tracing::debug!(missing = ?missing, "Required tools check");

    RequirementCheck::new("Required Tools", ValidationStatus::from_ok(missing.is_empty()))
        .with_expected(json!(required))
        .with_actual(json!(used))
        .with_missing(missing)
}

/// Forbidden tools that were called.
pub fn check_forbidden_tools(scenario: &Scenario, actions: &ActionLog) -> RequirementCheck {
    let forbidden = dedup(&scenario.expected_behavior.forbidden_tools);
    let used = &actions.summary().unique_tools_used;

    let violations: Vec<String> = forbidden
        .iter()
        .filter(|tool| used.contains(tool.as_str()))
        .cloned()
        .collect();

    tracing::debug!(violations = ?violations, "Forbidden tools check");

    RequirementCheck::new("Forbidden Tools", ValidationStatus::from_ok(violations.is_empty()))
        .with_expected(json!(forbidden))
        .with_actual(json!(used))
        .with_extra(violations)
}

/// Exact-match comparison of declared parameters against every matching call.
///
/// Errors are joined with `"; "` into `details`; the scorer counts segments.
pub fn check_parameters(scenario: &Scenario, actions: &ActionLog) -> RequirementCheck {
    let mut errors = Vec::new();

    for (tool, expected_params) in &scenario.expected_behavior.required_parameters {
        let mut calls = actions.actions_for(tool).peekable();

        if calls.peek().is_none() {
            errors.push(format!("Tool {tool} not called"));
            continue;
        }

        for action in calls {
            for (param, expected) in expected_params {
                match action.argument(param) {
                    None => errors.push(format!("{tool}.{param}: missing")),
                    Some(actual) if actual != expected => errors.push(format!(
                        "{tool}.{param}: expected {}, got {}",
                        display_value(expected),
                        display_value(actual)
                    )),
                    Some(_) => {}
                }
            }
        }
    }

    tracing::debug!(errors = errors.len(), "Parameters check");

    let details = (!errors.is_empty()).then(|| errors.join("; "));
    RequirementCheck::new("Parameters", ValidationStatus::from_ok(errors.is_empty()))
        .with_details(details)
}

/// Ordered prefix comparison. `None` when the scenario does not care about order.
pub fn check_sequence(scenario: &Scenario, actions: &ActionLog) -> Option<RequirementCheck> {
    let behavior = &scenario.expected_behavior;
    if !behavior.sequence_matters {
        return None;
    }

    let expected = &behavior.expected_sequence;
    let actual = actions.tools_in_sequence();
    let matches = actual.len() >= expected.len()
        && expected.iter().zip(&actual).all(|(e, a)| e == a);

    tracing::debug!(matches, "Sequence check");

    Some(
        RequirementCheck::new("Sequence", ValidationStatus::from_ok(matches))
            .with_expected(json!(expected))
            .with_actual(json!(actual)),
    )
}

/// Min/max bounds on the total number of calls. `None` when unbounded.
pub fn check_call_count(scenario: &Scenario, actions: &ActionLog) -> Option<RequirementCheck> {
    let behavior = &scenario.expected_behavior;
    let (min, max) = (behavior.min_tool_calls, behavior.max_tool_calls);
    if min.is_none() && max.is_none() {
        return None;
    }

    let actual = actions.total_calls();
    let details = match (min, max) {
        (_, Some(max)) if actual > max as usize => {
            Some(format!("Too many calls: {actual} > {max}"))
        }
        (Some(min), _) if actual < min as usize => Some(format!("Too few calls: {actual} < {min}")),
        _ => None,
    };

    tracing::debug!(actual, ?min, ?max, "Call count check");

    Some(
        RequirementCheck::new("Call Count", ValidationStatus::from_ok(details.is_none()))
            .with_expected(json!({ "min": min, "max": max }))
            .with_actual(json!(actual))
            .with_details(details),
    )
}

/// Declaration order, duplicates collapsed.
fn dedup(tools: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tools
        .iter()
        .filter(|tool| seen.insert(tool.as_str()))
        .cloned()
        .collect()
}

/// Render a JSON value for messages: strings bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::scenario::{ExpectedBehavior, ScenarioCategory};

    fn scenario(behavior: ExpectedBehavior) -> Scenario {
        Scenario::new("chk", "Checks", ScenarioCategory::FileOps, "Read the config file", behavior)
    }

    fn log(calls: &[(&str, Value)]) -> ActionLog {
        let actions = calls
            .iter()
            .zip(1u32..)
            .map(|((name, args), seq)| {
                Action::new(seq, *name, args.as_object().cloned().unwrap_or_default())
            })
            .collect();
        ActionLog::new(Some("chk".into()), actions)
    }

    fn tools(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_required_vacuously_satisfied() {
        let check = check_required_tools(&scenario(ExpectedBehavior::default()), &log(&[]));
        assert!(check.passed());
        assert!(check.missing.is_empty());
    }

    #[test]
    fn test_required_missing_keeps_declaration_order() {
        let s = scenario(ExpectedBehavior {
            required_tools: tools(&["search_code", "read_file", "search_code", "edit_file"]),
            ..ExpectedBehavior::default()
        });
        let check = check_required_tools(&s, &log(&[("read_file", json!({}))]));
        assert!(check.failed());
        assert_eq!(check.missing, vec!["search_code", "edit_file"]);
    }

    #[test]
    fn test_forbidden_violation_recorded_as_extra() {
        let s = scenario(ExpectedBehavior {
            forbidden_tools: tools(&["run_terminal_command", "write_file"]),
            ..ExpectedBehavior::default()
        });
        let check = check_forbidden_tools(
            &s,
            &log(&[("run_terminal_command", json!({"command": "cat config.yaml"}))]),
        );
        assert!(check.failed());
        assert_eq!(check.extra, vec!["run_terminal_command"]);
    }

    #[test]
    fn test_parameters_all_error_kinds() {
        let mut behavior = ExpectedBehavior::default();
        behavior.required_parameters.insert(
            "read_file".into(),
            [
                ("file_path".to_string(), json!("config.yaml")),
                ("line_start".to_string(), json!(1)),
            ]
            .into_iter()
            .collect(),
        );
        behavior.required_parameters.insert(
            "write_file".into(),
            [("file_path".to_string(), json!("out.txt"))].into_iter().collect(),
        );

        let check = check_parameters(
            &scenario(behavior),
            &log(&[("read_file", json!({"file_path": "settings.yaml"}))]),
        );

        assert!(check.failed());
        assert_eq!(
            check.details.as_deref(),
            Some(
                "read_file.file_path: expected config.yaml, got settings.yaml; \
                 read_file.line_start: missing; \
                 Tool write_file not called"
            )
        );
    }

    #[test]
    fn test_parameters_checked_on_every_call() {
        let mut behavior = ExpectedBehavior::default();
        behavior.required_parameters.insert(
            "read_file".into(),
            [("file_path".to_string(), json!("a.py"))].into_iter().collect(),
        );
        let check = check_parameters(
            &scenario(behavior),
            &log(&[
                ("read_file", json!({"file_path": "a.py"})),
                ("read_file", json!({"file_path": "b.py"})),
            ]),
        );
        assert_eq!(check.details.as_deref(), Some("read_file.file_path: expected a.py, got b.py"));
    }

    #[test]
    fn test_parameters_pass_without_declarations() {
        let check = check_parameters(&scenario(ExpectedBehavior::default()), &log(&[]));
        assert!(check.passed());
        assert!(check.details.is_none());
    }

    #[test]
    fn test_sequence_absent_when_order_irrelevant() {
        assert!(check_sequence(&scenario(ExpectedBehavior::default()), &log(&[])).is_none());
    }

    #[test]
    fn test_sequence_compares_prefix() {
        let s = scenario(ExpectedBehavior {
            sequence_matters: true,
            expected_sequence: tools(&["read_file", "edit_file"]),
            ..ExpectedBehavior::default()
        });

        let in_order = log(&[
            ("read_file", json!({})),
            ("edit_file", json!({})),
            ("run_terminal_command", json!({})),
        ]);
        assert!(check_sequence(&s, &in_order).unwrap().passed());

        let reversed = log(&[("edit_file", json!({})), ("read_file", json!({}))]);
        assert!(check_sequence(&s, &reversed).unwrap().failed());

        let short = log(&[("read_file", json!({}))]);
        assert!(check_sequence(&s, &short).unwrap().failed());
    }

    #[test]
    fn test_call_count_bounds() {
        let bounded = |min: Option<u32>, max: Option<u32>| {
            scenario(ExpectedBehavior {
                min_tool_calls: min,
                max_tool_calls: max,
                ..ExpectedBehavior::default()
            })
        };
        let two_calls = log(&[("read_file", json!({})), ("read_file", json!({}))]);

        assert!(check_call_count(&bounded(None, None), &two_calls).is_none());
        assert!(check_call_count(&bounded(Some(1), Some(3)), &two_calls).unwrap().passed());

        let too_many = check_call_count(&bounded(None, Some(1)), &two_calls).unwrap();
        assert!(too_many.failed());
        assert_eq!(too_many.details.as_deref(), Some("Too many calls: 2 > 1"));

        let too_few = check_call_count(&bounded(Some(3), None), &two_calls).unwrap();
        assert_eq!(too_few.details.as_deref(), Some("Too few calls: 2 < 3"));
    }
}
