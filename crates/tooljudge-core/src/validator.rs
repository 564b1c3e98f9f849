//! Validation engine: reconciles a scenario, an action log and a claim log.
//!
//! The engine applies a strict priority cascade when deciding the overall
//! status:
//! 1. Any critical issue or a forbidden tool call → FAIL
//! 2. Else any high issue or a missing required tool → PARTIAL
//! 3. Else → PASS
//!
//! Forbidden tool use is an unconditional failure regardless of anything
//! else in the report.

use chrono::{DateTime, Utc};

use crate::actions::ActionLog;
use crate::checks::{
    check_call_count, check_forbidden_tools, check_parameters, check_required_tools,
    check_sequence,
};
use crate::claims::ClaimLog;
use crate::detectors::{Detector, HallucinationDetector, MismatchDetector, SilentActionDetector};
use crate::scenario::Scenario;
use crate::types::{
    ConsistencyIssue, IssueCounts, IssueSeverity, ValidationReport, ValidationStatus,
};

/// Produces a [`ValidationReport`] from one model response.
///
/// Validation never fails. Empty logs and absent optional fields are
/// valid, degenerate inputs. The engine does not check that the logs
/// belong to the scenario; matching them up is the caller's job.
pub struct ValidationEngine {
    hallucinations: HallucinationDetector,
    silent_actions: SilentActionDetector,
    mismatches: MismatchDetector,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self {
            hallucinations: HallucinationDetector::new(),
            silent_actions: SilentActionDetector::new(),
            mismatches: MismatchDetector::new(),
        }
    }

    /// The detectors in the order their findings appear in a report.
    pub fn detectors(&self) -> [&dyn Detector; 3] {
        [&self.hallucinations, &self.silent_actions, &self.mismatches]
    }

    /// Validate, stamping the report with the current time.
    pub fn validate(
        &self,
        scenario: &Scenario,
        actions: &ActionLog,
        claims: &ClaimLog,
    ) -> ValidationReport {
        self.validate_at(scenario, actions, claims, Utc::now())
    }

    /// Validate with an explicit timestamp. Identical inputs give identical reports.
    pub fn validate_at(
        &self,
        scenario: &Scenario,
        actions: &ActionLog,
        claims: &ClaimLog,
        timestamp: DateTime<Utc>,
    ) -> ValidationReport {
        let required_tools_check = check_required_tools(scenario, actions);
        let forbidden_tools_check = check_forbidden_tools(scenario, actions);
        let parameters_check = check_parameters(scenario, actions);
        let sequence_check = check_sequence(scenario, actions);
        let call_count_check = check_call_count(scenario, actions);

        let hallucinations = run_detector(&self.hallucinations, actions, claims);
        let silent_actions = run_detector(&self.silent_actions, actions, claims);
        let mismatches = run_detector(&self.mismatches, actions, claims);

        let mut issue_counts = IssueCounts::from_issues(
            hallucinations
                .iter()
                .chain(silent_actions.iter())
                .chain(mismatches.iter()),
        );
        // Check failures are counted on top of the detected issues.
        if forbidden_tools_check.failed() {
            issue_counts.add(IssueSeverity::Critical);
        }
        if required_tools_check.failed() {
            issue_counts.add(IssueSeverity::High);
        }

        let status = if issue_counts.critical > 0 || forbidden_tools_check.failed() {
            ValidationStatus::Fail
        } else if issue_counts.high > 0 || required_tools_check.failed() {
            ValidationStatus::Partial
        } else {
            ValidationStatus::Pass
        };

        tracing::info!(
            scenario = %scenario.id,
            status = %status,
            critical = issue_counts.critical,
            high = issue_counts.high,
            medium = issue_counts.medium,
            "Validation complete"
        );

        ValidationReport {
            scenario_id: scenario.id.clone(),
            timestamp,
            status,
            required_tools_check,
            forbidden_tools_check,
            parameters_check,
            sequence_check,
            call_count_check,
            hallucinations,
            silent_actions,
            mismatches,
            issue_counts,
        }
    }
}

fn run_detector(
    detector: &dyn Detector,
    actions: &ActionLog,
    claims: &ClaimLog,
) -> Vec<ConsistencyIssue> {
    let issues = detector.detect(actions, claims);
    tracing::debug!(
        issue_type = %detector.issue_type(),
        question = detector.question(),
        found = issues.len(),
        "Detector finished"
    );
    issues
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::claims::{Claim, ClaimType};
    use crate::scenario::{ExpectedBehavior, ScenarioCategory};
    use crate::types::IssueType;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn scenario(behavior: ExpectedBehavior) -> Scenario {
        Scenario::new(
            "val-001",
            "Validation",
            ScenarioCategory::FileOps,
            "Read the config file",
            behavior,
        )
    }

    fn actions(calls: &[(&str, Value)]) -> ActionLog {
        let actions = calls
            .iter()
            .zip(1u32..)
            .map(|((name, args), seq)| {
                Action::new(seq, *name, args.as_object().cloned().unwrap_or_default())
            })
            .collect();
        ActionLog::new(Some("val-001".into()), actions)
    }

    fn claim(tool: &str) -> Claim {
        Claim::new(format!("I'll use {tool}"), ClaimType::Explicit)
            .with_verb("use")
            .with_tool(tool)
    }

    fn tools(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_run_passes() {
        let s = scenario(ExpectedBehavior {
            required_tools: tools(&["read_file"]),
            ..ExpectedBehavior::default()
        });
        let report = ValidationEngine::new().validate(
            &s,
            &actions(&[("read_file", json!({"file_path": "config.yaml"}))]),
            &ClaimLog::new(None, vec![claim("read_file")]),
        );

        assert_eq!(report.status, ValidationStatus::Pass);
        assert_eq!(report.issue_counts, IssueCounts::default());
        assert!(report.sequence_check.is_none());
        assert!(report.call_count_check.is_none());
        assert_eq!(report.scenario_id, "val-001");
    }

    #[test]
    fn test_missing_required_tool_is_partial() {
        let s = scenario(ExpectedBehavior {
            required_tools: tools(&["read_file"]),
            ..ExpectedBehavior::default()
        });
        let report = ValidationEngine::new().validate(&s, &actions(&[]), &ClaimLog::default());

        assert_eq!(report.status, ValidationStatus::Partial);
        assert_eq!(report.required_tools_check.missing, vec!["read_file"]);
        assert_eq!(report.issue_counts.high, 1);
        assert_eq!(report.issue_counts.total, 1);
    }

    #[test]
    fn test_forbidden_tool_overrides_everything() {
        let s = scenario(ExpectedBehavior {
            required_tools: tools(&["run_terminal_command"]),
            forbidden_tools: tools(&["run_terminal_command"]),
            ..ExpectedBehavior::default()
        });
        let report = ValidationEngine::new().validate(
            &s,
            &actions(&[("run_terminal_command", json!({"command": "ls"}))]),
            &ClaimLog::new(None, vec![claim("run_terminal_command")]),
        );

        assert_eq!(report.status, ValidationStatus::Fail);
        assert_eq!(report.issue_counts.critical, 1);
    }

    #[test]
    fn test_hallucination_makes_partial() {
        let report = ValidationEngine::new().validate(
            &scenario(ExpectedBehavior::default()),
            &actions(&[]),
            &ClaimLog::new(None, vec![claim("edit_file")]),
        );

        assert_eq!(report.status, ValidationStatus::Partial);
        assert_eq!(report.hallucinations.len(), 1);
        assert_eq!(report.hallucinations[0].kind, IssueType::ClaimWithoutAction);
    }

    #[test]
    fn test_silent_action_alone_still_passes() {
        let report = ValidationEngine::new().validate(
            &scenario(ExpectedBehavior::default()),
            &actions(&[("list_directory", json!({"directory_path": "."}))]),
            &ClaimLog::default(),
        );

        assert_eq!(report.status, ValidationStatus::Pass);
        assert_eq!(report.silent_actions.len(), 1);
        assert_eq!(report.issue_counts.medium, 1);
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn test_failed_parameters_do_not_change_status() {
        let mut behavior = ExpectedBehavior {
            required_tools: tools(&["read_file"]),
            ..ExpectedBehavior::default()
        };
        behavior.required_parameters.insert(
            "read_file".into(),
            [("file_path".to_string(), json!("config.yaml"))].into_iter().collect(),
        );
        let report = ValidationEngine::new().validate(
            &scenario(behavior),
            &actions(&[("read_file", json!({"file_path": "other.yaml"}))]),
            &ClaimLog::new(None, vec![claim("read_file")]),
        );

        assert!(report.parameters_check.failed());
        assert_eq!(report.status, ValidationStatus::Pass);
    }

    #[test]
    fn test_validate_at_is_deterministic() {
        let s = scenario(ExpectedBehavior {
            required_tools: tools(&["read_file", "edit_file"]),
            sequence_matters: true,
            expected_sequence: tools(&["read_file", "edit_file"]),
            max_tool_calls: Some(3),
            ..ExpectedBehavior::default()
        });
        let log = actions(&[("read_file", json!({})), ("search_code", json!({"query": "x"}))]);
        let claims = ClaimLog::new(None, vec![claim("edit_file")]);
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let engine = ValidationEngine::new();
        let first = serde_json::to_string(&engine.validate_at(&s, &log, &claims, at)).unwrap();
        let second = serde_json::to_string(&engine.validate_at(&s, &log, &claims, at)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_detectors_cover_distinct_issue_types() {
        let engine = ValidationEngine::new();
        let detectors = engine.detectors();

        let types: Vec<IssueType> = detectors.iter().map(|d| d.issue_type()).collect();
        assert_eq!(
            types,
            vec![
                IssueType::ClaimWithoutAction,
                IssueType::ActionWithoutClaim,
                IssueType::ClaimActionMismatch,
            ]
        );

        let questions: std::collections::BTreeSet<&str> =
            detectors.iter().map(|d| d.question()).collect();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.ends_with('?')));
    }
}
