//! Core types for validation reports.
//!
//! A [`ValidationReport`] is the single output of the validation engine. It
//! bundles the structural [`RequirementCheck`]s and the claim/action
//! [`ConsistencyIssue`]s together with aggregate severity counts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single check or of a whole validation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pass,
    Fail,
    Partial,
}

impl ValidationStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationStatus::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, ValidationStatus::Fail)
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, ValidationStatus::Partial)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "pass",
            ValidationStatus::Fail => "fail",
            ValidationStatus::Partial => "partial",
        }
    }

    /// Status for a check that passes exactly when `ok` holds.
    pub(crate) fn from_ok(ok: bool) -> Self {
        if ok {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Fail
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a consistency issue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Critical => "critical",
            IssueSeverity::High => "high",
            IssueSeverity::Medium => "medium",
            IssueSeverity::Low => "low",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of discrepancy recorded by a [`ConsistencyIssue`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingRequiredTool,
    ForbiddenToolUsed,
    WrongParameter,
    WrongSequence,
    /// The model said it would do something it never did.
    ClaimWithoutAction,
    /// The model did something it never mentioned.
    ActionWithoutClaim,
    /// A claim and an action both exist but disagree (e.g. different targets).
    ClaimActionMismatch,
    TooFewCalls,
    TooManyCalls,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MissingRequiredTool => "missing_required_tool",
            IssueType::ForbiddenToolUsed => "forbidden_tool_used",
            IssueType::WrongParameter => "wrong_parameter",
            IssueType::WrongSequence => "wrong_sequence",
            IssueType::ClaimWithoutAction => "claim_without_action",
            IssueType::ActionWithoutClaim => "action_without_claim",
            IssueType::ClaimActionMismatch => "claim_action_mismatch",
            IssueType::TooFewCalls => "too_few_calls",
            IssueType::TooManyCalls => "too_many_calls",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one structural comparison between expected and actual tool usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementCheck {
    /// Human-readable check name (e.g. "Required Tools")
    pub name: String,

    pub status: ValidationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    /// Expected items that were not observed
    #[serde(default)]
    pub missing: Vec<String>,

    /// Observed items that should not have been
    #[serde(default)]
    pub extra: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RequirementCheck {
    pub(crate) fn new(name: impl Into<String>, status: ValidationStatus) -> Self {
        Self {
            name: name.into(),
            status,
            expected: None,
            actual: None,
            missing: Vec::new(),
            extra: Vec::new(),
            details: None,
        }
    }

    pub(crate) fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub(crate) fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub(crate) fn with_missing(mut self, missing: Vec<String>) -> Self {
        self.missing = missing;
        self
    }

    pub(crate) fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }

    pub(crate) fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn passed(&self) -> bool {
        self.status.is_pass()
    }

    pub fn failed(&self) -> bool {
        self.status.is_fail()
    }
}

/// One detected inconsistency between what a model claimed and what it did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsistencyIssue {
    #[serde(rename = "type")]
    pub kind: IssueType,

    pub severity: IssueSeverity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_tool: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_tool: Option<String>,

    /// Verbatim model text supporting the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,

    pub explanation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ConsistencyIssue {
    pub(crate) fn new(
        kind: IssueType,
        severity: IssueSeverity,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            claim: None,
            action: None,
            expected_tool: None,
            actual_tool: None,
            quote: None,
            explanation: explanation.into(),
            details: None,
        }
    }

    pub(crate) fn with_claim(mut self, claim: impl Into<String>) -> Self {
        self.claim = Some(claim.into());
        self
    }

    pub(crate) fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub(crate) fn with_expected_tool(mut self, tool: impl Into<String>) -> Self {
        self.expected_tool = Some(tool.into());
        self
    }

    pub(crate) fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }

    pub(crate) fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Aggregate issue counts by severity.
///
/// `total` always equals `critical + high + medium + low`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueCounts {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl IssueCounts {
    pub(crate) fn from_issues<'a>(issues: impl IntoIterator<Item = &'a ConsistencyIssue>) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            counts.add(issue.severity);
        }
        counts
    }

    pub(crate) fn add(&mut self, severity: IssueSeverity) {
        match severity {
            IssueSeverity::Critical => self.critical += 1,
            IssueSeverity::High => self.high += 1,
            IssueSeverity::Medium => self.medium += 1,
            IssueSeverity::Low => self.low += 1,
        }
        self.total += 1;
    }
}

/// The validation engine's output for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub scenario_id: String,

    pub timestamp: DateTime<Utc>,

    /// Overall verdict (`pass_fail_status`)
    #[serde(rename = "pass_fail_status")]
    pub status: ValidationStatus,

    pub required_tools_check: RequirementCheck,
    pub forbidden_tools_check: RequirementCheck,
    pub parameters_check: RequirementCheck,

    /// Present only when the scenario says order matters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_check: Option<RequirementCheck>,

    /// Present only when the scenario bounds the call count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_count_check: Option<RequirementCheck>,

    #[serde(default)]
    pub hallucinations: Vec<ConsistencyIssue>,

    #[serde(default)]
    pub silent_actions: Vec<ConsistencyIssue>,

    #[serde(default)]
    pub mismatches: Vec<ConsistencyIssue>,

    pub issue_counts: IssueCounts,
}

impl ValidationReport {
    /// All consistency issues: hallucinations, then silent actions, then mismatches.
    pub fn issues(&self) -> impl Iterator<Item = &ConsistencyIssue> {
        self.hallucinations
            .iter()
            .chain(self.silent_actions.iter())
            .chain(self.mismatches.iter())
    }

    /// Every check that ran, in report order.
    pub fn checks(&self) -> impl Iterator<Item = &RequirementCheck> {
        [
            Some(&self.required_tools_check),
            Some(&self.forbidden_tools_check),
            Some(&self.parameters_check),
            self.sequence_check.as_ref(),
            self.call_count_check.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn passed_checks(&self) -> usize {
        self.checks().filter(|c| c.passed()).count()
    }

    pub fn failed_checks(&self) -> usize {
        self.checks().filter(|c| c.failed()).count()
    }
}
