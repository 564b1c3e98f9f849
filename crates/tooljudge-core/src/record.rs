//! Machine-readable export of one evaluation.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionLog};
use crate::claims::{Claim, ClaimLog};
use crate::scenario::Scenario;
use crate::scoring::Score;
use crate::types::ValidationStatus;
use crate::Evaluation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordMetadata {
    pub scenario_id: String,
    pub scenario_name: String,

    /// Model that produced the response, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationSummary {
    pub status: ValidationStatus,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    pub passed_checks: usize,
    pub failed_checks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionsSummary {
    pub total_calls: usize,
    pub tools_used: Vec<String>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimsSummary {
    pub total_claims: usize,
    pub claims: Vec<Claim>,
}

/// Flat JSON record combining scenario metadata, score and logs.
///
/// The timestamp is taken from the validation report, so a record built from
/// a deterministic evaluation is itself deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    pub metadata: RecordMetadata,
    pub score: Score,
    pub validation: ValidationSummary,
    pub actions: ActionsSummary,
    pub claims: ClaimsSummary,
}

impl EvaluationRecord {
    pub fn new(
        scenario: &Scenario,
        actions: &ActionLog,
        claims: &ClaimLog,
        evaluation: &Evaluation,
    ) -> Self {
        let report = &evaluation.report;
        let counts = &report.issue_counts;

        Self {
            metadata: RecordMetadata {
                scenario_id: scenario.id.clone(),
                scenario_name: scenario.name.clone(),
                model: None,
                timestamp: report.timestamp,
            },
            score: evaluation.score.clone(),
            validation: ValidationSummary {
                status: report.status,
                total_issues: counts.total,
                critical_issues: counts.critical,
                high_issues: counts.high,
                medium_issues: counts.medium,
                low_issues: counts.low,
                passed_checks: report.passed_checks(),
                failed_checks: report.failed_checks(),
            },
            actions: ActionsSummary {
                total_calls: actions.total_calls(),
                tools_used: actions.summary().unique_tools_used.iter().cloned().collect(),
                actions: actions.actions().to_vec(),
            },
            claims: ClaimsSummary {
                total_claims: claims.total_claims(),
                claims: claims.claims().to_vec(),
            },
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.metadata.model = Some(model.into());
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json_pretty().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
