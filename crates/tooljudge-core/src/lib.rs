//! # tooljudge-core
//!
//! Deterministic judging of LLM tool use.
//!
//! Given a test scenario, the tool calls a model made and the claims it made
//! in prose, this crate answers:
//! - Did the model call the right tools, with the right arguments, in order?
//! - Did it stay away from forbidden tools?
//! - Did it do what it said, and say what it did?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No LLM calls**: All judging is rule-based
//! 3. **Total**: Validation and scoring never fail on well-formed input
//! 4. **Forbidden means fail**: A forbidden tool call fails the run outright
//!
//! ## Example
//!
//! ```rust,ignore
//! use tooljudge_core::{evaluate, ActionLog, ClaimExtractor, Scenario};
//!
//! let scenario = Scenario::from_file("scenarios/file_read_001.yaml")?;
//! let actions = ActionLog::from_calls(Some(scenario.id.clone()), calls);
//! let claims = ClaimExtractor::new().extract(Some(scenario.id.clone()), &sentences);
//!
//! let evaluation = evaluate(&scenario, &actions, &claims);
//! println!("{} ({})", evaluation.score.total, evaluation.score.grade);
//! ```

pub mod actions;
pub mod checks;
pub mod claims;
pub mod detectors;
pub mod record;
pub mod scenario;
pub mod scoring;
pub mod tools;
pub mod types;
pub mod validator;

// Re-export main types at crate root
pub use actions::{Action, ActionLog, ActionSummary, FunctionCall};
pub use claims::{Claim, ClaimExtractor, ClaimLog, ClaimType};
pub use detectors::{Detector, HallucinationDetector, MismatchDetector, SilentActionDetector};
pub use record::EvaluationRecord;
pub use scenario::{
    validate_scenario_schema, validate_scenario_text, Difficulty, ExpectedBehavior, Scenario,
    ScenarioCategory, ScenarioError, ScenarioIssue, ScenarioLinter, ScenarioSet,
};
pub use scoring::{Criterion, LetterGrade, Score, Scorer, Subscore, CRITERIA};
pub use tools::{standard_tools, Parameter, ParameterKind, Tool, ToolError, ToolRegistry};
pub use types::{
    ConsistencyIssue, IssueCounts, IssueSeverity, IssueType, RequirementCheck, ValidationReport,
    ValidationStatus,
};
pub use validator::ValidationEngine;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while gathering evaluation inputs
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log in {path}: {source}")]
    InvalidLog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Validation report and score for one model response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub report: ValidationReport,
    pub score: Score,
}

/// Validate and score a model response against a scenario.
///
/// This is the main entry point. The caller is responsible for pairing the
/// logs with the right scenario; ids are not cross-checked.
pub fn evaluate(scenario: &Scenario, actions: &ActionLog, claims: &ClaimLog) -> Evaluation {
    evaluate_at(scenario, actions, claims, Utc::now())
}

/// Like [`evaluate`], with the report timestamp supplied by the caller.
pub fn evaluate_at(
    scenario: &Scenario,
    actions: &ActionLog,
    claims: &ClaimLog,
    timestamp: DateTime<Utc>,
) -> Evaluation {
    let report = ValidationEngine::new().validate_at(scenario, actions, claims, timestamp);
    let score = Scorer::new().calculate_score(&report, actions, scenario);
    Evaluation { report, score }
}

/// Everything an evaluation needs, loaded from disk.
#[derive(Debug, Clone)]
pub struct EvaluationInput {
    pub scenario: Scenario,
    pub actions: ActionLog,
    pub claims: ClaimLog,
}

impl EvaluationInput {
    /// Load a scenario file (YAML or JSON) and JSON action and claim logs.
    pub fn from_files(
        scenario: impl AsRef<Path>,
        actions: impl AsRef<Path>,
        claims: impl AsRef<Path>,
    ) -> Result<Self, EvaluationError> {
        Ok(Self {
            scenario: Scenario::from_file(scenario)?,
            actions: read_json(actions.as_ref())?,
            claims: read_json(claims.as_ref())?,
        })
    }

    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.scenario, &self.actions, &self.claims)
    }

    pub fn record(&self, evaluation: &Evaluation) -> EvaluationRecord {
        EvaluationRecord::new(&self.scenario, &self.actions, &self.claims, evaluation)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, EvaluationError> {
    let text = std::fs::read_to_string(path).map_err(|source| EvaluationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| EvaluationError::InvalidLog {
        path: path.to_path_buf(),
        source,
    })
}
