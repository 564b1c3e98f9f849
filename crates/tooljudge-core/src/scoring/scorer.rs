//! Per-criterion scoring rules and grade assignment.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::criteria::{Criterion, CRITERIA};
use crate::actions::ActionLog;
use crate::scenario::Scenario;
use crate::types::ValidationReport;

const MAX_SCORE: f64 = 10.0;

/// Raw scores below this are called out in the overall explanation.
const EXPLAIN_BELOW: f64 = 7.0;

const MISSING_TOOL_PENALTY: f64 = 3.0;
const PARAMETER_ERROR_PENALTY: f64 = 3.0;
const WRONG_SEQUENCE_SCORE: f64 = 5.0;
const HALLUCINATION_PENALTY: f64 = 4.0;
const SILENT_ACTION_PENALTY: f64 = 2.0;
const MINOR_INEFFICIENCY_SCORE: f64 = 7.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Inclusive lower bounds: 9 → A+, 8 → A, 7 → B, 6 → C, 5 → D.
    pub fn from_total(total: f64) -> Self {
        if total >= 9.0 {
            LetterGrade::APlus
        } else if total >= 8.0 {
            LetterGrade::A
        } else if total >= 7.0 {
            LetterGrade::B
        } else if total >= 6.0 {
            LetterGrade::C
        } else if total >= 5.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One criterion's contribution to the total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscore {
    /// Human-readable criterion label
    pub criterion: String,
    /// Raw score in [0, 10]
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    /// `score / 10 * weight`
    pub weighted_score: f64,
    pub explanation: String,
}

impl Subscore {
    fn new(criterion: Criterion, score: f64, explanation: impl Into<String>) -> Self {
        let score = score.max(0.0);
        let weight = criterion.weight();
        Self {
            criterion: criterion.label().to_string(),
            score,
            max_score: MAX_SCORE,
            weight,
            weighted_score: score / MAX_SCORE * weight,
            explanation: explanation.into(),
        }
    }
}

/// The scorer's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Score {
    /// Sum of weighted subscores, two decimals
    pub total: f64,
    pub max_total: f64,
    /// One entry per criterion, in criteria order
    pub subscores: BTreeMap<Criterion, Subscore>,
    pub grade: LetterGrade,
    /// `total * 10`, two decimals
    pub percentile: f64,
    pub explanation: String,
}

impl Score {
    pub fn subscore(&self, criterion: Criterion) -> Option<&Subscore> {
        self.subscores.get(&criterion)
    }
}

/// Turns a validation report into a weighted [`Score`].
pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a report. Pure and total: identical inputs give identical scores.
    pub fn calculate_score(
        &self,
        report: &ValidationReport,
        actions: &ActionLog,
        scenario: &Scenario,
    ) -> Score {
        let subscores: BTreeMap<Criterion, Subscore> = CRITERIA
            .iter()
            .map(|info| {
                let subscore = match info.criterion {
                    Criterion::ToolSelection => score_tool_selection(report),
                    Criterion::Parameters => score_parameters(report),
                    Criterion::Sequence => score_sequence(report, scenario),
                    Criterion::Consistency => score_consistency(report),
                    Criterion::Compliance => score_compliance(report),
                    Criterion::Efficiency => score_efficiency(actions, scenario),
                };
                (info.criterion, subscore)
            })
            .collect();

        let raw_total: f64 = subscores.values().map(|s| s.weighted_score).sum();
        let total = round2(raw_total);
        // Graded before rounding: 8.9975 is an A even though it displays as 9.
        let grade = LetterGrade::from_total(raw_total);
        let explanation = explain(&subscores);

        tracing::info!(
            scenario = %scenario.id,
            total,
            grade = %grade,
            "Score calculated"
        );

        Score {
            total,
            max_total: MAX_SCORE,
            subscores,
            grade,
            percentile: round2(raw_total * 10.0),
            explanation,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

/// A forbidden tool zeroes the score outright; missing tools cost 3 each.
fn score_tool_selection(report: &ValidationReport) -> Subscore {
    let missing = report.required_tools_check.missing.len();
    let violations = report.forbidden_tools_check.extra.len();

    let mut score = MAX_SCORE - missing as f64 * MISSING_TOOL_PENALTY;
    let mut notes = Vec::new();
    if missing > 0 {
        notes.push(format!("Missing {missing} required tool(s)"));
    }
    if violations > 0 {
        score = 0.0;
        notes.push(format!("Used {violations} forbidden tool(s)"));
    }

    let explanation = if notes.is_empty() {
        "All required tools called correctly".to_string()
    } else {
        notes.join("; ")
    };
    Subscore::new(Criterion::ToolSelection, score, explanation)
}

fn score_parameters(report: &ValidationReport) -> Subscore {
    let check = &report.parameters_check;
    match check.details.as_deref() {
        Some(details) if !check.passed() && !details.is_empty() => {
            let errors = details.split(';').count();
            Subscore::new(
                Criterion::Parameters,
                MAX_SCORE - errors as f64 * PARAMETER_ERROR_PENALTY,
                format!("{errors} parameter error(s)"),
            )
        }
        _ => Subscore::new(Criterion::Parameters, MAX_SCORE, "All parameters correct"),
    }
}

/// Flat penalty, not proportional to how far off the order is.
fn score_sequence(report: &ValidationReport, scenario: &Scenario) -> Subscore {
    let wrong = scenario.expected_behavior.sequence_matters
        && report
            .sequence_check
            .as_ref()
            .is_some_and(|check| !check.passed());

    if wrong {
        Subscore::new(Criterion::Sequence, WRONG_SEQUENCE_SCORE, "Incorrect sequence")
    } else {
        Subscore::new(Criterion::Sequence, MAX_SCORE, "Correct sequence")
    }
}

fn score_consistency(report: &ValidationReport) -> Subscore {
    let hallucinations = report.hallucinations.len();
    let silent = report.silent_actions.len();

    let score = MAX_SCORE
        - hallucinations as f64 * HALLUCINATION_PENALTY
        - silent as f64 * SILENT_ACTION_PENALTY;

    let mut notes = Vec::new();
    if hallucinations > 0 {
        notes.push(format!("{hallucinations} hallucination(s)"));
    }
    if silent > 0 {
        notes.push(format!("{silent} silent action(s)"));
    }

    let explanation = if notes.is_empty() {
        "Perfect consistency".to_string()
    } else {
        notes.join("; ")
    };
    Subscore::new(Criterion::Consistency, score, explanation)
}

fn score_compliance(report: &ValidationReport) -> Subscore {
    match report.forbidden_tools_check.extra.len() {
        0 => Subscore::new(Criterion::Compliance, MAX_SCORE, "Full compliance"),
        violations => Subscore::new(
            Criterion::Compliance,
            0.0,
            format!("Used {violations} forbidden tool(s)"),
        ),
    }
}

/// Calls per required tool: at most 1x is optimal, up to 1.5x is minor,
/// beyond that the score decays linearly.
fn score_efficiency(actions: &ActionLog, scenario: &Scenario) -> Subscore {
    let expected = scenario.expected_behavior.required_tools.len().max(1);
    let ratio = actions.total_calls() as f64 / expected as f64;

    if ratio <= 1.0 {
        Subscore::new(Criterion::Efficiency, MAX_SCORE, "Optimal efficiency")
    } else if ratio <= 1.5 {
        Subscore::new(Criterion::Efficiency, MINOR_INEFFICIENCY_SCORE, "Minor inefficiency")
    } else {
        Subscore::new(
            Criterion::Efficiency,
            MAX_SCORE - (ratio - 1.0) * MAX_SCORE,
            format!("Inefficient ({ratio:.1}x expected calls)"),
        )
    }
}

fn explain(subscores: &BTreeMap<Criterion, Subscore>) -> String {
    let parts: Vec<String> = subscores
        .values()
        .filter(|s| s.score < EXPLAIN_BELOW)
        .map(|s| format!("{}: {}", s.criterion, s.explanation))
        .collect();

    if parts.is_empty() {
        "Excellent performance across all criteria".to_string()
    } else {
        parts.join("; ")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
