use std::fmt;

use serde::{Deserialize, Serialize};

/// A scoring criterion. Declaration order is report order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    ToolSelection,
    Parameters,
    Sequence,
    Consistency,
    Compliance,
    Efficiency,
}

/// Static description of a criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionInfo {
    pub criterion: Criterion,
    pub label: &'static str,
    pub weight: f64,
    pub description: &'static str,
}

/// All criteria in report order. Weights sum to 10.
pub const CRITERIA: [CriterionInfo; 6] = [
    CriterionInfo {
        criterion: Criterion::ToolSelection,
        label: "Tool Selection Accuracy",
        weight: 2.5,
        description: "Calls correct tools for the task",
    },
    CriterionInfo {
        criterion: Criterion::Parameters,
        label: "Parameter Correctness",
        weight: 1.5,
        description: "Function parameters are accurate and complete",
    },
    CriterionInfo {
        criterion: Criterion::Sequence,
        label: "Execution Sequence",
        weight: 1.5,
        description: "Tools called in logical, efficient order",
    },
    CriterionInfo {
        criterion: Criterion::Consistency,
        label: "Claim-Action Consistency",
        weight: 2.5,
        description: "Stated intentions match actual actions",
    },
    CriterionInfo {
        criterion: Criterion::Compliance,
        label: "Compliance",
        weight: 1.0,
        description: "Follows constraints (no forbidden tools)",
    },
    CriterionInfo {
        criterion: Criterion::Efficiency,
        label: "Efficiency",
        weight: 1.0,
        description: "Completes task with minimal tool calls",
    },
];

impl Criterion {
    pub fn info(&self) -> &'static CriterionInfo {
        match self {
            Criterion::ToolSelection => &CRITERIA[0],
            Criterion::Parameters => &CRITERIA[1],
            Criterion::Sequence => &CRITERIA[2],
            Criterion::Consistency => &CRITERIA[3],
            Criterion::Compliance => &CRITERIA[4],
            Criterion::Efficiency => &CRITERIA[5],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::ToolSelection => "tool_selection",
            Criterion::Parameters => "parameters",
            Criterion::Sequence => "sequence",
            Criterion::Consistency => "consistency",
            Criterion::Compliance => "compliance",
            Criterion::Efficiency => "efficiency",
        }
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn weight(&self) -> f64 {
        self.info().weight
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_ten() {
        let sum: f64 = CRITERIA.iter().map(|c| c.weight).sum();
        assert!((sum - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_table_matches_declaration_order() {
        for pair in CRITERIA.windows(2) {
            assert!(pair[0].criterion < pair[1].criterion);
        }
        for info in &CRITERIA {
            assert_eq!(info.criterion.info(), info);
        }
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&Criterion::ToolSelection).unwrap();
        assert_eq!(json, "\"tool_selection\"");
        assert_eq!(Criterion::Efficiency.to_string(), "efficiency");
    }
}
