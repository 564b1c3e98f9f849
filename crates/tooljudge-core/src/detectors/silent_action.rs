//! Silent-action detection: tool calls the model never mentioned.
//!
//! Any claim type counts as a mention here, unlike hallucination detection.

use std::collections::BTreeSet;

use serde_json::json;

use crate::actions::ActionLog;
use crate::claims::ClaimLog;
use crate::types::{ConsistencyIssue, IssueSeverity, IssueType};

use super::Detector;

pub struct SilentActionDetector;

impl SilentActionDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SilentActionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SilentActionDetector {
    fn issue_type(&self) -> IssueType {
        IssueType::ActionWithoutClaim
    }

    fn question(&self) -> &'static str {
        "Did the model mention every tool it called?"
    }

    fn detect(&self, actions: &ActionLog, claims: &ClaimLog) -> Vec<ConsistencyIssue> {
        let claimed: BTreeSet<&str> = claims
            .claims()
            .iter()
            .filter_map(|c| c.inferred_tool.as_deref())
            .collect();

        let issues: Vec<ConsistencyIssue> = actions
            .actions()
            .iter()
            .filter(|a| !claimed.contains(a.function_name.as_str()))
            .map(|a| {
                ConsistencyIssue::new(
                    self.issue_type(),
                    IssueSeverity::Medium,
                    format!("LLM called {} without mentioning it", a.function_name),
                )
                .with_action(&a.function_name)
                .with_details(json!({ "arguments": a.arguments }))
            })
            .collect();

        tracing::debug!(count = issues.len(), "Silent action detection");
        issues
    }
}
