//! Hallucination detection: explicit claims with no matching tool call.
//!
//! Only explicit claims count. Implicit, conditional and vague statements
//! are too uncertain to penalize.

use crate::actions::ActionLog;
use crate::claims::ClaimLog;
use crate::types::{ConsistencyIssue, IssueSeverity, IssueType};

use super::Detector;

pub struct HallucinationDetector;

impl HallucinationDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HallucinationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for HallucinationDetector {
    fn issue_type(&self) -> IssueType {
        IssueType::ClaimWithoutAction
    }

    fn question(&self) -> &'static str {
        "Did the model do what it explicitly said it would?"
    }

    fn detect(&self, actions: &ActionLog, claims: &ClaimLog) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        for claim in claims.explicit_claims() {
            let Some(tool) = claim.inferred_tool.as_deref() else {
                continue;
            };

            if actions.actions_for(tool).next().is_some() {
                continue;
            }

            let verb = claim.action_verb.as_deref().unwrap_or("act");
            issues.push(
                ConsistencyIssue::new(
                    self.issue_type(),
                    IssueSeverity::High,
                    format!("LLM claimed to {verb} but never called {tool}"),
                )
                .with_claim(&claim.claim_text)
                .with_expected_tool(tool)
                .with_quote(&claim.claim_text),
            );
        }

        tracing::debug!(count = issues.len(), "Hallucination detection");
        issues
    }
}
