//! Mismatch detection: a claim and an action exist but disagree.
//!
//! This is an extension point. The issue type and severity taxonomy are
//! defined, but no matching heuristic is implemented yet, so this detector
//! never reports anything. Comparing a claim's target object against action
//! arguments is the obvious candidate, but it needs a tolerant matcher for
//! paths and quoting before it can be trusted to penalize.

use crate::actions::ActionLog;
use crate::claims::ClaimLog;
use crate::types::{ConsistencyIssue, IssueType};

use super::Detector;

pub struct MismatchDetector;

impl MismatchDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MismatchDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for MismatchDetector {
    fn issue_type(&self) -> IssueType {
        IssueType::ClaimActionMismatch
    }

    fn question(&self) -> &'static str {
        "Did each action match the details of its claim?"
    }

    fn detect(&self, _actions: &ActionLog, _claims: &ClaimLog) -> Vec<ConsistencyIssue> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::claims::{Claim, ClaimType};

    #[test]
    fn test_reports_nothing() {
        let actions = ActionLog::new(None, vec![Action::new(1, "read_file", Default::default())]);
        let claims = ClaimLog::new(
            None,
            vec![Claim::new("I'll read b.py", ClaimType::Explicit)
                .with_target("b.py")
                .with_tool("read_file")],
        );
        let detector = MismatchDetector::new();
        assert_eq!(detector.issue_type(), IssueType::ClaimActionMismatch);
        assert!(detector.detect(&actions, &claims).is_empty());
    }
}
