//! Claim/action consistency detectors.
//!
//! Each detector answers one question about the relationship between what a
//! model said and what it did:
//!
//! | Detector | Question | Issue |
//! |----------|----------|-------|
//! | [`HallucinationDetector`] | Did it do what it explicitly said it would? | `claim_without_action` (high) |
//! | [`SilentActionDetector`] | Did it mention everything it did? | `action_without_claim` (medium) |
//! | [`MismatchDetector`] | Did the action match the claim's details? | `claim_action_mismatch` |
//!
//! Detectors are independent and read-only over their inputs.

mod hallucination;
mod mismatch;
mod silent_action;

pub use hallucination::HallucinationDetector;
pub use mismatch::MismatchDetector;
pub use silent_action::SilentActionDetector;

use crate::actions::ActionLog;
use crate::claims::ClaimLog;
use crate::types::{ConsistencyIssue, IssueType};

/// A single consistency check between a claim log and an action log.
pub trait Detector {
    /// The issue type this detector emits.
    fn issue_type(&self) -> IssueType;

    /// The question this detector answers.
    fn question(&self) -> &'static str;

    /// Return every issue found, in input order.
    fn detect(&self, actions: &ActionLog, claims: &ClaimLog) -> Vec<ConsistencyIssue>;
}
