//! Claim extraction from pre-split sentences.
//!
//! Splitting a response into sentences is the caller's job; this module
//! only looks inside one sentence at a time.

use std::collections::HashSet;

use super::patterns::{
    normalize_verb, tool_for_verb, ACTION_PATTERNS, CONDITIONAL_MARKER, IMPLICIT_MARKER,
    INTENT_MARKER,
};
use super::{Claim, ClaimLog, ClaimType};

const BASE_CONFIDENCE: f64 = 0.5;
const KNOWN_VERB_BONUS: f64 = 0.2;
const TARGET_BONUS: f64 = 0.15;
const INTENT_BONUS: f64 = 0.15;

/// Turns model prose into [`Claim`]s.
pub struct ClaimExtractor;

impl ClaimExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract claims from already-segmented sentences and build a log.
    ///
    /// Line numbers are the 1-based sentence positions. Claims sharing
    /// (verb, target, tool) are kept once, first occurrence wins.
    pub fn extract<S: AsRef<str>>(&self, scenario_id: Option<String>, sentences: &[S]) -> ClaimLog {
        let mut seen = HashSet::new();
        let mut claims = Vec::new();

        for (index, sentence) in sentences.iter().enumerate() {
            for claim in self.extract_from_sentence(sentence.as_ref(), index + 1) {
                let key = (
                    claim.action_verb.clone(),
                    claim.target_object.clone(),
                    claim.inferred_tool.clone(),
                );
                if seen.insert(key) {
                    claims.push(claim);
                }
            }
        }

        tracing::debug!(
            sentences = sentences.len(),
            claims = claims.len(),
            "Extracted claims"
        );
        ClaimLog::new(scenario_id, claims)
    }

    /// Extract every action claim in a single sentence.
    pub fn extract_from_sentence(&self, sentence: &str, line_number: usize) -> Vec<Claim> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Vec::new();
        }

        let claim_type = classify(sentence);
        let has_intent = INTENT_MARKER.is_match(sentence);
        let mut claims = Vec::new();

        for pattern in ACTION_PATTERNS.iter() {
            for caps in pattern.captures_iter(sentence) {
                let (Some(verb), Some(target)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let verb = normalize_verb(verb.as_str());
                let target = target.as_str().trim().to_string();
                let tool = tool_for_verb(&verb);

                let mut confidence = BASE_CONFIDENCE;
                if tool.is_some() {
                    confidence += KNOWN_VERB_BONUS;
                }
                if target.chars().count() > 2 {
                    confidence += TARGET_BONUS;
                }
                if has_intent {
                    confidence += INTENT_BONUS;
                }

                let mut claim = Claim::new(sentence, claim_type)
                    .with_verb(verb)
                    .with_target(target)
                    .with_confidence(confidence);
                if let Some(tool) = tool {
                    claim = claim.with_tool(tool);
                }
                claim.line_number = Some(line_number);
                claims.push(claim);
            }
        }

        claims
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Hedged statements are conditional even when phrased as intent.
fn classify(sentence: &str) -> ClaimType {
    if CONDITIONAL_MARKER.is_match(sentence) {
        ClaimType::Conditional
    } else if IMPLICIT_MARKER.is_match(sentence) {
        ClaimType::Implicit
    } else if INTENT_MARKER.is_match(sentence) {
        ClaimType::Explicit
    } else {
        ClaimType::Vague
    }
}
