//! Claim logs: what a model said it would do.
//!
//! Claims come from the model's prose. Each one may be mapped to the tool
//! the statement implies, and is classified by how committed it sounds.

mod extractor;
mod patterns;

pub use extractor::ClaimExtractor;
pub use patterns::{tool_for_verb, VERB_TO_TOOL};

use serde::{Deserialize, Serialize};

/// How firmly a statement commits to an action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// "I'll read config.yaml"
    #[default]
    Explicit,
    /// "Looking at the config, ..."
    Implicit,
    /// "If needed, I could edit the file"
    Conditional,
    Vague,
}

/// One natural-language statement about an intended or performed action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claim {
    pub claim_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_verb: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_object: Option<String>,

    /// Tool the statement implies, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_tool: Option<String>,

    /// In [0, 1]
    #[serde(default)]
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,

    #[serde(default)]
    pub claim_type: ClaimType,
}

impl Claim {
    pub fn new(claim_text: impl Into<String>, claim_type: ClaimType) -> Self {
        Self {
            claim_text: claim_text.into(),
            action_verb: None,
            target_object: None,
            inferred_tool: None,
            confidence: 0.0,
            line_number: None,
            claim_type,
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.inferred_tool = Some(tool.into());
        self
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.action_verb = Some(verb.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_object = Some(target.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// Claims extracted from one model response, partitioned by type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "ClaimLogRecord")]
pub struct ClaimLog {
    scenario_id: Option<String>,
    total_claims: usize,
    claims: Vec<Claim>,
    explicit_claims: Vec<Claim>,
    implicit_claims: Vec<Claim>,
    vague_statements: Vec<Claim>,
}

#[derive(Deserialize)]
struct ClaimLogRecord {
    #[serde(default)]
    scenario_id: Option<String>,
    #[serde(default)]
    claims: Vec<Claim>,
}

impl From<ClaimLogRecord> for ClaimLog {
    fn from(record: ClaimLogRecord) -> Self {
        ClaimLog::new(record.scenario_id, record.claims)
    }
}

impl ClaimLog {
    pub fn new(scenario_id: Option<String>, claims: Vec<Claim>) -> Self {
        let of_type = |kind: ClaimType| -> Vec<Claim> {
            claims
                .iter()
                .filter(|c| c.claim_type == kind)
                .cloned()
                .collect()
        };

        Self {
            scenario_id,
            total_claims: claims.len(),
            explicit_claims: of_type(ClaimType::Explicit),
            implicit_claims: of_type(ClaimType::Implicit),
            vague_statements: of_type(ClaimType::Vague),
            claims,
        }
    }

    pub fn scenario_id(&self) -> Option<&str> {
        self.scenario_id.as_deref()
    }

    pub fn total_claims(&self) -> usize {
        self.total_claims
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn explicit_claims(&self) -> &[Claim] {
        &self.explicit_claims
    }

    pub fn implicit_claims(&self) -> &[Claim] {
        &self.implicit_claims
    }

    pub fn vague_statements(&self) -> &[Claim] {
        &self.vague_statements
    }

    /// Conditional claims are not partitioned on the wire; they are filtered on demand.
    pub fn conditional_claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims
            .iter()
            .filter(|c| c.claim_type == ClaimType::Conditional)
    }

    pub fn claims_for_tool<'a>(&'a self, tool: &'a str) -> impl Iterator<Item = &'a Claim> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.inferred_tool.as_deref() == Some(tool))
    }

    pub fn high_confidence(&self, threshold: f64) -> impl Iterator<Item = &Claim> {
        self.claims.iter().filter(move |c| c.confidence >= threshold)
    }
}
