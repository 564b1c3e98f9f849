//! Scenario parsing, schema checks and authoring rules.
//!
//! A scenario declares the prompt a model receives and the tool-usage
//! contract it is judged against. Scenarios are plain serde data stored as
//! YAML or JSON.

mod linter;
mod loader;
mod parser;
mod schema;

pub use linter::{ScenarioIssue, ScenarioLinter};
pub use loader::{scenario_files, ScenarioSet};
pub use parser::{
    Difficulty, ExpectedBehavior, HallucinationTraps, Prompt, Scenario, ScenarioCategory,
    ScenarioError,
};
pub use schema::{validate_scenario_schema, validate_scenario_text, SchemaError};
