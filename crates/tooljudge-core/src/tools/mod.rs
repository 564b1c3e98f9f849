//! Tool catalog: the functions a model under evaluation may call.
//!
//! Tools are described once and rendered to the OpenAI-style function schema
//! that inference backends accept. Arguments of a recorded call can be
//! checked against the description.

mod definitions;
mod registry;

pub use definitions::{standard_tool, standard_tools};
pub use registry::ToolRegistry;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool '{0}' already registered")]
    AlreadyRegistered(String),

    #[error("Tool '{0}' not found")]
    NotFound(String),
}

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Integer,
    Boolean,
    Array,
    Object,
    Number,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Integer => "integer",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Array => "array",
            ParameterKind::Object => "object",
            ParameterKind::Number => "number",
        }
    }

    /// Whether a JSON value has this type. Integers are also numbers.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParameterKind::String => value.is_string(),
            ParameterKind::Integer => value.is_i64() || value.is_u64(),
            ParameterKind::Boolean => value.is_boolean(),
            ParameterKind::Array => value.is_array(),
            ParameterKind::Object => value.is_object(),
            ParameterKind::Number => value.is_number(),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ParameterKind,

    pub description: String,

    #[serde(default)]
    pub required: bool,

    /// Allowed values, if restricted
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Item schema for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,

    /// Property schemas for objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: false,
            enum_values: None,
            default: None,
            items: None,
            properties: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind));
        schema.insert("description".into(), json!(self.description));
        if let Some(values) = &self.enum_values {
            schema.insert("enum".into(), json!(values));
        }
        if let Some(items) = &self.items {
            schema.insert("items".into(), items.clone());
        }
        if let Some(properties) = &self.properties {
            schema.insert("properties".into(), properties.clone());
        }
        Value::Object(schema)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,

    pub description: String,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// What a call returns, in prose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,

    #[serde(default)]
    pub use_cases: Vec<String>,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns: None,
            use_cases: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    pub fn with_use_cases(mut self, use_cases: &[&str]) -> Self {
        self.use_cases = use_cases.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn optional_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| !p.required)
    }

    /// Check call arguments against the parameter list.
    ///
    /// Returns one message per problem; empty means the call is well formed.
    /// Arguments the tool does not declare are ignored.
    pub fn validate_arguments(&self, arguments: &Map<String, Value>) -> Vec<String> {
        let mut errors = Vec::new();

        let missing: Vec<&str> = self
            .required_parameters()
            .filter(|p| !arguments.contains_key(&p.name))
            .map(|p| p.name.as_str())
            .collect();
        if !missing.is_empty() {
            errors.push(format!("Missing required parameters: {}", missing.join(", ")));
        }

        for param in &self.parameters {
            let Some(value) = arguments.get(&param.name) else {
                continue;
            };
            if !param.kind.matches(value) {
                errors.push(format!("Invalid type for {}: expected {}", param.name, param.kind));
            }
            if let Some(allowed) = &param.enum_values {
                if !allowed.contains(value) {
                    errors.push(format!(
                        "Invalid value for {}: must be one of {}",
                        param.name,
                        json!(allowed)
                    ));
                }
            }
        }

        errors
    }

    /// OpenAI-style function schema: `{"type": "function", "function": {...}}`.
    pub fn to_function_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.schema()))
            .collect();
        let required: Vec<&str> = self.required_parameters().map(|p| p.name.as_str()).collect();

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                },
            },
        })
    }
}
