use serde_json::{Map, Value};

use super::{standard_tools, Tool, ToolError};

/// A named set of tools in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding [`standard_tools`].
    pub fn standard() -> Self {
        Self {
            tools: standard_tools(),
        }
    }

    pub fn register(&mut self, tool: Tool) -> Result<(), ToolError> {
        if self.contains(&tool.name) {
            return Err(ToolError::AlreadyRegistered(tool.name));
        }
        tracing::debug!(tool = %tool.name, "Registered tool");
        self.tools.push(tool);
        Ok(())
    }

    /// Register several tools, stopping at the first duplicate.
    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Tool>) -> Result<(), ToolError> {
        tools.into_iter().try_for_each(|tool| self.register(tool))
    }

    pub fn unregister(&mut self, name: &str) -> Option<Tool> {
        let index = self.tools.iter().position(|t| t.name == name)?;
        Some(self.tools.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    /// Validate a recorded call. An unknown tool is reported as an error message.
    pub fn validate_call(&self, name: &str, arguments: &Map<String, Value>) -> Vec<String> {
        match self.get(name) {
            Some(tool) => tool.validate_arguments(arguments),
            None => vec![format!("Tool '{name}' not found in registry")],
        }
    }

    /// Function schemas for every registered tool.
    pub fn function_schemas(&self) -> Vec<Value> {
        self.tools.iter().map(Tool::to_function_schema).collect()
    }
}
