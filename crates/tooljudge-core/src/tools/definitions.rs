//! The standard coding-assistant tool set scenarios are written against.

use serde_json::json;

use super::{Parameter, ParameterKind as Kind, Tool, ToolError};

pub fn standard_tools() -> Vec<Tool> {
    vec![
        Tool::new("read_file", "Read contents of a file from the filesystem")
            .with_parameter(required("file_path", Kind::String, "Path to the file"))
            .with_parameter(optional("line_start", Kind::Integer, "First line to read (optional)"))
            .with_parameter(optional("line_end", Kind::Integer, "Last line to read (optional)"))
            .with_returns("File contents as string")
            .with_use_cases(&["Examining code", "Reading configs", "Viewing data"]),
        Tool::new("write_file", "Write or overwrite a file")
            .with_parameter(required("file_path", Kind::String, "Path to the file"))
            .with_parameter(required("contents", Kind::String, "Content to write"))
            .with_returns("Success/failure message")
            .with_use_cases(&["Creating files", "Saving edits"]),
        Tool::new("edit_file", "Search and replace within a file")
            .with_parameter(required("file_path", Kind::String, "Path to the file"))
            .with_parameter(required("old_text", Kind::String, "Text to find"))
            .with_parameter(required("new_text", Kind::String, "Replacement text"))
            .with_returns("Success/failure with line numbers")
            .with_use_cases(&["Bug fixes", "Refactoring"]),
        Tool::new("search_code", "Search for patterns in code using regex")
            .with_parameter(required("pattern", Kind::String, "Regex pattern"))
            .with_parameter(optional("file_path", Kind::String, "Specific file to search"))
            .with_parameter(optional("directory", Kind::String, "Directory to search in"))
            .with_returns("List of matches with file paths and line numbers")
            .with_use_cases(&["Finding definitions", "Locating TODOs"]),
        Tool::new("run_terminal_command", "Execute a shell command")
            .with_parameter(required("command", Kind::String, "Shell command to run"))
            .with_parameter(optional("working_directory", Kind::String, "Where to run it"))
            .with_parameter(optional("timeout", Kind::Integer, "Max execution time in seconds"))
            .with_returns("stdout, stderr, exit code")
            .with_use_cases(&["Running tests", "Installing packages"]),
        Tool::new("list_directory", "List files in a directory")
            .with_parameter(required("directory_path", Kind::String, "Path to list"))
            .with_parameter(
                optional("recursive", Kind::Boolean, "Include subdirectories")
                    .with_default(json!(false)),
            )
            .with_returns("List of file paths")
            .with_use_cases(&["Exploring project structure"]),
        Tool::new("get_function_definition", "Get the full definition of a function")
            .with_parameter(required("function_name", Kind::String, "Name of function"))
            .with_parameter(optional("file_path", Kind::String, "File containing function"))
            .with_returns("Function code with line numbers")
            .with_use_cases(&["Understanding code behavior"]),
    ]
}

fn required(name: &str, kind: Kind, description: &str) -> Parameter {
    Parameter::new(name, kind, description).required()
}

fn optional(name: &str, kind: Kind, description: &str) -> Parameter {
    Parameter::new(name, kind, description)
}

pub fn standard_tool(name: &str) -> Result<Tool, ToolError> {
    standard_tools()
        .into_iter()
        .find(|tool| tool.name == name)
        .ok_or_else(|| ToolError::NotFound(name.to_string()))
}
