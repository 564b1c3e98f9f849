//! Action logs: what a model actually did.
//!
//! An [`ActionLog`] is the ordered list of tool invocations from one model
//! response, plus a summary derived from it. The summary is always
//! recomputed from the actions (including on deserialization) so the two can
//! never disagree.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw tool call as returned by a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub arguments: Map<String, Value>,

    pub sequence_number: u32,
}

/// One recorded tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    /// 1-based position in the response
    pub sequence_number: u32,

    pub function_name: String,

    #[serde(default)]
    pub arguments: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl Action {
    pub fn new(
        sequence_number: u32,
        function_name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            sequence_number,
            function_name: function_name.into(),
            arguments,
            call_id: None,
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }

    /// Look up an argument. An explicit `null` counts as absent.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name).filter(|v| !v.is_null())
    }
}

impl From<FunctionCall> for Action {
    fn from(call: FunctionCall) -> Self {
        Self {
            sequence_number: call.sequence_number,
            function_name: call.name,
            arguments: call.arguments,
            call_id: call.id,
        }
    }
}

/// Tool usage derived from an action list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionSummary {
    pub unique_tools_used: BTreeSet<String>,
    pub tools_called_multiple_times: Vec<String>,
    pub tool_call_counts: BTreeMap<String, usize>,
}

impl ActionSummary {
    fn from_actions(actions: &[Action]) -> Self {
        let mut tool_call_counts: BTreeMap<String, usize> = BTreeMap::new();
        for action in actions {
            *tool_call_counts
                .entry(action.function_name.clone())
                .or_default() += 1;
        }

        Self {
            unique_tools_used: tool_call_counts.keys().cloned().collect(),
            tools_called_multiple_times: tool_call_counts
                .iter()
                .filter(|(_, count)| **count > 1)
                .map(|(tool, _)| tool.clone())
                .collect(),
            tool_call_counts,
        }
    }
}

/// Ordered record of the tool calls one model response made.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "ActionLogRecord")]
pub struct ActionLog {
    scenario_id: Option<String>,
    total_calls: usize,
    actions: Vec<Action>,
    summary: ActionSummary,
}

/// Wire shape accepted on input; everything else is derived.
#[derive(Deserialize)]
struct ActionLogRecord {
    #[serde(default)]
    scenario_id: Option<String>,
    #[serde(default)]
    actions: Vec<Action>,
}

impl From<ActionLogRecord> for ActionLog {
    fn from(record: ActionLogRecord) -> Self {
        ActionLog::new(record.scenario_id, record.actions)
    }
}

impl ActionLog {
    pub fn new(scenario_id: Option<String>, actions: Vec<Action>) -> Self {
        let summary = ActionSummary::from_actions(&actions);
        Self {
            scenario_id,
            total_calls: actions.len(),
            actions,
            summary,
        }
    }

    /// Track the tool calls of a model response.
    pub fn from_calls(
        scenario_id: Option<String>,
        calls: impl IntoIterator<Item = FunctionCall>,
    ) -> Self {
        let actions: Vec<Action> = calls.into_iter().map(Action::from).collect();
        tracing::debug!(calls = actions.len(), "Tracked tool calls");
        Self::new(scenario_id, actions)
    }

    /// Concatenate logs, renumbering sequence numbers from 1.
    ///
    /// The merged log keeps a scenario id only if every input agrees on it.
    pub fn merge(logs: &[ActionLog]) -> Self {
        let actions = logs
            .iter()
            .flat_map(|log| log.actions.iter())
            .zip(1u32..)
            .map(|(action, sequence_number)| Action {
                sequence_number,
                ..action.clone()
            })
            .collect();

        let first = logs.first().and_then(|log| log.scenario_id.clone());
        let scenario_id = if logs.iter().all(|log| log.scenario_id == first) {
            first
        } else {
            None
        };

        Self::new(scenario_id, actions)
    }

    pub fn scenario_id(&self) -> Option<&str> {
        self.scenario_id.as_deref()
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn summary(&self) -> &ActionSummary {
        &self.summary
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Tool names in call order.
    pub fn tools_in_sequence(&self) -> Vec<&str> {
        self.actions
            .iter()
            .map(|a| a.function_name.as_str())
            .collect()
    }

    pub fn tool_count(&self, tool: &str) -> usize {
        self.summary.tool_call_counts.get(tool).copied().unwrap_or(0)
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.summary.unique_tools_used.contains(tool)
    }

    pub fn actions_for<'a>(&'a self, tool: &'a str) -> impl Iterator<Item = &'a Action> + 'a {
        self.actions.iter().filter(move |a| a.function_name == tool)
    }

    pub fn first(&self) -> Option<&Action> {
        self.actions.first()
    }

    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(seq: u32, name: &str, args: Value) -> FunctionCall {
        FunctionCall {
            id: Some(format!("call_{seq}")),
            name: name.to_string(),
            arguments: args.as_object().cloned().unwrap_or_default(),
            sequence_number: seq,
        }
    }

    #[test]
    fn test_from_calls_derives_summary() {
        let log = ActionLog::from_calls(
            Some("s1".to_string()),
            vec![
                call(1, "read_file", json!({"file_path": "a.py"})),
                call(2, "read_file", json!({"file_path": "b.py"})),
                call(3, "edit_file", json!({"file_path": "a.py"})),
            ],
        );

        assert_eq!(log.total_calls(), 3);
        assert_eq!(log.tool_count("read_file"), 2);
        assert_eq!(log.tool_count("write_file"), 0);
        assert!(log.has_tool("edit_file"));
        assert_eq!(log.summary().tools_called_multiple_times, vec!["read_file"]);
        assert_eq!(log.tools_in_sequence(), vec!["read_file", "read_file", "edit_file"]);
        assert_eq!(log.first().unwrap().call_id.as_deref(), Some("call_1"));
        assert_eq!(log.last().unwrap().function_name, "edit_file");
        assert_eq!(log.actions_for("read_file").count(), 2);
    }

    #[test]
    fn test_empty_log() {
        let log = ActionLog::default();
        assert!(log.is_empty());
        assert_eq!(log.total_calls(), 0);
        assert!(log.summary().unique_tools_used.is_empty());
        assert!(log.first().is_none());
    }

    #[test]
    fn test_null_argument_counts_as_absent() {
        let action = Action::new(
            1,
            "read_file",
            json!({"file_path": null}).as_object().cloned().unwrap(),
        );
        assert!(action.argument("file_path").is_none());
    }

    #[test]
    fn test_merge_renumbers_and_resummarizes() {
        let a = ActionLog::from_calls(Some("s".into()), vec![call(1, "read_file", json!({}))]);
        let b = ActionLog::from_calls(
            Some("s".into()),
            vec![call(1, "read_file", json!({})), call(2, "list_directory", json!({}))],
        );

        let merged = ActionLog::merge(&[a, b]);
        let numbers: Vec<u32> = merged.actions().iter().map(|a| a.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(merged.tool_count("read_file"), 2);
        assert_eq!(merged.scenario_id(), Some("s"));
    }

    #[test]
    fn test_merge_drops_conflicting_scenario_ids() {
        let a = ActionLog::new(Some("a".into()), vec![]);
        let b = ActionLog::new(Some("b".into()), vec![]);
        assert_eq!(ActionLog::merge(&[a, b]).scenario_id(), None);
    }

    #[test]
    fn test_deserialize_rederives_summary() {
        let json = r#"{
            "scenario_id": "s1",
            "total_calls": 99,
            "actions": [
                {"sequence_number": 1, "function_name": "list_directory", "arguments": {"directory_path": "."}}
            ],
            "summary": {"unique_tools_used": ["bogus"], "tools_called_multiple_times": [], "tool_call_counts": {}}
        }"#;
        let log: ActionLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.total_calls(), 1);
        assert!(log.has_tool("list_directory"));
        assert!(!log.has_tool("bogus"));

        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["total_calls"], 1);
        assert_eq!(value["summary"]["tool_call_counts"]["list_directory"], 1);
    }
}
