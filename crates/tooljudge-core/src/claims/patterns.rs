//! Detection patterns for action claims.
//!
//! Patterns are compiled once and shared by every extractor. A pattern
//! captures the action verb in group 1 and the target object in group 2.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

/// Verbs a claim pattern may capture. Multi-word verbs come first so the
/// alternation prefers them.
const VERBS: &str = r"look(?:ing|ed)?\s+(?:at|for|into)|read(?:ing)?|open(?:ing|ed)?|check(?:ing|ed)?|examin(?:e|ing|ed)|view(?:ing|ed)?|inspect(?:ing|ed)?|writ(?:e|ing|ten)|wrote|creat(?:e|ing|ed)|sav(?:e|ing|ed)|edit(?:ing|ed)?|modif(?:y|ying|ied)|updat(?:e|ing|ed)|chang(?:e|ing|ed)|fix(?:ing|ed)?|replac(?:e|ing|ed)|search(?:ing|ed)?|find(?:ing)?|found|grep(?:ping|ped)?|list(?:ing|ed)?|run(?:ning)?|ran|execut(?:e|ing|ed)|test(?:ing|ed)?";

/// Up to four words following the verb.
const TARGET: &str = r#"((?:[\w./\\`'"\-]+)(?:\s+[\w./\\`'"\-]+){0,3})"#;

lazy_static! {
    /// Ordered claim patterns. Earlier patterns are more specific.
    pub static ref ACTION_PATTERNS: Vec<Regex> = vec![
        // Intent: "I'll read", "let me check", "I'm going to run"
        Regex::new(&format!(
            r"(?i)\b(?:i'll|i will|let me|i'm going to|i am going to|i need to|i should|i can)\s+(?:first\s+|now\s+|also\s+)?({VERBS})\s+{TARGET}"
        )).unwrap(),
        // Report: "I have read", "I've edited", "I checked"
        Regex::new(&format!(
            r"(?i)\bi(?:'ve| have)?\s+(?:already\s+|just\s+)?({VERBS})\s+{TARGET}"
        )).unwrap(),
        // Progressive: "Reading config.yaml", "after checking the tests"
        Regex::new(&format!(
            r"(?i)(?:^|\b(?:after|by|while|before)\s+)(reading|opening|checking|examining|viewing|inspecting|looking\s+at|searching|listing|running|editing|writing|creating|updating|fixing)\s+{TARGET}"
        )).unwrap(),
    ];

    /// First-person intent markers that make a claim explicit.
    pub static ref INTENT_MARKER: Regex = Regex::new(
        r"(?i)\b(?:i'll|i will|let me|i'm going to|i am going to)\b"
    ).unwrap();

    /// Hedging words that make a claim conditional.
    pub static ref CONDITIONAL_MARKER: Regex = Regex::new(
        r"(?i)\b(?:if|might|could|would|should|may)\b"
    ).unwrap();

    /// Phrases that report an action in passing.
    pub static ref IMPLICIT_MARKER: Regex = Regex::new(
        r"(?i)\b(?:after|based on|looking at|examining)\b"
    ).unwrap();

    /// Verb (normalized, lowercase) to candidate tools, most likely first.
    pub static ref VERB_TO_TOOL: HashMap<&'static str, &'static [&'static str]> = {
        const READ: &[&str] = &["read_file"];
        const WRITE: &[&str] = &["write_file", "edit_file"];
        const EDIT: &[&str] = &["edit_file", "write_file"];
        const SEARCH: &[&str] = &["search_code"];
        const LIST: &[&str] = &["list_directory"];
        const RUN: &[&str] = &["run_terminal_command"];

        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        for verb in [
            "read", "reading", "open", "opening", "opened", "check", "checking", "checked",
            "examine", "examining", "examined", "view", "viewing", "viewed", "inspect",
            "inspecting", "inspected", "look at", "looking at", "looked at", "look into",
            "looking into", "looked into",
        ] {
            m.insert(verb, READ);
        }
        for verb in ["write", "writing", "written", "wrote", "create", "creating", "created",
                     "save", "saving", "saved"] {
            m.insert(verb, WRITE);
        }
        for verb in [
            "edit", "editing", "edited", "modify", "modifying", "modified", "update", "updating",
            "updated", "change", "changing", "changed", "fix", "fixing", "fixed", "replace",
            "replacing", "replaced",
        ] {
            m.insert(verb, EDIT);
        }
        for verb in [
            "search", "searching", "searched", "find", "finding", "found", "grep", "grepping",
            "grepped", "look for", "looking for", "looked for",
        ] {
            m.insert(verb, SEARCH);
        }
        for verb in ["list", "listing", "listed"] {
            m.insert(verb, LIST);
        }
        for verb in ["run", "running", "ran", "execute", "executing", "executed", "test",
                     "testing", "tested"] {
            m.insert(verb, RUN);
        }
        m
    };
}

/// Most likely tool for a normalized verb.
pub fn tool_for_verb(verb: &str) -> Option<&'static str> {
    VERB_TO_TOOL.get(verb).and_then(|tools| tools.first().copied())
}

/// Lowercase a captured verb and collapse inner whitespace ("Look  AT" -> "look at").
pub(crate) fn normalize_verb(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_pattern_captures_verb_and_target() {
        let caps = ACTION_PATTERNS[0]
            .captures("Let me read the config file")
            .unwrap();
        assert_eq!(&caps[1], "read");
        assert_eq!(&caps[2], "the config file");
    }

    #[test]
    fn test_multi_word_verb_preferred() {
        let caps = ACTION_PATTERNS[0]
            .captures("I'll look at main.rs")
            .unwrap();
        assert_eq!(normalize_verb(&caps[1]), "look at");
        assert_eq!(&caps[2], "main.rs");
    }

    #[test]
    fn test_report_pattern() {
        let caps = ACTION_PATTERNS[1]
            .captures("I've updated utils.py with the fix")
            .unwrap();
        assert_eq!(&caps[1], "updated");
    }

    #[test]
    fn test_tool_for_verb() {
        assert_eq!(tool_for_verb("read"), Some("read_file"));
        assert_eq!(tool_for_verb("looking for"), Some("search_code"));
        assert_eq!(tool_for_verb("wrote"), Some("write_file"));
        assert_eq!(tool_for_verb("ran"), Some("run_terminal_command"));
        assert_eq!(tool_for_verb("ponder"), None);
    }

    #[test]
    fn test_conditional_marker_needs_whole_word() {
        assert!(CONDITIONAL_MARKER.is_match("If needed I'll edit it"));
        assert!(!CONDITIONAL_MARKER.is_match("I'll modify the file"));
    }
}
