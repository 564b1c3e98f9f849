//! Loading scenario libraries from a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use super::parser::ScenarioFormat;
use super::{Difficulty, Scenario, ScenarioCategory, ScenarioError};

/// An ordered collection of scenarios.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Load every `.json`, `.yaml` and `.yml` file under `dir`, recursively.
    ///
    /// Files are visited in sorted path order. A file that fails to parse is
    /// logged and skipped; only an unreadable directory is an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let paths = scenario_files(dir)?;

        let mut scenarios = Vec::with_capacity(paths.len());
        for path in paths {
            match Scenario::from_file(&path) {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Skipping unloadable scenario"
                    );
                }
            }
        }

        tracing::debug!(count = scenarios.len(), "Loaded scenario set");
        Ok(Self { scenarios })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn by_category(&self, category: ScenarioCategory) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|s| s.difficulty == difficulty)
            .collect()
    }
}

impl IntoIterator for ScenarioSet {
    type Item = Scenario;
    type IntoIter = std::vec::IntoIter<Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.into_iter()
    }
}

/// Every `.json`, `.yaml` and `.yml` file under `dir`, recursively, in
/// sorted path order. Nothing is parsed.
pub fn scenario_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ScenarioError> {
    let mut paths = Vec::new();
    collect_scenario_files(dir.as_ref(), &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_scenario_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScenarioError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_scenario_files(&path, out)?;
        } else if ScenarioFormat::from_path(&path).is_ok() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_load_dir_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "file_ops/read.yaml",
            "id: read_001\nname: Read\ncategory: file_ops\ndifficulty: easy\n\
             prompt:\n  user_query: Read the README file\n",
        );
        write(
            dir.path(),
            "debugging/fix.json",
            r#"{"id": "fix_001", "name": "Fix", "category": "debugging", "difficulty": "hard",
                "prompt": {"user_query": "Fix the off-by-one bug"}}"#,
        );
        write(dir.path(), "notes.txt", "not a scenario");
        write(dir.path(), "broken.yml", "id: [unterminated");

        let set = ScenarioSet::load_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        // sorted path order: debugging/ before file_ops/
        assert_eq!(set.iter().next().unwrap().id, "fix_001");
        assert_eq!(set.by_category(ScenarioCategory::FileOps).len(), 1);
        assert_eq!(set.by_difficulty(Difficulty::Hard)[0].id, "fix_001");
        assert!(set.get("read_001").is_some());
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn test_scenario_files_lists_unparseable_files_too() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.yaml", "id: [unterminated");
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "nested/c.yml", "id: c");
        write(dir.path(), "README.md", "# scenarios");

        let files = scenario_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b.yaml"),
                PathBuf::from("nested/c.yml"),
            ]
        );
    }

    #[test]
    fn test_missing_dir_is_error() {
        let result = ScenarioSet::load_dir("/definitely/not/here");
        assert!(matches!(result, Err(ScenarioError::IoError(_))));
    }
}
