//! This module provides the `ProgramLoader` struct, responsible for loading rule sets from
//! files, strings, and directories.

use crate::parser::parse;
use crate::types::{ConfigError, Program};
use std::fs;
use std::path::{Path, PathBuf};

/// The file extension of rule-set files.
pub const RULE_SET_EXTENSION: &str = "json";

/// `ProgramLoader` is a utility struct for loading rule sets.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single rule set from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed into a `Program`.
    /// * `Err(ConfigError::FileError)` if the file cannot be read.
    /// * Any error of [`parse`] if the content is not a valid rule set.
    pub fn load_program(path: &Path) -> Result<Program, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loading rule set");
        parse(&content)
    }

    /// Loads a single rule set from the provided string content.
    pub fn load_program_from_string(content: &str) -> Result<Program, ConfigError> {
        parse(content)
    }

    /// Loads every rule-set file (`.json` extension) in a directory.
    ///
    /// Directories and files with other extensions are skipped. Entries are returned sorted
    /// by path.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Program), ConfigError>>` - one element per candidate file, or
    ///   a single error if the directory cannot be read.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), ConfigError>> {
        if !directory.exists() {
            return vec![Err(ConfigError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(ConfigError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file()
                        && path.extension().is_some_and(|ext| ext == RULE_SET_EXTENSION)
                    {
                        paths.push(path);
                    }
                }
                Err(e) => results.push(Err(ConfigError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.sort();
        results.extend(paths.into_iter().map(|path| match Self::load_program(&path) {
            Ok(program) => Ok((path, program)),
            Err(e) => Err(ConfigError::FileError(format!(
                "Failed to load rule set from {}: {}",
                path.display(),
                e
            ))),
        }));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = r#"{
        "name": "Test Program",
        "initial_state": "start",
        "accepting_states": ["stop"],
        "transitions": {
            "start|a": { "next": "stop", "write": ["b"], "move": ["R"] }
        }
    }"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = write_file(dir.path(), "test.json", VALID);

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(program.name, "Test Program");
        assert_eq!(program.initial_state, "start");
        assert!(program.table.has_state("start"));
        assert!(program.is_accepting("stop"));
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = write_file(dir.path(), "invalid.json", "This is not a valid program");

        let result = ProgramLoader::load_program(&file_path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_program(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_load_program_from_string() {
        let program = ProgramLoader::load_program_from_string(VALID).unwrap();
        assert_eq!(program.table.len(), 1);
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        write_file(dir.path(), "valid.json", VALID);
        write_file(dir.path(), "invalid.json", r#"{ "accepting_states": [] }"#);
        write_file(dir.path(), "ignored.txt", "This file should be ignored");
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let results = ProgramLoader::load_programs(dir.path());

        // Sorted by path: invalid.json, then valid.json.
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(ConfigError::FileError(_))));
        let (path, program) = results[1].as_ref().unwrap();
        assert!(path.ends_with("valid.json"));
        assert_eq!(program.name, "Test Program");
    }

    #[test]
    fn test_load_programs_from_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_programs(&dir.path().join("missing"));

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
