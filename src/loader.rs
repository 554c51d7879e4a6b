//! This module provides the `ProgramLoader` struct, responsible for loading Turing Machine
//! programs from JSON documents stored in files, directories or strings.

use crate::analyzer::{analyze, dead_end_states};
use crate::types::{Program, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` is a utility struct for loading Turing Machine programs.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single Turing Machine program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if the file content is not a valid program.
    /// * `Err(TuringMachineError::ValidationError)` if the program fails analysis.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a single Turing Machine program from the provided JSON content.
    ///
    /// The program is analyzed before being returned. Dead-end states are legal (they are how
    /// programs halt) and only logged.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(TuringMachineError::ValidationError(format!(
                "Program is {} bytes, the limit is {}",
                content.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        let program: Program = serde_json::from_str(content)?;
        analyze(&program)?;

        let dead_ends = dead_end_states(&program);
        if !dead_ends.is_empty() {
            log::warn!(
                "program '{}' halts when entering {:?}",
                program.name,
                dead_ends
            );
        }

        Ok(program)
    }

    /// Loads all Turing Machine program files (`.json` extension) from a given directory.
    ///
    /// Directories and non-`.json` files are skipped. Each remaining file yields either its
    /// path and `Program` or the error that prevented loading it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}
