use crate::loader::ProgramLoader;
use crate::types::{Program, TuringMachineError};

use std::sync::RwLock;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../programs/eraser.json"),
    include_str!("../programs/binary-increment.json"),
    include_str!("../programs/unary-addition.json"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

/// Read access to the built-in programs.
pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded programs into the shared registry.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut programs = Vec::new();

        for program_text in PROGRAM_TEXTS {
            match ProgramLoader::load_program_from_string(program_text) {
                Ok(program) => programs.push(program),
                Err(e) => log::error!("Failed to parse built-in program: {}", e),
            }
        }

        let mut write_guard = PROGRAMS.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;
        *write_guard = programs;

        Ok(())
    }

    /// Loads the registry on first use.
    fn ensure_loaded() {
        let loaded = PROGRAMS.read().map(|p| !p.is_empty()).unwrap_or(false);
        if !loaded {
            if let Err(e) = Self::load() {
                log::error!("Failed to load built-in programs: {}", e);
            }
        }
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        Self::ensure_loaded();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        Self::ensure_loaded();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.initial_state.clone(),
            initial_tape: program.tape.clone(),
            state_count: program.rules.states().len(),
            transition_count: program.rules.len(),
        })
    }

    /// Get the original text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS.get(index).copied().ok_or_else(|| {
            TuringMachineError::ValidationError(format!(
                "Program text index {} out of range",
                index
            ))
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;

    #[test]
    fn test_program_manager_initialization() {
        assert!(ProgramManager::load().is_ok());
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_accessors_load_on_first_use() {
        ProgramManager::ensure_loaded();

        assert!(!PROGRAMS.read().unwrap().is_empty());
        assert_eq!(
            ProgramManager::list_program_names().len(),
            PROGRAM_TEXTS.len()
        );
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(names, vec!["Eraser", "Binary Increment", "Unary Addition"]);
    }

    #[test]
    fn test_programs_run_to_a_natural_halt() {
        for i in 0..ProgramManager::get_program_count() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            let mut machine = TuringMachine::from_program(&program);

            let result = machine.run_to_completion().unwrap();
            assert!(
                result.halted_naturally(),
                "Program '{}' did not halt",
                program.name
            );
        }
    }

    #[test]
    fn test_eraser_program() {
        let program = ProgramManager::get_program_by_name("eraser").unwrap();
        let result = TuringMachine::from_program(&program).run(100).unwrap();

        assert_eq!(result.steps, 6);
        assert_eq!(result.tape_string(), "00000_");
    }

    #[test]
    fn test_binary_increment_carries_past_origin() {
        let mut program = ProgramManager::get_program_by_name("Binary Increment").unwrap();
        let result = TuringMachine::from_program(&program).run(100).unwrap();
        assert_eq!(result.tape_string(), "1100_");
        assert_eq!(result.steps, 8);

        program.tape = "111".to_string();
        let mut machine = TuringMachine::from_program(&program);
        let result = machine.run(100).unwrap();
        assert_eq!(result.tape_string(), "1000_");
        assert_eq!(machine.tape().span(), Some((-1, 3)));
        assert_eq!(machine.head(), -2);
    }

    #[test]
    fn test_unary_addition() {
        let program = ProgramManager::get_program_by_name("Unary Addition").unwrap();
        let mut machine = TuringMachine::from_program(&program);

        let result = machine.run(100).unwrap();
        assert_eq!(result.steps, 8);
        assert_eq!(machine.tape().trimmed().iter().collect::<String>(), "11111");
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name_missing() {
        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(1).unwrap();

        assert_eq!(info.index, 1);
        assert_eq!(info.name, "Binary Increment");
        assert_eq!(info.initial_tape, "1011");
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 6);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_program_text_by_index() {
        assert!(ProgramManager::get_program_text_by_index(0)
            .unwrap()
            .contains("Eraser"));
        assert!(ProgramManager::get_program_text_by_index(3).is_err());
    }
}
