//! This module provides functions for analyzing Turing Machine programs to detect common errors
//! and inconsistencies before execution. This includes checks for a defined start state,
//! reachable states and handled tape symbols, plus a listing of the dead-end states a program
//! halts in.

use crate::types::{Program, TuringMachineError};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of a Turing Machine program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the initial state is not a key of the transition table.
    InvalidStartState(String),
    /// Indicates states that are declared in the table but cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// Indicates that the initial tape contains symbols no transition reads.
    InvalidTapeSymbols(Vec<char>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
            AnalysisError::InvalidTapeSymbols(symbols) => {
                TuringMachineError::ValidationError(format!(
                    "Initial tape contains symbols not handled by any transition: {:?}",
                    symbols
                ))
            }
        }
    }
}

/// Analyzes a given Turing Machine `Program` for logical errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` for the first check that fails.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    [
        check_valid_start_state,
        check_unreachable_states,
        check_tape_symbols,
    ]
    .iter()
    .find_map(|f| f(program).err())
    .map_or(Ok(()), |error| Err(error.into()))
}

/// Returns the states that transitions lead into but that have no outgoing transitions.
///
/// Entering such a state always halts the machine on the following step. This is how programs
/// stop on purpose (`HALT`, `accept`), but it is also what a misspelled state name looks like,
/// so callers usually report the list. The result is sorted.
pub fn dead_end_states(program: &Program) -> Vec<String> {
    let mut dead_ends: Vec<String> = program
        .rules
        .iter()
        .map(|(_, _, transition)| transition.next_state.as_str())
        .filter(|state| !program.rules.has_transitions(state))
        .map(String::from)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    dead_ends.sort();
    dead_ends
}

/// Checks whether the initial state is declared in the transition table.
///
/// A machine started in an undeclared state halts on its first step without doing anything.
fn check_valid_start_state(program: &Program) -> Result<(), AnalysisError> {
    if !program.rules.contains_state(&program.initial_state) {
        return Err(AnalysisError::InvalidStartState(
            program.initial_state.clone(),
        ));
    }

    Ok(())
}

/// Checks for unreachable states by traversing the transition graph from the initial state.
///
/// Any state declared in the table that cannot be reached through some sequence of
/// transitions is considered unreachable.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.initial_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for (_, transition) in program.rules.transitions(state) {
            if !visited.contains(transition.next_state.as_str()) {
                queue.push(transition.next_state.as_str());
            }
        }
    }

    let unreachable: Vec<String> = program
        .rules
        .states()
        .into_iter()
        .filter(|state| !visited.contains(state))
        .map(String::from)
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that every symbol on the initial tape is read by at least one transition.
///
/// The blank symbol is always considered handled.
fn check_tape_symbols(program: &Program) -> Result<(), AnalysisError> {
    let mut handled_symbols: HashSet<char> =
        program.rules.iter().map(|(_, symbol, _)| symbol).collect();
    handled_symbols.insert(program.blank);

    let mut unhandled_symbols: Vec<char> = program
        .tape
        .chars()
        .filter(|c| !handled_symbols.contains(c))
        .collect();

    if !unhandled_symbols.is_empty() {
        unhandled_symbols.sort();
        unhandled_symbols.dedup();
        return Err(AnalysisError::InvalidTapeSymbols(unhandled_symbols));
    }

    Ok(())
}
