//! This crate provides the core logic for a deterministic single-tape Turing Machine interpreter.
//! It includes the tape, the transition table, the stepping engine with its bounded run loop
//! and step observers, plus program loading, static analysis and a set of built-in programs.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod observer;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` and `dead_end_states` functions and the `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, dead_end_states, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the observer trait and its continue signal.
pub use observer::{Control, StepObserver, Unobserved};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types related to Turing Machine definition and execution from the types module.
pub use types::{
    parse_step_budget, Direction, Mode, Program, RunResult, StepEvent, StepOutcome, StopReason,
    Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL, DEFAULT_MAX_STEPS,
};
