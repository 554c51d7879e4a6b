//! This module defines the core data structures and types used throughout the Turing Machine
//! interpreter, including program representation, transitions, step events, run results,
//! and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::table::TransitionTable;

/// The default blank symbol used on the Turing Machine tape.
pub const DEFAULT_BLANK_SYMBOL: char = '_';
/// The default step budget for a single run.
pub const DEFAULT_MAX_STEPS: usize = 100;
/// The maximum number of steps `run_to_completion` executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;
/// The maximum allowed size for a Turing Machine program document in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// A Turing Machine program: the initial configuration plus its transition table.
///
/// Programs are plain data. They are read from JSON documents by the loader and
/// turned into a running machine with [`crate::TuringMachine::from_program`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the Turing Machine program.
    pub name: String,
    /// Execution mode of the interpreter.
    #[serde(default)]
    pub mode: Mode,
    /// The state the machine starts in.
    pub initial_state: String,
    /// The initial content of the tape, one symbol per character, starting at index 0.
    #[serde(default)]
    pub tape: String,
    /// The symbol read from cells that were never written.
    #[serde(default = "default_blank")]
    pub blank: char,
    /// The transition rules, keyed by state and then by the symbol read.
    pub rules: TransitionTable,
}

fn default_blank() -> char {
    DEFAULT_BLANK_SYMBOL
}

/// The execution mode for a Turing Machine program.
///
/// Controls how the interpreter handles a missing transition:
/// - `Normal` (default): a missing transition halts the machine (faithful to TM theory).
/// - `Strict`: a missing transition out of a state that has other transitions is an error,
///   useful for catching incomplete tables. States without any transitions still halt.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    /// Missing transitions halt normally.
    #[default]
    Normal,
    /// Missing transitions out of non-terminal states are treated as errors.
    Strict,
}

/// A single transition rule: what to write, where to move and which state comes next.
///
/// In JSON a transition is written as a three element array, e.g. `["0", "R", "q0"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(char, Direction, String)", into = "(char, Direction, String)")]
pub struct Transition {
    /// The symbol written to the cell under the head.
    pub write: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
    /// The next state the machine transitions to.
    pub next_state: String,
}

impl Transition {
    pub fn new(write: char, direction: Direction, next_state: impl Into<String>) -> Self {
        Self {
            write,
            direction,
            next_state: next_state.into(),
        }
    }
}

impl From<(char, Direction, String)> for Transition {
    fn from((write, direction, next_state): (char, Direction, String)) -> Self {
        Self {
            write,
            direction,
            next_state,
        }
    }
}

impl From<Transition> for (char, Direction, String) {
    fn from(t: Transition) -> Self {
        (t.write, t.direction, t.next_state)
    }
}

/// The two directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// The offset applied to the head position.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Supports `<`, `L` or `Left` for Left and `>`, `R` or `Right` for Right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" | "L" | "Left" => Ok(Direction::Left),
            ">" | "R" | "Right" => Ok(Direction::Right),
            _ => Err(TuringMachineError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = TuringMachineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.to_string()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

/// The outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The transition was applied.
    Applied(Transition),
    /// No transition matched; the machine has halted.
    Halted,
}

/// Everything an observer needs to render one step of the machine.
///
/// All fields describe the configuration *before* the step was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEvent {
    /// Number of transitions applied before this step.
    pub step: usize,
    /// The state the machine was in.
    pub state: String,
    /// The symbol under the head.
    pub symbol: char,
    /// The head position.
    pub head: i64,
    /// The materialized tape.
    pub tape: Vec<char>,
    /// What the step did.
    pub outcome: StepOutcome,
}

impl StepEvent {
    pub fn is_halt(&self) -> bool {
        self.outcome == StepOutcome::Halted
    }

    pub fn transition(&self) -> Option<&Transition> {
        match &self.outcome {
            StepOutcome::Applied(t) => Some(t),
            StepOutcome::Halted => None,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No transition matched the current state and symbol.
    Halted,
    /// The step budget was used up. Running again resumes the machine.
    BudgetExhausted,
    /// The observer asked to stop between steps.
    Cancelled,
}

/// The result of a bounded run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// The materialized tape after the run.
    pub tape: Vec<char>,
    /// Number of transitions applied during this run.
    pub steps: usize,
    /// Why the run stopped.
    pub stop: StopReason,
    /// Every step event emitted during this run, in order.
    pub events: Vec<StepEvent>,
}

impl RunResult {
    /// Returns `true` if the machine stopped because no transition matched.
    pub fn halted_naturally(&self) -> bool {
        self.stop == StopReason::Halted
    }

    /// Returns the final tape as a string.
    pub fn tape_string(&self) -> String {
        self.tape.iter().collect()
    }
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates a direction token other than left or right.
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),
    /// Indicates a symbol that is not exactly one character.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
    /// Indicates that a non-terminal state has no rule for the symbol read (strict mode).
    #[error("No rule defined for state {0} and symbol {1:?}")]
    UndefinedTransition(String, char),
    /// Indicates an argument rejected before any step is executed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Indicates an error during the parsing of a program document.
    #[error("Program parsing error: {0}")]
    ParseError(String),
    /// Indicates an error during the validation of a Turing Machine program's structure or logic.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations, such as reading program files.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<serde_json::Error> for TuringMachineError {
    fn from(error: serde_json::Error) -> Self {
        TuringMachineError::ParseError(error.to_string())
    }
}

/// Parses a step budget from untyped input, rejecting negative or non-numeric values.
pub fn parse_step_budget(input: &str) -> Result<usize, TuringMachineError> {
    let input = input.trim();
    match input.parse::<i64>() {
        Ok(n) if n < 0 => Err(TuringMachineError::InvalidArgument(format!(
            "step budget must be non-negative, got {n}"
        ))),
        Ok(n) => usize::try_from(n).map_err(|_| {
            TuringMachineError::InvalidArgument(format!("step budget {n} is too large"))
        }),
        Err(_) => Err(TuringMachineError::InvalidArgument(format!(
            "step budget must be an integer, got {input:?}"
        ))),
    }
}
