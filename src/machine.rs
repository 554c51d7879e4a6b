//! This module defines the `TuringMachine` struct, which interprets a deterministic
//! single-tape Turing Machine. It owns the machine configuration (tape, head, current state,
//! step count), applies single steps and drives bounded runs that report every step to an
//! observer.

use crate::observer::{Control, StepObserver, Unobserved};
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{
    Mode, Program, RunResult, StepEvent, StepOutcome, StopReason, Transition, TuringMachineError,
    MAX_EXECUTION_STEPS,
};

/// A deterministic single-tape Turing Machine.
///
/// The machine is either running or halted. It halts the first time a step finds no transition
/// for the current state and the symbol under the head; from then on it never changes again.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    state: String,
    tape: Tape,
    head: i64,
    table: TransitionTable,
    mode: Mode,
    step_count: usize,
    halted: bool,
    initial_state: String,
    initial_tape: Vec<char>,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` with its head on index 0 of `initial_tape`.
    ///
    /// # Arguments
    ///
    /// * `initial_tape` - The initial tape content, one symbol per character.
    /// * `table` - The transition rules.
    /// * `start_state` - The state the machine starts in.
    /// * `blank` - The symbol read from cells that were never written.
    pub fn new(
        initial_tape: &str,
        table: TransitionTable,
        start_state: impl Into<String>,
        blank: char,
    ) -> Self {
        let initial_tape: Vec<char> = initial_tape.chars().collect();
        let initial_state = start_state.into();

        Self {
            state: initial_state.clone(),
            tape: Tape::from_symbols(initial_tape.iter().copied(), blank),
            head: 0,
            table,
            mode: Mode::default(),
            step_count: 0,
            halted: false,
            initial_state,
            initial_tape,
        }
    }

    /// Creates a new `TuringMachine` from a `Program`.
    pub fn from_program(program: &Program) -> Self {
        Self::new(
            &program.tape,
            program.rules.clone(),
            program.initial_state.clone(),
            program.blank,
        )
        .with_mode(program.mode)
    }

    /// Sets how missing transitions are handled.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Executes a single step of the machine.
    ///
    /// Reads the symbol under the head and looks up the transition for the current state.
    /// If there is one, the symbol is written, the head moves and the state changes, all
    /// before this method returns. If there is none, the machine halts without any change.
    ///
    /// # Returns
    ///
    /// * `Ok(StepEvent)` describing the configuration before the step and its outcome.
    /// * `Err(TuringMachineError::UndefinedTransition)` in strict mode when a state that has
    ///   transitions has none for the symbol read. The machine is left untouched.
    pub fn step(&mut self) -> Result<StepEvent, TuringMachineError> {
        let symbol = self.symbol();
        let mut event = StepEvent {
            step: self.step_count,
            state: self.state.clone(),
            symbol,
            head: self.head,
            tape: self.tape.snapshot(),
            outcome: StepOutcome::Halted,
        };

        if self.halted {
            return Ok(event);
        }

        let transition = match self.table.lookup(&self.state, symbol).cloned() {
            Some(t) => t,
            None => {
                if self.mode == Mode::Strict && self.table.has_transitions(&self.state) {
                    return Err(TuringMachineError::UndefinedTransition(
                        self.state.clone(),
                        symbol,
                    ));
                }

                log::debug!(
                    "halted in state {} reading {:?} at {} after {} steps",
                    self.state,
                    symbol,
                    self.head,
                    self.step_count
                );
                self.halted = true;
                return Ok(event);
            }
        };

        self.tape.write(self.head, transition.write);
        self.head += transition.direction.offset();
        self.state = transition.next_state.clone();
        self.step_count += 1;

        log::debug!(
            "step {}: {} {:?} -> {:?}, {}, {}",
            self.step_count,
            event.state,
            symbol,
            transition.write,
            transition.direction,
            transition.next_state
        );

        event.outcome = StepOutcome::Applied(transition);
        Ok(event)
    }

    /// Runs at most `max_steps` transitions without pausing between them.
    pub fn run(&mut self, max_steps: usize) -> Result<RunResult, TuringMachineError> {
        self.run_with(max_steps, &mut Unobserved)
    }

    /// Runs at most `max_steps` transitions, handing every step event to `observer`.
    ///
    /// The observer is called after each step, including the halting one, and before the next
    /// step is issued. The run stops when the machine halts, when `max_steps` transitions have
    /// been applied, or when the observer returns [`Control::Stop`]. A run stopped by budget or
    /// by the observer can be resumed by calling `run_with` again.
    ///
    /// Running a halted machine applies nothing and emits no events.
    ///
    /// If a step fails (strict mode), the error is returned and the `RunResult` of the steps
    /// already applied in this run is dropped. Those steps stay applied to the machine and the
    /// observer is the only record of their events.
    pub fn run_with<O>(
        &mut self,
        max_steps: usize,
        observer: &mut O,
    ) -> Result<RunResult, TuringMachineError>
    where
        O: StepObserver + ?Sized,
    {
        let mut events = Vec::new();
        let mut steps = 0;

        let stop = loop {
            if self.halted {
                break StopReason::Halted;
            }
            if steps == max_steps {
                break StopReason::BudgetExhausted;
            }

            let event = self.step()?;
            let halted = event.is_halt();
            if !halted {
                steps += 1;
            }

            let control = observer.on_step(&event);
            events.push(event);

            if halted {
                break StopReason::Halted;
            }
            if control == Control::Stop {
                break StopReason::Cancelled;
            }
        };

        log::info!(
            "run stopped ({:?}) after {} of at most {} steps in state {}",
            stop,
            steps,
            max_steps,
            self.state
        );

        Ok(RunResult {
            tape: self.tape.snapshot(),
            steps,
            stop,
            events,
        })
    }

    /// Runs the machine until it halts or `MAX_EXECUTION_STEPS` transitions were applied.
    pub fn run_to_completion(&mut self) -> Result<RunResult, TuringMachineError> {
        self.run(MAX_EXECUTION_STEPS)
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) {
        self.state = self.initial_state.clone();
        self.tape = Tape::from_symbols(self.initial_tape.iter().copied(), self.tape.blank());
        self.head = 0;
        self.step_count = 0;
        self.halted = false;
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the state the machine started in.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns the head position. It may be negative once the head moved left of the origin.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape.read(self.head)
    }

    /// Returns the total number of transitions applied since construction or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns `true` once a step found no matching transition.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn blank(&self) -> char {
        self.tape.blank()
    }

    /// Returns the transition the next step would apply, if any.
    pub fn transition(&self) -> Option<&Transition> {
        if self.halted {
            return None;
        }
        self.table.lookup(&self.state, self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn eraser() -> TransitionTable {
        TransitionTable::new()
            .with("q0", '1', Transition::new('0', Direction::Right, "q0"))
            .with("q0", '0', Transition::new('0', Direction::Right, "q0"))
            .with("q0", '_', Transition::new('_', Direction::Right, "HALT"))
    }

    fn eraser_machine(tape: &str) -> TuringMachine {
        TuringMachine::new(tape, eraser(), "q0", '_')
    }

    fn tape_string(tape: &[char]) -> String {
        tape.iter().collect()
    }

    #[test]
    fn test_machine_creation() {
        let machine = eraser_machine("10");

        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.symbol(), '1');
        assert_eq!(machine.step_count(), 0);
        assert!(!machine.is_halted());
        assert_eq!(machine.tape().snapshot(), vec!['1', '0']);
    }

    #[test]
    fn test_single_step_applies_transition() {
        let mut machine = eraser_machine("10");

        let event = machine.step().unwrap();

        assert_eq!(event.step, 0);
        assert_eq!(event.state, "q0");
        assert_eq!(event.symbol, '1');
        assert_eq!(event.head, 0);
        assert_eq!(event.tape, vec!['1', '0']);
        assert_eq!(
            event.outcome,
            StepOutcome::Applied(Transition::new('0', Direction::Right, "q0"))
        );

        assert_eq!(machine.tape().snapshot(), vec!['0', '0']);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_halting_step_does_not_mutate() {
        let mut machine = TuringMachine::new("x", eraser(), "q0", '_');

        let event = machine.step().unwrap();

        assert!(event.is_halt());
        assert!(machine.is_halted());
        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape().snapshot(), vec!['x']);
    }

    #[test]
    fn test_erasure_halts_naturally() {
        let mut machine = eraser_machine("10101");

        let result = machine.run(100).unwrap();

        assert!(result.halted_naturally());
        assert_eq!(result.steps, 6);
        // The blank written at index 5 is materialized
        assert_eq!(result.tape_string(), "00000_");
        assert_eq!(tape_string(&machine.tape().trimmed()), "00000");
        assert_eq!(machine.state(), "HALT");
        assert_eq!(machine.head(), 6);

        // One event per applied step plus the halting one
        assert_eq!(result.events.len(), 7);
        assert!(result.events.last().unwrap().is_halt());
        assert_eq!(result.events.last().unwrap().state, "HALT");
    }

    #[test]
    fn test_budget_truncation() {
        let mut machine = eraser_machine("11111111");

        let result = machine.run(3).unwrap();

        assert!(!result.halted_naturally());
        assert_eq!(result.stop, StopReason::BudgetExhausted);
        assert_eq!(result.steps, 3);
        assert_eq!(result.tape_string(), "00011111");
        assert_eq!(machine.head(), 3);
        assert_eq!(result.events.len(), 3);
    }

    #[test]
    fn test_empty_tape_halts_after_one_step() {
        let mut machine = eraser_machine("");
        assert_eq!(machine.symbol(), '_');

        let result = machine.run(100).unwrap();

        assert!(result.halted_naturally());
        assert_eq!(result.steps, 1);
        assert_eq!(result.tape_string(), "_");
    }

    #[test]
    fn test_transition_into_undeclared_state_halts() {
        let table =
            TransitionTable::new().with("q0", 'a', Transition::new('b', Direction::Right, "q1"));

        for mode in [Mode::Normal, Mode::Strict] {
            let mut machine = TuringMachine::new("aa", table.clone(), "q0", '_').with_mode(mode);

            let result = machine.run(10).unwrap();

            assert!(result.halted_naturally());
            assert_eq!(result.steps, 1);
            assert_eq!(result.tape_string(), "ba");
            assert_eq!(machine.state(), "q1");
        }
    }

    #[test]
    fn test_strict_mode_rejects_missing_symbol() {
        let mut machine = TuringMachine::new("1x", eraser(), "q0", '_').with_mode(Mode::Strict);

        let error = machine.run(10).unwrap_err();

        assert_eq!(
            error,
            TuringMachineError::UndefinedTransition("q0".to_string(), 'x')
        );
        assert!(!machine.is_halted());
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_observer_keeps_steps_before_strict_failure() {
        let mut machine = TuringMachine::new("10x", eraser(), "q0", '_').with_mode(Mode::Strict);
        let mut seen = Vec::new();

        let error = machine
            .run_with(10, &mut |event: &StepEvent| {
                seen.push(event.clone());
                Control::Continue
            })
            .unwrap_err();

        assert!(matches!(error, TuringMachineError::UndefinedTransition(_, 'x')));
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].head, 1);
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.tape().snapshot(), vec!['0', '0', 'x']);
    }

    #[test]
    fn test_zero_budget_changes_nothing() {
        let mut machine = eraser_machine("101");

        let result = machine.run(0).unwrap();

        assert_eq!(result.steps, 0);
        assert_eq!(result.stop, StopReason::BudgetExhausted);
        assert!(result.events.is_empty());
        assert_eq!(result.tape_string(), "101");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.state(), "q0");
    }

    #[test]
    fn test_halted_machine_is_idempotent() {
        let mut machine = eraser_machine("10");
        let first = machine.run(100).unwrap();
        assert!(first.halted_naturally());

        let second = machine.run(100).unwrap();

        assert!(second.halted_naturally());
        assert_eq!(second.steps, 0);
        assert!(second.events.is_empty());
        assert_eq!(second.tape, first.tape);
    }

    #[test]
    fn test_run_resumes_after_budget() {
        let mut machine = eraser_machine("1111");

        let first = machine.run(2).unwrap();
        assert_eq!(first.steps, 2);
        assert!(!first.halted_naturally());

        let second = machine.run(100).unwrap();
        assert!(second.halted_naturally());
        assert_eq!(second.steps, 3);
        assert_eq!(machine.step_count(), 5);
        assert_eq!(second.tape_string(), "0000_");
    }

    #[test]
    fn test_steps_never_exceed_budget() {
        for budget in 0..10 {
            let mut machine = eraser_machine("10101");
            let result = machine.run(budget).unwrap();

            assert!(result.steps <= budget);
            assert_eq!(result.steps == budget, !result.halted_naturally());
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let first = eraser_machine("1001").run(50).unwrap();
        let second = eraser_machine("1001").run(50).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_head_moves_left_of_origin() {
        let table = TransitionTable::new()
            .with("q0", '1', Transition::new('1', Direction::Left, "q1"))
            .with("q1", '_', Transition::new('#', Direction::Left, "done"));
        let mut machine = TuringMachine::new("1", table, "q0", '_');

        let result = machine.run(10).unwrap();

        assert!(result.halted_naturally());
        assert_eq!(result.steps, 2);
        assert_eq!(machine.head(), -2);
        assert_eq!(result.tape_string(), "#1");
        assert_eq!(machine.tape().span(), Some((-1, 0)));
        assert_eq!(machine.tape().read(-1), '#');
    }

    #[test]
    fn test_observer_sees_every_step_before_the_next() {
        let mut machine = eraser_machine("10");
        let mut seen = Vec::new();

        let result = machine
            .run_with(100, &mut |event: &StepEvent| {
                seen.push((event.step, event.head, event.is_halt()));
                Control::Continue
            })
            .unwrap();

        assert_eq!(seen, vec![(0, 0, false), (1, 1, false), (2, 2, false), (3, 3, true)]);
        assert_eq!(result.events.len(), seen.len());
    }

    #[test]
    fn test_observer_can_cancel_between_steps() {
        let mut machine = eraser_machine("1111");
        let mut calls = 0;

        let result = machine
            .run_with(100, &mut |_: &StepEvent| {
                calls += 1;
                if calls == 2 {
                    Control::Stop
                } else {
                    Control::Continue
                }
            })
            .unwrap();

        assert_eq!(result.stop, StopReason::Cancelled);
        assert!(!result.halted_naturally());
        assert_eq!(result.steps, 2);
        assert_eq!(result.tape_string(), "0011");
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_step_after_halt_reports_halt_again() {
        let mut machine = eraser_machine("");
        machine.run(10).unwrap();

        let event = machine.step().unwrap();

        assert!(event.is_halt());
        assert_eq!(machine.step_count(), 1);
        assert_eq!(machine.transition(), None);
    }

    #[test]
    fn test_reset() {
        let mut machine = eraser_machine("101");
        machine.run(100).unwrap();
        assert!(machine.is_halted());

        machine.reset();

        assert!(!machine.is_halted());
        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape().snapshot(), vec!['1', '0', '1']);
        assert_eq!(
            machine.transition(),
            Some(&Transition::new('0', Direction::Right, "q0"))
        );
    }

    #[test]
    fn test_from_program() {
        let program = Program {
            name: "Eraser".to_string(),
            mode: Mode::Strict,
            initial_state: "q0".to_string(),
            tape: "01".to_string(),
            blank: '_',
            rules: eraser(),
        };

        let mut machine = TuringMachine::from_program(&program);
        assert_eq!(machine.mode(), Mode::Strict);

        let result = machine.run_to_completion().unwrap();
        assert!(result.halted_naturally());
        assert_eq!(result.tape_string(), "00_");
    }
}
