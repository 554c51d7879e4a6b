//! Step observers receive every `StepEvent` a run emits and decide whether the run goes on.
//!
//! The run loop calls [`StepObserver::on_step`] after each step and before the next one, so an
//! observer that blocks (waiting for a key press, a channel message, a timer) paces the machine.

use crate::types::StepEvent;

/// The answer an observer gives after seeing a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Issue the next step.
    Continue,
    /// Stop the run before the next step.
    Stop,
}

/// Consumer of step events and source of the continue signal.
pub trait StepObserver {
    fn on_step(&mut self, event: &StepEvent) -> Control;
}

impl<F> StepObserver for F
where
    F: FnMut(&StepEvent) -> Control,
{
    fn on_step(&mut self, event: &StepEvent) -> Control {
        self(event)
    }
}

/// An observer that never pauses and never stops the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unobserved;

impl StepObserver for Unobserved {
    fn on_step(&mut self, _event: &StepEvent) -> Control {
        Control::Continue
    }
}
