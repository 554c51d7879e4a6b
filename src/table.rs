//! This module defines the `TransitionTable`, the two-level mapping from state and symbol
//! to the transition a deterministic machine applies.

use crate::types::{Transition, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

type RawTable = HashMap<String, HashMap<String, Transition>>;

/// The transition rules of a deterministic single-tape machine.
///
/// Each `(state, symbol)` pair maps to at most one `Transition`. A state may be present with
/// no transitions at all, which makes it an explicit halting state.
///
/// In JSON the table is an object of states, each an object of single-character symbols:
///
/// ```json
/// { "q0": { "1": ["0", "R", "q0"], "_": ["_", "R", "HALT"] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct TransitionTable {
    rules: HashMap<String, HashMap<char, Transition>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transition, replacing any previous one for the same state and symbol.
    pub fn insert(&mut self, state: impl Into<String>, symbol: char, transition: Transition) {
        self.rules
            .entry(state.into())
            .or_default()
            .insert(symbol, transition);
    }

    /// Builder form of [`TransitionTable::insert`].
    pub fn with(mut self, state: impl Into<String>, symbol: char, transition: Transition) -> Self {
        self.insert(state, symbol, transition);
        self
    }

    /// Declares `state` without adding any transition to it.
    pub fn add_state(&mut self, state: impl Into<String>) {
        self.rules.entry(state.into()).or_default();
    }

    /// Returns the transition for `state` reading `symbol`, if there is one.
    pub fn lookup(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Returns `true` if `state` is a key of the table.
    pub fn contains_state(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Returns `true` if `state` has at least one outgoing transition.
    pub fn has_transitions(&self, state: &str) -> bool {
        self.rules.get(state).is_some_and(|t| !t.is_empty())
    }

    /// Returns the states declared in the table, sorted.
    pub fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        states.sort_unstable();
        states
    }

    /// Returns the outgoing transitions of `state`, sorted by symbol.
    pub fn transitions(&self, state: &str) -> Vec<(char, &Transition)> {
        let mut transitions: Vec<(char, &Transition)> = self
            .rules
            .get(state)
            .map(|t| t.iter().map(|(&s, t)| (s, t)).collect())
            .unwrap_or_default();
        transitions.sort_unstable_by_key(|(symbol, _)| *symbol);
        transitions
    }

    /// Iterates over every `(state, symbol, transition)` triple in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char, &Transition)> {
        self.rules.iter().flat_map(|(state, transitions)| {
            transitions
                .iter()
                .map(move |(&symbol, t)| (state.as_str(), symbol, t))
        })
    }

    /// Returns the total number of transitions.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<RawTable> for TransitionTable {
    type Error = TuringMachineError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let mut table = TransitionTable::new();

        for (state, transitions) in raw {
            table.add_state(state.clone());
            for (symbol, transition) in transitions {
                table.insert(state.clone(), parse_symbol(&symbol)?, transition);
            }
        }

        Ok(table)
    }
}

impl From<TransitionTable> for RawTable {
    fn from(table: TransitionTable) -> Self {
        table
            .rules
            .into_iter()
            .map(|(state, transitions)| {
                let transitions = transitions
                    .into_iter()
                    .map(|(symbol, t)| (symbol.to_string(), t))
                    .collect();
                (state, transitions)
            })
            .collect()
    }
}

/// Parses a symbol that must consist of exactly one character.
pub fn parse_symbol(input: &str) -> Result<char, TuringMachineError> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TuringMachineError::InvalidSymbol(input.to_string())),
    }
}
