use std::collections::BTreeSet;

use itertools::Itertools;

pub mod dfa;
pub mod document;
pub mod nfa;

/// Identifier of a state. States are named by the user, e.g. `q0`.
pub type StateId = String;

/// A set of states. Ordered so that frontiers, subsets and history records
/// compare, hash and print the same way every time.
pub type StateSet = BTreeSet<StateId>;

/// The marker used for epsilon moves in labels and in the transition matrix.
/// It is never part of an alphabet.
pub const EPSILON: char = 'ε';

/// An automaton that decides membership of finite words.
pub trait Language {
    /// The input symbols of the automaton, in declaration order.
    fn alphabet(&self) -> Vec<char>;

    fn accepts(&self, word: &[char]) -> bool;

    fn accepts_str(&self, word: &str) -> bool {
        self.accepts(&word.chars().collect_vec())
    }
}

/// Builds a [StateSet] from anything that yields state names.
pub fn state_set<I, S>(states: I) -> StateSet
where
    I: IntoIterator<Item = S>,
    S: Into<StateId>,
{
    states.into_iter().map(Into::into).collect()
}

/// Formats a state set as `{q0, q1}`.
pub fn format_state_set(states: &StateSet) -> String {
    format!("{{{}}}", states.iter().join(", "))
}
