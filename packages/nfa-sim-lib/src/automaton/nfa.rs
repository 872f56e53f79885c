use hashbrown::HashMap;
use indexmap::IndexSet;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    automaton::{EPSILON, Language, StateId, StateSet},
    error::{ConfigurationError, EditError},
    simulation::{RunResult, Simulation},
};

static NO_STATES: StateSet = StateSet::new();

/// A single edge of the automaton, as drawn by a visualizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Transition {
    pub from: StateId,
    /// `None` for an epsilon move.
    pub symbol: Option<char>,
    pub to: StateId,
}

impl Transition {
    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_none()
    }

    pub fn label(&self) -> char {
        self.symbol.unwrap_or(EPSILON)
    }
}

/// Summary counts shown once an automaton passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub states: usize,
    pub symbols: usize,
    pub symbol_transitions: usize,
    pub epsilon_transitions: usize,
    pub start_state: Option<StateId>,
    pub accept_states: usize,
}

/// A nondeterministic finite automaton with epsilon moves.
///
/// Transitions are stored as `state -> symbol -> targets`, epsilon moves as
/// `state -> targets`. Target sets are never empty: a missing entry means
/// there is no move.
///
/// Mutation is lenient. Adding a transition between states that were never
/// declared is accepted and reported by [Nfa::dangling_references]; such
/// states simply take part in runs under their name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfa {
    states: IndexSet<StateId>,
    alphabet: IndexSet<char>,
    transitions: HashMap<StateId, HashMap<char, StateSet>>,
    epsilon_transitions: HashMap<StateId, StateSet>,
    start_state: Option<StateId>,
    accept_states: StateSet,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// The automaton the simulator opens with. Alphabet `{0, 1}`, start `q0`,
    /// accepting `q2`, with an epsilon move from `q1` to `q3`. It has the same
    /// moves as the usual `q0..q3` walkthrough automaton but accepts in `q2`
    /// instead of `q3`, so it accepts `01` and rejects `0`.
    pub fn demo() -> Self {
        let mut nfa = Nfa::new();

        nfa.add_state("q0", true, false);
        nfa.add_state("q1", false, false);
        nfa.add_state("q2", false, true);
        nfa.add_state("q3", false, false);

        nfa.add_symbol('0');
        nfa.add_symbol('1');

        nfa.add_transition("q0", '0', "q1");
        nfa.add_transition("q0", '1', "q0");
        nfa.add_transition("q1", '1', "q2");
        nfa.add_transition("q2", '0', "q3");
        nfa.add_transition("q3", '0', "q0");

        nfa.add_epsilon_transition("q1", "q3");

        nfa
    }

    /// Registers a state. Adding an existing state again is harmless; the
    /// start flag of the last call that sets it wins.
    pub fn add_state(&mut self, name: impl Into<StateId>, is_start: bool, is_accept: bool) {
        let name = name.into();
        if is_start {
            self.start_state = Some(name.clone());
        }
        if is_accept {
            self.accept_states.insert(name.clone());
        }
        self.states.insert(name);
    }

    /// Adds a symbol to the alphabet. Returns whether it was newly added; the
    /// epsilon marker is never added.
    pub fn add_symbol(&mut self, symbol: char) -> bool {
        if symbol == EPSILON {
            return false;
        }
        self.alphabet.insert(symbol)
    }

    /// Adds `to` to the targets of `(from, symbol)`. Existing targets are kept,
    /// which is how several targets for one pair are expressed.
    pub fn add_transition(
        &mut self,
        from: impl Into<StateId>,
        symbol: char,
        to: impl Into<StateId>,
    ) {
        if symbol == EPSILON {
            self.add_epsilon_transition(from, to);
            return;
        }

        self.transitions
            .entry(from.into())
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to.into());
    }

    pub fn add_epsilon_transition(&mut self, from: impl Into<StateId>, to: impl Into<StateId>) {
        self.epsilon_transitions
            .entry(from.into())
            .or_default()
            .insert(to.into());
    }

    pub fn states(&self) -> impl Iterator<Item = &StateId> {
        self.states.iter()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    pub fn symbol_count(&self) -> usize {
        self.alphabet.len()
    }

    pub fn has_symbol(&self, symbol: char) -> bool {
        self.alphabet.contains(&symbol)
    }

    pub fn start_state(&self) -> Option<&str> {
        self.start_state.as_deref()
    }

    pub fn accept_states(&self) -> &StateSet {
        &self.accept_states
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Whether any state of `states` is accepting.
    pub fn contains_accepting(&self, states: &StateSet) -> bool {
        states.iter().any(|state| self.accept_states.contains(state))
    }

    /// The targets of `(state, symbol)`, empty if there is no such move.
    pub fn next_states(&self, state: &str, symbol: char) -> &StateSet {
        self.transitions
            .get(state)
            .and_then(|row| row.get(&symbol))
            .unwrap_or(&NO_STATES)
    }

    pub fn epsilon_targets(&self, state: &str) -> &StateSet {
        self.epsilon_transitions.get(state).unwrap_or(&NO_STATES)
    }

    /// Calculates the smallest superset of `states` that is closed under
    /// epsilon moves. A state enters the work stack only when it is first
    /// added to the result, so epsilon cycles terminate.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut stack = states.iter().cloned().collect_vec();

        while let Some(state) = stack.pop() {
            for target in self.epsilon_targets(&state) {
                if closure.insert(target.clone()) {
                    stack.push(target.clone());
                }
            }
        }

        closure
    }

    /// The union of the targets of every state in `states` on `symbol`,
    /// without epsilon closure.
    pub fn move_on(&self, states: &StateSet, symbol: char) -> StateSet {
        states
            .iter()
            .flat_map(|state| self.next_states(state, symbol))
            .cloned()
            .collect()
    }

    /// The epsilon closure of the start state, i.e. the frontier before any
    /// input has been read.
    pub fn initial_states(&self) -> Result<StateSet, ConfigurationError> {
        if self.states.is_empty() {
            return Err(ConfigurationError::NoStates);
        }

        let start = self
            .start_state
            .as_ref()
            .ok_or(ConfigurationError::NoStartState)?;

        if !self.states.contains(start) {
            return Err(ConfigurationError::UnknownStartState(start.clone()));
        }

        Ok(self.epsilon_closure(&StateSet::from([start.clone()])))
    }

    fn state_order(&self, state: &str) -> usize {
        self.states.get_index_of(state).unwrap_or(usize::MAX)
    }

    fn symbol_order(&self, symbol: char) -> usize {
        self.alphabet.get_index_of(&symbol).unwrap_or(usize::MAX)
    }

    /// Non-empty cells of the transition matrix, ordered by state and symbol
    /// declaration order. Undeclared states and symbols come last.
    pub fn transition_cells(&self) -> Vec<(&StateId, char, &StateSet)> {
        self.transitions
            .iter()
            .flat_map(|(from, row)| {
                row.iter()
                    .map(move |(symbol, targets)| (from, *symbol, targets))
            })
            .sorted_by_key(|&(from, symbol, _)| {
                (
                    self.state_order(from),
                    from.as_str(),
                    self.symbol_order(symbol),
                    symbol,
                )
            })
            .collect()
    }

    /// Non-empty cells of the epsilon column, in state declaration order.
    pub fn epsilon_cells(&self) -> Vec<(&StateId, &StateSet)> {
        self.epsilon_transitions
            .iter()
            .sorted_by_key(|&(from, _)| (self.state_order(from), from.as_str()))
            .collect()
    }

    /// Every edge of the automaton, symbol moves first, then epsilon moves.
    pub fn all_transitions(&self) -> Vec<Transition> {
        let symbol_moves = self
            .transition_cells()
            .into_iter()
            .flat_map(|(from, symbol, targets)| {
                targets.iter().map(move |to| Transition {
                    from: from.clone(),
                    symbol: Some(symbol),
                    to: to.clone(),
                })
            });

        let epsilon_moves = self
            .epsilon_cells()
            .into_iter()
            .flat_map(|(from, targets)| {
                targets.iter().map(move |to| Transition {
                    from: from.clone(),
                    symbol: None,
                    to: to.clone(),
                })
            });

        symbol_moves.chain(epsilon_moves).collect()
    }

    /// Problems that keep the automaton from being usable. Missing moves are
    /// not a problem: a state without a move on a symbol is a dead end.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = vec![];

        if self.start_state.is_none() {
            problems.push("no start state defined".to_string());
        }

        if self.accept_states.is_empty() {
            problems.push("no accept states defined".to_string());
        }

        problems
    }

    /// References to states that were never declared.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut problems = vec![];

        if let Some(start) = &self.start_state
            && !self.has_state(start)
        {
            problems.push(format!("start state `{start}` is not declared"));
        }

        for state in self.accept_states.iter().filter(|s| !self.has_state(s)) {
            problems.push(format!("accept state `{state}` is not declared"));
        }

        for (from, symbol, targets) in self.transition_cells() {
            if !self.has_state(from) {
                problems.push(format!(
                    "transition ({from}, {symbol}) starts at undeclared state `{from}`"
                ));
            }
            for to in targets.iter().filter(|to| !self.has_state(to)) {
                problems.push(format!(
                    "transition ({from}, {symbol}) targets undeclared state `{to}`"
                ));
            }
        }

        for (from, targets) in self.epsilon_cells() {
            if !self.has_state(from) {
                problems.push(format!(
                    "transition ({from}, {EPSILON}) starts at undeclared state `{from}`"
                ));
            }
            for to in targets.iter().filter(|to| !self.has_state(to)) {
                problems.push(format!(
                    "transition ({from}, {EPSILON}) targets undeclared state `{to}`"
                ));
            }
        }

        problems
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            states: self.states.len(),
            symbols: self.alphabet.len(),
            symbol_transitions: self
                .transitions
                .values()
                .flat_map(|row| row.values())
                .map(|targets| targets.len())
                .sum(),
            epsilon_transitions: self.epsilon_transitions.values().map(|t| t.len()).sum(),
            start_state: self.start_state.clone(),
            accept_states: self.accept_states.len(),
        }
    }

    pub fn set_start_state(&mut self, state: &str) -> Result<(), EditError> {
        if !self.has_state(state) {
            return Err(EditError::UnknownState(state.to_string()));
        }
        self.start_state = Some(state.to_string());
        Ok(())
    }

    pub fn set_accepting(&mut self, state: &str, accepting: bool) -> Result<(), EditError> {
        if !self.has_state(state) {
            return Err(EditError::UnknownState(state.to_string()));
        }
        if accepting {
            self.accept_states.insert(state.to_string());
        } else {
            self.accept_states.remove(state);
        }
        Ok(())
    }

    /// The name the editor proposes for the next state, `q<N>` for the
    /// smallest free `N` starting at the current state count.
    pub fn next_state_name(&self) -> StateId {
        (self.states.len()..)
            .map(|n| format!("q{n}"))
            .find(|name| !self.has_state(name))
            .unwrap_or_default()
    }

    /// Adds a state that loops on every symbol of the alphabet.
    pub fn add_state_with_self_loops(&mut self, name: impl Into<StateId>) {
        let name = name.into();
        self.add_state(name.clone(), false, false);
        for symbol in self.alphabet.clone() {
            self.add_transition(name.clone(), symbol, name.clone());
        }
    }

    /// Adds a symbol on which every state loops. Returns whether the symbol
    /// was newly added.
    pub fn add_symbol_with_self_loops(&mut self, symbol: char) -> bool {
        if !self.add_symbol(symbol) {
            return false;
        }
        for state in self.states.clone() {
            self.add_transition(state.clone(), symbol, state);
        }
        true
    }

    /// Removes a state together with every move from or to it. If it was the
    /// start state, the first remaining state becomes the start.
    pub fn remove_state(&mut self, state: &str) -> bool {
        if !self.states.shift_remove(state) {
            return false;
        }

        self.accept_states.remove(state);
        if self.start_state.as_deref() == Some(state) {
            self.start_state = self.states.first().cloned();
        }

        self.transitions.remove(state);
        for row in self.transitions.values_mut() {
            for targets in row.values_mut() {
                targets.remove(state);
            }
            row.retain(|_, targets| !targets.is_empty());
        }
        self.transitions.retain(|_, row| !row.is_empty());

        self.epsilon_transitions.remove(state);
        for targets in self.epsilon_transitions.values_mut() {
            targets.remove(state);
        }
        self.epsilon_transitions
            .retain(|_, targets| !targets.is_empty());

        true
    }

    /// Removes a symbol and every move on it.
    pub fn remove_symbol(&mut self, symbol: char) -> bool {
        if !self.alphabet.shift_remove(&symbol) {
            return false;
        }

        for row in self.transitions.values_mut() {
            row.remove(&symbol);
        }
        self.transitions.retain(|_, row| !row.is_empty());

        true
    }

    fn checked_targets<I, S>(&self, targets: I) -> Result<StateSet, EditError>
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        let targets: StateSet = targets.into_iter().map(Into::into).collect();
        match targets.iter().find(|target| !self.has_state(target)) {
            Some(unknown) => Err(EditError::UnknownState(unknown.clone())),
            None => Ok(targets),
        }
    }

    /// Replaces the targets of one matrix cell. An empty list clears the
    /// cell. Nothing changes if a target is not a declared state.
    pub fn set_transition_targets<I, S>(
        &mut self,
        from: &str,
        symbol: char,
        targets: I,
    ) -> Result<(), EditError>
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        if symbol == EPSILON {
            return self.set_epsilon_targets(from, targets);
        }
        if !self.has_state(from) {
            return Err(EditError::UnknownState(from.to_string()));
        }
        if !self.has_symbol(symbol) {
            return Err(EditError::UnknownSymbol(symbol));
        }

        let targets = self.checked_targets(targets)?;
        let row = self.transitions.entry(from.to_string()).or_default();
        if targets.is_empty() {
            row.remove(&symbol);
        } else {
            row.insert(symbol, targets);
        }
        if row.is_empty() {
            self.transitions.remove(from);
        }

        Ok(())
    }

    /// Replaces the epsilon targets of a state. An empty list clears them.
    pub fn set_epsilon_targets<I, S>(&mut self, from: &str, targets: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        if !self.has_state(from) {
            return Err(EditError::UnknownState(from.to_string()));
        }

        let targets = self.checked_targets(targets)?;
        if targets.is_empty() {
            self.epsilon_transitions.remove(from);
        } else {
            self.epsilon_transitions.insert(from.to_string(), targets);
        }

        Ok(())
    }

    pub fn clear_epsilon_transitions(&mut self) {
        self.epsilon_transitions.clear();
    }

    /// Starts a new step-wise run over this automaton. The automaton stays
    /// borrowed, and therefore unchanged, for as long as the run lives.
    pub fn simulate(&self) -> Simulation<'_> {
        Simulation::new(self)
    }

    /// Runs the whole input and reports the verdict.
    pub fn run(&self, input: &str) -> Result<RunResult, ConfigurationError> {
        self.simulate().run(input)
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        dot.push_str(&format!(
            "node [shape = doublecircle]; {};\n",
            self.accept_states
                .iter()
                .map(|state| format!("{state:?}"))
                .join(" ")
        ));
        dot.push_str("node [shape = circle];\n");

        if let Some(start) = &self.start_state {
            dot.push_str(&format!("START -> {start:?};\n"));
        }

        for transition in self.all_transitions() {
            dot.push_str(&format!(
                "{:?} -> {:?} [ label=\"{}\" ];\n",
                transition.from,
                transition.to,
                transition.label()
            ));
        }

        dot.push_str("}\n");

        dot
    }
}

impl Language for Nfa {
    fn alphabet(&self) -> Vec<char> {
        self.alphabet.iter().copied().collect()
    }

    fn accepts(&self, word: &[char]) -> bool {
        let Ok(mut current) = self.initial_states() else {
            return false;
        };

        for &symbol in word {
            if current.is_empty() {
                break;
            }
            current = self.epsilon_closure(&self.move_on(&current, symbol));
        }

        self.contains_accepting(&current)
    }
}
