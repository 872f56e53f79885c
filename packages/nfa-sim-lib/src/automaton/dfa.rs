use std::collections::{BTreeMap, VecDeque};

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::Serialize;

use crate::{
    automaton::{Language, StateId, StateSet, nfa::Nfa},
    error::ConfigurationError,
};

/// A state of a [Dfa] built by subset construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DfaState {
    pub name: StateId,
    /// The NFA states this state stands for.
    pub subset: StateSet,
    pub accepting: bool,
}

/// One symbol of a [DfaRun]. `state` is `None` once the run fell off a
/// missing transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaRunStep {
    pub index: usize,
    pub symbol: Option<char>,
    pub state: Option<StateId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaRun {
    pub steps: Vec<DfaRunStep>,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "word", rename_all = "camelCase")]
pub enum Equivalence {
    Equivalent,
    /// A shortest word accepted by exactly one of the two automata.
    Counterexample(String),
}

impl Equivalence {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Equivalence::Equivalent)
    }
}

/// A deterministic, possibly partial, finite automaton. A missing transition
/// rejects.
#[derive(Debug, Clone)]
pub struct Dfa {
    start: Option<NodeIndex>,
    pub graph: DiGraph<DfaState, char>,
    alphabet: Vec<char>,
}

impl Dfa {
    pub fn new(alphabet: Vec<char>) -> Self {
        Dfa {
            start: None,
            graph: DiGraph::new(),
            alphabet,
        }
    }

    pub fn add_state(&mut self, state: DfaState) -> NodeIndex {
        self.graph.add_node(state)
    }

    pub fn set_start(&mut self, start: NodeIndex) {
        self.start = Some(start);
    }

    pub fn start(&self) -> Option<NodeIndex> {
        self.start
    }

    /// Sets the transition of `from` on `symbol`, replacing an existing one.
    pub fn set_transition(&mut self, from: NodeIndex, symbol: char, to: NodeIndex) {
        if let Some(edge) = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|edge| *edge.weight() == symbol)
            .map(|edge| edge.id())
        {
            self.graph.remove_edge(edge);
        }
        self.graph.add_edge(from, to, symbol);
    }

    pub fn next(&self, from: NodeIndex, symbol: char) -> Option<NodeIndex> {
        self.graph
            .edges_directed(from, Direction::Outgoing)
            .find(|edge| *edge.weight() == symbol)
            .map(|edge| edge.target())
    }

    pub fn state(&self, node: NodeIndex) -> &DfaState {
        &self.graph[node]
    }

    pub fn state_by_name(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&node| self.graph[node].name == name)
    }

    pub fn states(&self) -> impl Iterator<Item = &DfaState> {
        self.graph.node_weights()
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All transitions as `(from, symbol, to)` names, ordered by source state
    /// and alphabet position.
    pub fn transitions(&self) -> Vec<(StateId, char, StateId)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    edge.source(),
                    *edge.weight(),
                    self.graph[edge.target()].name.clone(),
                )
            })
            .sorted_by_key(|(source, symbol, _)| {
                (
                    source.index(),
                    self.alphabet
                        .iter()
                        .position(|s| s == symbol)
                        .unwrap_or(usize::MAX),
                )
            })
            .map(|(source, symbol, target)| (self.graph[source].name.clone(), symbol, target))
            .collect()
    }

    pub fn run(&self, input: &str) -> DfaRun {
        let mut current = self.start;
        let mut steps = vec![DfaRunStep {
            index: 0,
            symbol: None,
            state: current.map(|node| self.graph[node].name.clone()),
        }];

        for (i, symbol) in input.chars().enumerate() {
            let Some(node) = current else {
                break;
            };
            current = self.next(node, symbol);
            steps.push(DfaRunStep {
                index: i + 1,
                symbol: Some(symbol),
                state: current.map(|node| self.graph[node].name.clone()),
            });
        }

        let accepted = current.is_some_and(|node| self.graph[node].accepting);
        DfaRun { steps, accepted }
    }

    /// Searches state pairs breadth-first for a word on which the two
    /// automata disagree. A missing transition leads to an implicit
    /// rejecting sink, so partial automata compare correctly.
    pub fn equivalent(&self, other: &Dfa) -> Equivalence {
        let alphabet = self
            .alphabet
            .iter()
            .chain(other.alphabet.iter())
            .copied()
            .unique()
            .collect_vec();

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([((self.start, other.start), String::new())]);

        while let Some(((p, q), word)) = queue.pop_front() {
            if !visited.insert((p, q)) {
                continue;
            }

            let accepting_a = p.is_some_and(|node| self.graph[node].accepting);
            let accepting_b = q.is_some_and(|node| other.graph[node].accepting);
            if accepting_a != accepting_b {
                return Equivalence::Counterexample(word);
            }

            if p.is_none() && q.is_none() {
                continue;
            }

            for &symbol in &alphabet {
                let next_p = p.and_then(|node| self.next(node, symbol));
                let next_q = q.and_then(|node| other.next(node, symbol));
                let mut next_word = word.clone();
                next_word.push(symbol);
                queue.push_back(((next_p, next_q), next_word));
            }
        }

        Equivalence::Equivalent
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
            self.states()
                .filter(|state| state.accepting)
                .map(|state| format!("{:?}", state.name))
                .join(" ")
        ));
        dot.push_str("node [shape = circle];\n");

        if let Some(start) = self.start {
            dot.push_str(&format!("START -> {:?};\n", self.graph[start].name));
        }

        for (from, symbol, to) in self.transitions() {
            dot.push_str(&format!("{from:?} -> {to:?} [ label=\"{symbol}\" ];\n"));
        }

        dot.push_str("}\n");

        dot
    }

    pub fn to_document(&self) -> DfaDocument {
        DfaDocument {
            alphabet: self.alphabet.iter().map(|s| s.to_string()).collect(),
            states: self
                .graph
                .node_indices()
                .map(|node| DfaDocumentState {
                    id: self.graph[node].name.clone(),
                    start: self.start == Some(node),
                    accepting: self.graph[node].accepting,
                })
                .collect(),
            transitions: self
                .transitions()
                .into_iter()
                .map(|(from, symbol, to)| DfaDocumentTransition { from, to, symbol })
                .collect(),
            subset: self
                .states()
                .map(|state| (state.name.clone(), state.subset.clone()))
                .collect(),
        }
    }
}

impl Language for Dfa {
    fn alphabet(&self) -> Vec<char> {
        self.alphabet.clone()
    }

    fn accepts(&self, word: &[char]) -> bool {
        let mut current = self.start;
        for &symbol in word {
            current = current.and_then(|node| self.next(node, symbol));
        }
        current.is_some_and(|node| self.graph[node].accepting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaDocumentState {
    pub id: StateId,
    pub start: bool,
    #[serde(rename = "final")]
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaDocumentTransition {
    pub from: StateId,
    pub to: StateId,
    #[serde(rename = "sym")]
    pub symbol: char,
}

/// Export shape of a determinized automaton, including the subset table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaDocument {
    pub alphabet: Vec<String>,
    pub states: Vec<DfaDocumentState>,
    pub transitions: Vec<DfaDocumentTransition>,
    pub subset: BTreeMap<StateId, StateSet>,
}

/// Name of the `index`-th discovered subset: `A` to `Z`, then `A1` to `Z1`
/// and so on.
fn subset_name(index: usize) -> StateId {
    let letter = (b'A' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{letter}{round}"),
    }
}

impl Nfa {
    /// Determinizes the automaton by subset construction.
    pub fn determinize(&self) -> Result<Dfa, ConfigurationError> {
        self.determinize_with(|_, _, _| {})
    }

    /// Determinizes the automaton by subset construction. Subsets are
    /// explored breadth-first starting at the closure of the start state and
    /// named in discovery order. `on_move` sees every explored
    /// `(subset, symbol, target subset)` triple, including empty targets,
    /// which do not become states: the result is a partial DFA.
    pub fn determinize_with(
        &self,
        mut on_move: impl FnMut(&StateSet, char, &StateSet),
    ) -> Result<Dfa, ConfigurationError> {
        let alphabet = self.symbols().collect_vec();
        let mut dfa = Dfa::new(alphabet.clone());
        let mut state_map = HashMap::new();

        let start_set = self.initial_states()?;
        let start = dfa.add_state(DfaState {
            name: subset_name(0),
            accepting: self.contains_accepting(&start_set),
            subset: start_set.clone(),
        });
        dfa.set_start(start);
        state_map.insert(start_set.clone(), start);

        let mut queue = VecDeque::from([start_set]);

        while let Some(subset) = queue.pop_front() {
            let source = state_map[&subset];

            for &symbol in &alphabet {
                let target_set = self.epsilon_closure(&self.move_on(&subset, symbol));
                on_move(&subset, symbol, &target_set);

                if target_set.is_empty() {
                    continue;
                }

                let target = match state_map.get(&target_set) {
                    Some(&node) => node,
                    None => {
                        let node = dfa.add_state(DfaState {
                            name: subset_name(state_map.len()),
                            accepting: self.contains_accepting(&target_set),
                            subset: target_set.clone(),
                        });
                        state_map.insert(target_set.clone(), node);
                        queue.push_back(target_set);
                        node
                    }
                };

                dfa.set_transition(source, symbol, target);
            }
        }

        tracing::debug!(
            "Determinized {} NFA states into {} DFA states",
            self.state_count(),
            dfa.state_count()
        );

        Ok(dfa)
    }
}

#[cfg(test)]
mod tests {
    use super::subset_name;

    #[test]
    fn subset_names_stay_unique_after_z() {
        assert_eq!(subset_name(0), "A");
        assert_eq!(subset_name(25), "Z");
        assert_eq!(subset_name(26), "A1");
        assert_eq!(subset_name(53), "B2");
    }
}
