use thiserror::Error;

use crate::automaton::StateId;

/// The automaton cannot be executed as it is currently defined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("automaton has no states")]
    NoStates,
    #[error("no start state defined")]
    NoStartState,
    #[error("start state `{0}` is not a declared state")]
    UnknownStartState(StateId),
}

/// Problems found while turning a JSON document back into an automaton.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not read automaton document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("alphabet symbol `{0}` must be exactly one character")]
    InvalidSymbol(String),
    #[error("the epsilon marker cannot be part of the alphabet")]
    EpsilonInAlphabet,
    #[error("malformed transition key `{0}`, expected `<state>,<symbol>`")]
    MalformedTransitionKey(String),
    #[error("transition `{0}` has no target states")]
    EmptyTargets(String),
    #[error("{context} references undeclared state `{state}`")]
    UnknownState { context: String, state: StateId },
}

/// Violations of the limits the simulator imposes on automata and inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("too many states: {count} (at most {max})")]
    TooManyStates { count: usize, max: usize },
    #[error("input is too long: {length} symbols (at most {max})")]
    InputTooLong { length: usize, max: usize },
    #[error("symbol `{0}` must be a single letter or digit")]
    InvalidSymbol(char),
    #[error("state name `{name}` is longer than {max} characters")]
    StateNameTooLong { name: String, max: usize },
    #[error("state name must not be empty")]
    EmptyStateName,
    #[error("state `{0}` already exists")]
    DuplicateState(StateId),
    #[error("symbol `{0}` already exists")]
    DuplicateSymbol(char),
}

/// A matrix-style edit referenced something the automaton does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("state `{0}` does not exist")]
    UnknownState(StateId),
    #[error("symbol `{0}` does not exist")]
    UnknownSymbol(char),
}

#[derive(Debug, Error)]
pub enum NfaError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Limit(#[from] LimitError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
