use serde::{Deserialize, Serialize};

use crate::{
    automaton::{EPSILON, StateId, nfa::Nfa},
    error::DocumentError,
};

pub const DOCUMENT_VERSION: &str = "2.0-nfa";

/// The JSON shape an automaton is saved in.
///
/// Symbol transitions are `["<state>,<symbol>", [targets...]]` pairs, epsilon
/// transitions are `["<state>", [targets...]]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfaDocument {
    pub states: Vec<StateId>,
    pub alphabet: Vec<String>,
    pub transitions: Vec<(String, Vec<StateId>)>,
    pub epsilon_transitions: Vec<(StateId, Vec<StateId>)>,
    pub start_state: Option<StateId>,
    pub accept_states: Vec<StateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Splits a `"<state>,<symbol>"` key. The symbol is the last character and
/// must follow a comma, so both state names and the symbol may be commas.
pub fn split_transition_key(key: &str) -> Result<(&str, char), DocumentError> {
    let malformed = || DocumentError::MalformedTransitionKey(key.to_string());

    let (index, symbol) = key.char_indices().next_back().ok_or_else(malformed)?;
    let state = key[..index].strip_suffix(',').ok_or_else(malformed)?;
    if state.is_empty() || symbol == EPSILON {
        return Err(malformed());
    }
    Ok((state, symbol))
}

pub fn transition_key(state: &str, symbol: char) -> String {
    format!("{state},{symbol}")
}

impl From<&Nfa> for NfaDocument {
    fn from(nfa: &Nfa) -> Self {
        NfaDocument {
            states: nfa.states().cloned().collect(),
            alphabet: nfa.symbols().map(|symbol| symbol.to_string()).collect(),
            transitions: nfa
                .transition_cells()
                .into_iter()
                .map(|(from, symbol, targets)| {
                    (
                        transition_key(from, symbol),
                        targets.iter().cloned().collect(),
                    )
                })
                .collect(),
            epsilon_transitions: nfa
                .epsilon_cells()
                .into_iter()
                .map(|(from, targets)| (from.clone(), targets.iter().cloned().collect()))
                .collect(),
            start_state: nfa.start_state().map(str::to_string),
            accept_states: nfa.accept_states().iter().cloned().collect(),
            version: Some(DOCUMENT_VERSION.to_string()),
        }
    }
}

impl TryFrom<NfaDocument> for Nfa {
    type Error = DocumentError;

    /// Rebuilds the automaton, refusing anything that references a state the
    /// document does not declare.
    fn try_from(document: NfaDocument) -> Result<Self, Self::Error> {
        let mut nfa = Nfa::new();

        for state in &document.states {
            nfa.add_state(state.clone(), false, false);
        }

        let require_state = |context: &str, state: &str| {
            if declares(&document.states, state) {
                Ok(())
            } else {
                Err(DocumentError::UnknownState {
                    context: context.to_string(),
                    state: state.to_string(),
                })
            }
        };

        for symbol in &document.alphabet {
            let mut chars = symbol.chars();
            match (chars.next(), chars.next()) {
                (Some(EPSILON), None) => return Err(DocumentError::EpsilonInAlphabet),
                (Some(c), None) => {
                    nfa.add_symbol(c);
                }
                _ => return Err(DocumentError::InvalidSymbol(symbol.clone())),
            }
        }

        for (key, targets) in &document.transitions {
            let (from, symbol) = split_transition_key(key)?;
            if targets.is_empty() {
                return Err(DocumentError::EmptyTargets(key.clone()));
            }
            require_state(&format!("transition `{key}`"), from)?;
            for to in targets {
                require_state(&format!("transition `{key}`"), to)?;
                nfa.add_transition(from, symbol, to.clone());
            }
        }

        for (from, targets) in &document.epsilon_transitions {
            let key = format!("{from},{EPSILON}");
            if targets.is_empty() {
                return Err(DocumentError::EmptyTargets(key));
            }
            require_state(&format!("transition `{key}`"), from)?;
            for to in targets {
                require_state(&format!("transition `{key}`"), to)?;
                nfa.add_epsilon_transition(from.clone(), to.clone());
            }
        }

        if let Some(start) = &document.start_state {
            require_state("start state", start)?;
            nfa.add_state(start.clone(), true, false);
        }

        for state in &document.accept_states {
            require_state("accept state", state)?;
            nfa.add_state(state.clone(), false, true);
        }

        Ok(nfa)
    }
}

fn declares(states: &[StateId], state: &str) -> bool {
    states.iter().any(|s| s == state)
}

/// The first reference to a state `nfa` does not declare, as a load error.
fn first_undeclared(nfa: &Nfa) -> Option<DocumentError> {
    let unknown = |context: String, state: &str| DocumentError::UnknownState {
        context,
        state: state.to_string(),
    };

    if let Some(start) = nfa.start_state()
        && !nfa.has_state(start)
    {
        return Some(unknown("start state".to_string(), start));
    }
    if let Some(state) = nfa.accept_states().iter().find(|s| !nfa.has_state(s)) {
        return Some(unknown("accept state".to_string(), state));
    }

    let symbol_cells = nfa
        .transition_cells()
        .into_iter()
        .map(|(from, symbol, targets)| (from, transition_key(from, symbol), targets));
    let epsilon_cells = nfa
        .epsilon_cells()
        .into_iter()
        .map(|(from, targets)| (from, transition_key(from, EPSILON), targets));

    symbol_cells.chain(epsilon_cells).find_map(|(from, key, targets)| {
        std::iter::once(from)
            .chain(targets)
            .find(|state| !nfa.has_state(state))
            .map(|state| unknown(format!("transition `{key}`"), state))
    })
}

impl Nfa {
    /// The document for this automaton. Fails if the automaton references a
    /// state it does not declare, since such a document would not load.
    pub fn to_document(&self) -> Result<NfaDocument, DocumentError> {
        match first_undeclared(self) {
            Some(error) => Err(error),
            None => Ok(NfaDocument::from(self)),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: NfaDocument = serde_json::from_str(json)?;
        Nfa::try_from(document)
    }

    pub fn to_json_file(&self, path: &str) -> anyhow::Result<()> {
        Ok(std::fs::write(path, self.to_json()?)?)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}
