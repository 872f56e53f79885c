use crate::{
    automaton::{EPSILON, StateId, nfa::Nfa},
    config::LimitsConfig,
    error::{LimitError, NfaError},
};

impl LimitsConfig {
    pub fn check_symbol(&self, symbol: char) -> Result<(), LimitError> {
        if symbol == EPSILON
            || (*self.get_alphanumeric_symbols() && !symbol.is_ascii_alphanumeric())
        {
            return Err(LimitError::InvalidSymbol(symbol));
        }
        Ok(())
    }

    pub fn check_state_name(&self, name: &str) -> Result<(), LimitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LimitError::EmptyStateName);
        }
        if name.chars().count() > *self.get_max_state_name_length() {
            return Err(LimitError::StateNameTooLong {
                name: name.to_string(),
                max: *self.get_max_state_name_length(),
            });
        }
        Ok(())
    }

    /// Checks the length of an input word. Its symbols are not checked
    /// against the alphabet; unknown symbols simply have no moves.
    pub fn check_input(&self, input: &str) -> Result<(), LimitError> {
        let length = input.chars().count();
        if length > *self.get_max_input_length() {
            return Err(LimitError::InputTooLong {
                length,
                max: *self.get_max_input_length(),
            });
        }
        Ok(())
    }

    pub fn check_automaton(&self, nfa: &Nfa) -> Result<(), LimitError> {
        if nfa.state_count() > *self.get_max_states() {
            return Err(LimitError::TooManyStates {
                count: nfa.state_count(),
                max: *self.get_max_states(),
            });
        }
        for symbol in nfa.symbols() {
            self.check_symbol(symbol)?;
        }
        Ok(())
    }

    /// Adds a state the way the editor does: the name is trimmed and must be
    /// new, short enough, and fit under the state limit. Returns the name
    /// that was added.
    pub fn add_state(&self, nfa: &mut Nfa, name: &str) -> Result<StateId, LimitError> {
        self.check_state_name(name)?;
        let name = name.trim();
        if nfa.has_state(name) {
            return Err(LimitError::DuplicateState(name.to_string()));
        }
        if nfa.state_count() >= *self.get_max_states() {
            return Err(LimitError::TooManyStates {
                count: nfa.state_count() + 1,
                max: *self.get_max_states(),
            });
        }

        nfa.add_state_with_self_loops(name);
        Ok(name.to_string())
    }

    /// Adds a new symbol on which every state loops.
    pub fn add_symbol(&self, nfa: &mut Nfa, symbol: char) -> Result<(), LimitError> {
        self.check_symbol(symbol)?;
        if !nfa.add_symbol_with_self_loops(symbol) {
            return Err(LimitError::DuplicateSymbol(symbol));
        }
        Ok(())
    }

    /// Parses a saved automaton and checks it against the limits.
    pub fn load_automaton(&self, json: &str) -> Result<Nfa, NfaError> {
        let nfa = Nfa::from_json(json)?;
        self.check_automaton(&nfa)?;
        Ok(nfa)
    }
}
