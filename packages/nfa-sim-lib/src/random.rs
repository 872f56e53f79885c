use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::automaton::nfa::Nfa;

pub struct RandomOptions {
    pub seed: u64,
    pub state_count: usize,
    pub alphabet: Vec<char>,
    /// Chance that a given `(state, symbol, target)` move exists.
    pub transition_density: f64,
    /// Chance that a given epsilon move exists.
    pub epsilon_density: f64,
    pub accept_probability: f64,
}

impl Default for RandomOptions {
    fn default() -> Self {
        RandomOptions {
            seed: 1,
            state_count: 4,
            alphabet: vec!['0', '1'],
            transition_density: 0.25,
            epsilon_density: 0.1,
            accept_probability: 0.3,
        }
    }
}

impl RandomOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_state_count(mut self, state_count: usize) -> Self {
        self.state_count = state_count;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Vec<char>) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_epsilon_density(mut self, epsilon_density: f64) -> Self {
        self.epsilon_density = epsilon_density;
        self
    }
}

/// Generates a random automaton with states `q0..qN`, start `q0`.
pub fn generate_random_nfa(options: &RandomOptions) -> Nfa {
    let mut r = StdRng::seed_from_u64(options.seed);
    generate_with(&mut r, options)
}

/// Generates `count` automata from consecutive draws of one generator.
pub fn generate_random_nfas(options: &RandomOptions, count: usize) -> Vec<Nfa> {
    let mut r = StdRng::seed_from_u64(options.seed);
    (0..count).map(|_| generate_with(&mut r, options)).collect()
}

fn generate_with(r: &mut StdRng, options: &RandomOptions) -> Nfa {
    let mut nfa = Nfa::new();
    let states = (0..options.state_count)
        .map(|i| format!("q{i}"))
        .collect::<Vec<_>>();

    for (i, state) in states.iter().enumerate() {
        nfa.add_state(state.clone(), i == 0, r.random_bool(options.accept_probability));
    }
    for &symbol in &options.alphabet {
        nfa.add_symbol(symbol);
    }

    for from in &states {
        for &symbol in &options.alphabet {
            for to in &states {
                if r.random_bool(options.transition_density) {
                    nfa.add_transition(from.clone(), symbol, to.clone());
                }
            }
        }
        for to in &states {
            if from != to && r.random_bool(options.epsilon_density) {
                nfa.add_epsilon_transition(from.clone(), to.clone());
            }
        }
    }

    nfa
}
