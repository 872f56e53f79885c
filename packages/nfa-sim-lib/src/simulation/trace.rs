use serde::Serialize;

use crate::{
    automaton::{StateSet, nfa::Nfa},
    error::ConfigurationError,
    simulation::StepOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// Number of symbols read when this frontier was reached.
    pub index: usize,
    /// The symbol that led here, `None` for the initial closure.
    pub symbol: Option<char>,
    pub active: StateSet,
}

/// The frontier after every prefix of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
    pub accepted: bool,
}

impl Trace {
    pub fn final_states(&self) -> Option<&StateSet> {
        self.steps.last().map(|step| &step.active)
    }
}

impl Nfa {
    /// Simulates the whole word and records the frontier after each symbol,
    /// starting with the closure of the start state. Dead branches do not
    /// stop the trace; the frontier just stays empty.
    pub fn trace(&self, input: &str) -> Result<Trace, ConfigurationError> {
        let mut simulation = self.simulate();
        let mut steps = vec![];

        loop {
            let outcome = simulation.step(input)?;
            match outcome {
                StepOutcome::Initialized { current_states, .. } => steps.push(TraceStep {
                    index: 0,
                    symbol: None,
                    active: current_states,
                }),
                StepOutcome::Advanced { .. } | StepOutcome::AllPathsTerminated { .. } => {
                    let symbol = simulation.history().last().map(|record| record.symbol);
                    steps.push(TraceStep {
                        index: simulation.position(),
                        symbol,
                        active: outcome.current_states().clone(),
                    })
                }
                StepOutcome::Finished { accepted, .. } => return Ok(Trace { steps, accepted }),
            }
        }
    }
}
