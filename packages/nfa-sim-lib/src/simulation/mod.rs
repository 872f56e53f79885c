use serde::Serialize;

use crate::{
    automaton::{StateSet, format_state_set, nfa::Nfa},
    error::ConfigurationError,
};

pub mod trace;

static NO_STATES: StateSet = StateSet::new();

/// Where a run currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has happened since the last reset.
    Uninitialized,
    /// The frontier is known and `position` symbols have been read.
    Running { current: StateSet, position: usize },
    /// The whole input has been read and the verdict is fixed.
    Finished {
        current: StateSet,
        position: usize,
        accepted: bool,
    },
}

/// What a single call to [Simulation::step] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepOutcome {
    /// The frontier was set to the closure of the start state. No input was
    /// read.
    Initialized {
        current_states: StateSet,
        position: usize,
    },
    /// One symbol was read and at least one branch survived.
    Advanced {
        current_states: StateSet,
        position: usize,
    },
    /// One symbol was read and no branch had a move on it. The read head
    /// still advanced.
    AllPathsTerminated { position: usize },
    /// The input is exhausted.
    Finished {
        accepted: bool,
        current_states: StateSet,
    },
}

impl StepOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, StepOutcome::Finished { .. })
    }

    pub fn all_paths_terminated(&self) -> bool {
        matches!(self, StepOutcome::AllPathsTerminated { .. })
    }

    /// The verdict, once the run is finished.
    pub fn accepted(&self) -> Option<bool> {
        match self {
            StepOutcome::Finished { accepted, .. } => Some(*accepted),
            _ => None,
        }
    }

    pub fn current_states(&self) -> &StateSet {
        match self {
            StepOutcome::Initialized { current_states, .. }
            | StepOutcome::Advanced { current_states, .. }
            | StepOutcome::Finished { current_states, .. } => current_states,
            StepOutcome::AllPathsTerminated { .. } => &NO_STATES,
        }
    }
}

/// One consumed symbol in the history of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub from_states: StateSet,
    pub symbol: char,
    pub to_states: StateSet,
    /// Index of `symbol` in the input.
    pub position: usize,
    pub terminated: bool,
}

impl StepRecord {
    pub fn to_fancy_string(&self) -> String {
        let arrow = if self.terminated { "-x->" } else { "-->" };
        format!(
            "{} --{}{} {}",
            format_state_set(&self.from_states),
            self.symbol,
            arrow,
            format_state_set(&self.to_states)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub accepted: bool,
    pub final_states: StateSet,
}

/// A step-wise execution of an [Nfa] over an input string.
///
/// The caller passes the input on every call to [Simulation::step], the way
/// a controller that owns the text field would. Positions count `char`s.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    nfa: &'a Nfa,
    phase: Phase,
    history: Vec<StepRecord>,
}

impl<'a> Simulation<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Simulation {
            nfa,
            phase: Phase::Uninitialized,
            history: vec![],
        }
    }

    pub fn nfa(&self) -> &'a Nfa {
        self.nfa
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The frontier. Empty before initialization and after every branch died.
    pub fn current_states(&self) -> &StateSet {
        match &self.phase {
            Phase::Uninitialized => &NO_STATES,
            Phase::Running { current, .. } | Phase::Finished { current, .. } => current,
        }
    }

    /// Number of symbols read so far.
    pub fn position(&self) -> usize {
        match &self.phase {
            Phase::Uninitialized => 0,
            Phase::Running { position, .. } | Phase::Finished { position, .. } => *position,
        }
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Uninitialized;
        self.history.clear();
    }

    /// Advances the run by one event: initialization, one symbol, or the
    /// final verdict. Once finished, further calls return the same verdict
    /// and change nothing.
    pub fn step(&mut self, input: &str) -> Result<StepOutcome, ConfigurationError> {
        match &self.phase {
            Phase::Uninitialized => {
                let current = self.nfa.initial_states()?;
                tracing::debug!("Initialized at {}", format_state_set(&current));

                self.phase = Phase::Running {
                    current: current.clone(),
                    position: 0,
                };

                Ok(StepOutcome::Initialized {
                    current_states: current,
                    position: 0,
                })
            }
            Phase::Running { current, position } => {
                let position = *position;

                let Some(symbol) = input.chars().nth(position) else {
                    let accepted = self.nfa.contains_accepting(current);
                    let current = current.clone();
                    tracing::debug!(
                        "Finished after {} symbols in {}: {}",
                        position,
                        format_state_set(&current),
                        if accepted { "accepted" } else { "rejected" }
                    );

                    self.phase = Phase::Finished {
                        current: current.clone(),
                        position,
                        accepted,
                    };

                    return Ok(StepOutcome::Finished {
                        accepted,
                        current_states: current,
                    });
                };

                let raw_next = self.nfa.move_on(current, symbol);
                let terminated = raw_next.is_empty();
                let next = if terminated {
                    StateSet::new()
                } else {
                    self.nfa.epsilon_closure(&raw_next)
                };

                let record = StepRecord {
                    from_states: current.clone(),
                    symbol,
                    to_states: next.clone(),
                    position,
                    terminated,
                };
                tracing::trace!("Step {}: {}", position, record.to_fancy_string());
                if terminated && !current.is_empty() {
                    tracing::debug!("All paths terminated on `{}` at {}", symbol, position);
                }

                self.history.push(record);
                self.phase = Phase::Running {
                    current: next.clone(),
                    position: position + 1,
                };

                if terminated {
                    Ok(StepOutcome::AllPathsTerminated {
                        position: position + 1,
                    })
                } else {
                    Ok(StepOutcome::Advanced {
                        current_states: next,
                        position: position + 1,
                    })
                }
            }
            Phase::Finished {
                current, accepted, ..
            } => Ok(StepOutcome::Finished {
                accepted: *accepted,
                current_states: current.clone(),
            }),
        }
    }

    /// Resets, then steps until the input is exhausted.
    pub fn run(&mut self, input: &str) -> Result<RunResult, ConfigurationError> {
        self.reset();

        loop {
            if let StepOutcome::Finished {
                accepted,
                current_states,
            } = self.step(input)?
            {
                return Ok(RunResult {
                    accepted,
                    final_states: current_states,
                });
            }
        }
    }
}
