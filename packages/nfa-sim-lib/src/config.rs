use nfa_sim_macros::config;

use crate::logger::LogLevel;

/// Resolves a possibly missing value from a partial config against its
/// default. Nested sections resolve through their own `from_partial`.
pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        /// Also write the log to `./logs/nfa_sim_<timestamp>.txt`.
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Limits the editor and the command line enforce. The engine itself
    /// works with automata and inputs of any size.
    pub struct LimitsConfig {
        max_states: usize = 8,
        max_input_length: usize = 20,
        max_state_name_length: usize = 16,
        /// Only accept ASCII letters and digits as alphabet symbols.
        alphanumeric_symbols: bool = true,
    }
}

config! {
    pub struct SimulatorConfig {
        limits: LimitsConfig (Option<PartialLimitsConfig> = LimitsConfig::default()),
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}
