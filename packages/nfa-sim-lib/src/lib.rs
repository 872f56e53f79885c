pub mod automaton;
pub mod config;
pub mod error;
pub mod logger;
pub mod random;
pub mod simulation;
pub mod validation;
