use std::{fmt::Display, fs::File, path::PathBuf, str::FromStr, sync::Mutex};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" | "trc" => Ok(LogLevel::Trace),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "Trace"),
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Where the log file for a run started now is written.
pub fn log_file_path() -> PathBuf {
    PathBuf::from(format!(
        "./logs/nfa_sim_{}.txt",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ))
}

/// Installs the global `tracing` subscriber described by `config`. Returns
/// the log file path if one is written. Does nothing when logging is
/// disabled.
pub fn init_logging(config: &LoggerConfig) -> anyhow::Result<Option<PathBuf>> {
    if !*config.get_enabled() {
        return Ok(None);
    }

    let level = config.get_log_level().to_level_filter();

    if *config.get_log_file() {
        let path = log_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;

        Ok(Some(path))
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;

        Ok(None)
    }
}
