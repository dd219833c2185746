use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::kernel::phase::Phase;

/// Precondition violations raised by the engine. Never corrupts state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cannot trigger a call while phase is {phase} (reset first)")]
    NotIdle { phase: Phase },
}

/// Why a decision call did not yield a usable response.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decision endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("malformed decision response: {0}")]
    Malformed(String),
    #[error("decision call timed out after {0:?}")]
    Timeout(Duration),
}

impl DecisionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DecisionError::Transport(_) => FailureKind::Transport,
            DecisionError::Status { .. } => FailureKind::Status,
            DecisionError::Malformed(_) => FailureKind::Malformed,
            DecisionError::Timeout(_) => FailureKind::Timeout,
        }
    }
}

impl From<serde_json::Error> for DecisionError {
    fn from(e: serde_json::Error) -> Self {
        DecisionError::Malformed(e.to_string())
    }
}

/// Content-free classification of a `DecisionError`, safe for views and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    Transport,
    Status,
    Malformed,
    Timeout,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid decision endpoint URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("decision endpoint URL must be http(s), got '{0}'")]
    UnsupportedScheme(String),
    #[error("{key} must be a non-negative number of seconds, got '{value}'")]
    InvalidSeconds { key: String, value: String },
}

/// Errors surfaced by `SimulatorHandle`.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("simulator reactor has stopped")]
    Closed,
}
