use serde::{Deserialize, Serialize};
use std::fmt;

use super::scenario::{CallRequest, Scenario};
use crate::error::{DecisionError, FailureKind};
use crate::services::decision::types::CallResponse;

/// Monotonic identifier of one trigger-to-completion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Everything the engine knows about the active run.
/// Created at trigger, dropped on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    pub id: RunId,
    /// Scenario as it was when the call was triggered.
    pub scenario: Scenario,
    pub request: Option<CallRequest>,
    pub response: Option<CallResponse>,
    pub failure: Option<FailureKind>,
}

impl RunContext {
    pub fn new(id: RunId, scenario: Scenario) -> Self {
        Self {
            id,
            scenario,
            request: None,
            response: None,
            failure: None,
        }
    }
}

/// Delayed signals fed back into the engine. Each carries the run that produced it
/// so superseded runs can be told apart.
#[derive(Debug)]
pub enum Event {
    RingElapsed(RunId),
    CallSettled(RunId, Result<CallResponse, DecisionError>),
    TextDelayElapsed(RunId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    RingTimer,
    DecisionCall,
    TextTimer,
}

impl Event {
    pub fn run(&self) -> RunId {
        match self {
            Event::RingElapsed(run) | Event::CallSettled(run, _) | Event::TextDelayElapsed(run) => *run,
        }
    }

    pub fn source(&self) -> EventSource {
        match self {
            Event::RingElapsed(_) => EventSource::RingTimer,
            Event::CallSettled(..) => EventSource::DecisionCall,
            Event::TextDelayElapsed(_) => EventSource::TextTimer,
        }
    }
}
