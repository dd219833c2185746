use serde::Serialize;

use super::event::RunId;
use super::phase::Phase;
use super::scenario::Scenario;
use crate::error::FailureKind;
use crate::services::decision::types::CallResponse;

/// Read-only snapshot published to the presentation layer after every step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimView {
    pub phase: Phase,
    /// Currently selected scenario.
    pub scenario: Scenario,
    pub run: Option<RunId>,
    /// Scenario the active run was triggered with.
    pub run_scenario: Option<Scenario>,
    pub response: Option<CallResponse>,
    pub failure: Option<FailureKind>,
}

impl SimView {
    pub fn can_trigger(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Scenario the screen should describe: the run's snapshot while a run is active.
    pub fn display_scenario(&self) -> Scenario {
        self.run_scenario.unwrap_or(self.scenario)
    }
}
