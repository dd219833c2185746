use super::event::{RunContext, RunId};
use super::phase::Phase;
use super::scenario::{CallRequest, Scenario};
use super::store::ScenarioStore;
use crate::error::FailureKind;
use crate::services::decision::types::CallResponse;

/// Strict state delta. This is the ONLY way state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    PhaseChanged(Phase),
    ScenarioSelected(Scenario),
    RunStarted(RunContext),
    RequestIssued(CallRequest),
    ResponseReceived(CallResponse),
    CallFailed(FailureKind),
    ResponseStored(Option<CallResponse>),
    RunCleared,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimState {
    pub phase: Phase,
    pub store: ScenarioStore,
    pub run: Option<RunContext>,
    // Monotonic version, bumped on every reduction
    pub version: u64,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.run.as_ref().map(|ctx| ctx.id)
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::PhaseChanged(phase) => self.phase = phase,
            StateDelta::ScenarioSelected(scenario) => self.store.set_scenario(scenario),
            StateDelta::RunStarted(ctx) => self.run = Some(ctx),
            StateDelta::RequestIssued(request) => {
                if let Some(ctx) = self.run.as_mut() {
                    ctx.request = Some(request);
                }
            }
            StateDelta::ResponseReceived(response) => {
                if let Some(ctx) = self.run.as_mut() {
                    ctx.response = Some(response);
                }
            }
            StateDelta::CallFailed(kind) => {
                if let Some(ctx) = self.run.as_mut() {
                    ctx.failure = Some(kind);
                }
            }
            StateDelta::ResponseStored(response) => self.store.set_response(response),
            StateDelta::RunCleared => self.run = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_scoped_deltas_need_a_run() {
        let mut state = SimState::new();
        state.reduce(StateDelta::ResponseReceived(CallResponse::new(1.0, "x")));
        assert!(state.run.is_none());
        assert_eq!(state.version, 1);

        state.reduce(StateDelta::RunStarted(RunContext::new(RunId(1), Scenario::Vip)));
        state.reduce(StateDelta::CallFailed(FailureKind::Status));
        assert_eq!(state.run.as_ref().and_then(|c| c.failure), Some(FailureKind::Status));
        assert_eq!(state.active_run(), Some(RunId(1)));

        state.reduce(StateDelta::RunCleared);
        assert_eq!(state.active_run(), None);
        assert_eq!(state.version, 4);
    }
}
