use std::time::Duration;
use tracing::{debug, info, warn};

use super::event::{Event, RunContext, RunId};
use super::phase::{Phase, PhaseGraph, PhaseRequest};
use super::scenario::{CallRequest, Scenario};
use super::scheduler::{SideEffect, Timer};
use super::state::{SimState, StateDelta};
use super::telemetry::event::{CallOutcome, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::{self, MAX_TEXT_DELAY, RING_DURATION};
use super::view::SimView;
use crate::config::SimConfig;
use crate::error::{DecisionError, EngineError};
use crate::services::decision::types::CallResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub ring_duration: Duration,
    pub max_text_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ring_duration: RING_DURATION,
            max_text_delay: MAX_TEXT_DELAY,
        }
    }
}

impl From<&SimConfig> for EngineConfig {
    fn from(config: &SimConfig) -> Self {
        Self {
            ring_duration: config.ring_duration,
            max_text_delay: config.max_text_delay,
        }
    }
}

/// The call simulation state machine.
///
/// Every operation is synchronous and returns the side effects the driver must
/// perform. Timer and network completions come back in through [`Engine::handle`]
/// tagged with their run; anything tagged with a run other than the active one
/// is dropped.
///
/// State is only reachable read-only; the phase moves solely through
/// `trigger`, `reset` and `handle`.
///
/// ```compile_fail
/// use missedcall::kernel::engine::{Engine, EngineConfig};
/// use missedcall::kernel::phase::Phase;
///
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.state.phase = Phase::Texted;
/// ```
pub struct Engine {
    state: SimState,
    telemetry: TelemetryRecorder,
    config: EngineConfig,
    last_run: u64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: SimState::new(),
            telemetry: TelemetryRecorder::new(),
            config,
            last_run: 0,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn scenario(&self) -> Scenario {
        self.state.store.scenario()
    }

    pub fn response(&self) -> Option<&CallResponse> {
        self.state.store.response()
    }

    pub fn active_run(&self) -> Option<&RunContext> {
        self.state.run.as_ref()
    }

    pub fn view(&self) -> SimView {
        let run = self.state.run.as_ref();
        SimView {
            phase: self.state.phase,
            scenario: self.state.store.scenario(),
            run: run.map(|ctx| ctx.id),
            run_scenario: run.map(|ctx| ctx.scenario),
            response: self.state.store.response().cloned(),
            failure: run.and_then(|ctx| ctx.failure),
        }
    }

    /// Allowed at any time. An in-flight run keeps the scenario it was triggered with.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        if scenario != self.state.store.scenario() {
            self.state.reduce(StateDelta::ScenarioSelected(scenario));
        }
    }

    pub fn trigger(&mut self) -> Result<(RunId, Vec<SideEffect>), EngineError> {
        let current = self.state.phase;
        let Some(next) = PhaseGraph::transition(current, PhaseRequest::Trigger) else {
            warn!("Trigger rejected: phase is {}", current);
            self.telemetry.record(TelemetryEvent::TriggerRejected { phase: current });
            return Err(EngineError::NotIdle { phase: current });
        };

        self.last_run += 1;
        let run = RunId(self.last_run);
        let scenario = self.state.store.scenario();

        self.state.reduce(StateDelta::ResponseStored(None));
        self.state.reduce(StateDelta::RunStarted(RunContext::new(run, scenario)));
        self.enter(run, next);
        info!("{} started with scenario {}", run, scenario);

        Ok((
            run,
            vec![SideEffect::StartTimer {
                run,
                timer: Timer::Ring,
                after: self.config.ring_duration,
            }],
        ))
    }

    /// Valid in any phase. Repeated resets from a clean idle state do nothing.
    pub fn reset(&mut self) -> Vec<SideEffect> {
        let from = self.state.phase;
        let run = self.state.active_run();

        if from == Phase::Idle && run.is_none() && self.state.store.response().is_none() {
            return Vec::new();
        }

        self.state.reduce(StateDelta::RunCleared);
        self.state.reduce(StateDelta::ResponseStored(None));
        if let Some(next) = PhaseGraph::transition(from, PhaseRequest::Reset) {
            self.state.reduce(StateDelta::PhaseChanged(next));
        }
        self.telemetry.record(TelemetryEvent::Reset { run, from });

        match run {
            Some(run) => {
                info!("{} reset from {}", run, from);
                vec![SideEffect::CancelRun(run)]
            }
            None => Vec::new(),
        }
    }

    /// Feed a timer firing or a settled decision call back into the machine.
    pub fn handle(&mut self, event: Event) -> Vec<SideEffect> {
        let run = event.run();

        // STALE REJECTION: only the active run may mutate phase or response.
        if self.state.active_run() != Some(run) {
            debug!("Discarded stale {:?} for {}", event.source(), run);
            self.telemetry.record(TelemetryEvent::StaleDiscarded {
                run,
                source: event.source(),
            });
            return Vec::new();
        }

        match event {
            Event::RingElapsed(run) => self.on_ring_elapsed(run),
            Event::CallSettled(run, result) => self.on_call_settled(run, result),
            Event::TextDelayElapsed(run) => self.on_text_delay_elapsed(run),
        }
    }

    fn on_ring_elapsed(&mut self, run: RunId) -> Vec<SideEffect> {
        let Some(next) = PhaseGraph::transition(self.state.phase, PhaseRequest::RingElapsed) else {
            debug!("{} ring timer fired in phase {}, ignoring", run, self.state.phase);
            return Vec::new();
        };
        let Some(scenario) = self.state.run.as_ref().map(|ctx| ctx.scenario) else {
            return Vec::new();
        };

        let request = CallRequest::from(scenario);
        self.state.reduce(StateDelta::RequestIssued(request.clone()));
        self.enter(run, next);

        vec![SideEffect::DispatchCall { run, request }]
    }

    fn on_call_settled(&mut self, run: RunId, result: Result<CallResponse, DecisionError>) -> Vec<SideEffect> {
        let settled_before = self
            .state
            .run
            .as_ref()
            .map_or(true, |ctx| ctx.response.is_some() || ctx.failure.is_some());
        if self.state.phase != Phase::Missed || settled_before {
            debug!("{} duplicate or out-of-phase call result, ignoring", run);
            return Vec::new();
        }

        let result = result.and_then(|response| match response.delay_secs() {
            Some(secs) => Ok((response, secs)),
            None => Err(DecisionError::Malformed(format!(
                "simulated_delay {} is not representable",
                response.simulated_delay
            ))),
        });

        match result {
            Ok((response, secs)) => {
                let wait = time::text_delay(secs, self.config.max_text_delay);
                if wait.clamped {
                    warn!(
                        "{} simulated_delay {} out of range, using {:?}",
                        run, response.simulated_delay, wait.delay
                    );
                    self.telemetry.record(TelemetryEvent::DelayClamped {
                        run,
                        applied_ms: wait.delay.as_millis() as u64,
                    });
                }
                self.telemetry.record(TelemetryEvent::CallSettled {
                    run,
                    outcome: CallOutcome::Delivered,
                });
                self.state.reduce(StateDelta::ResponseReceived(response));
                info!("{} decision received, texting in {:?}", run, wait.delay);

                vec![SideEffect::StartTimer {
                    run,
                    timer: Timer::Text,
                    after: wait.delay,
                }]
            }
            Err(e) => {
                // No retry, no revert: the run waits at Missed until reset.
                warn!("{} decision call failed: {}", run, e);
                let kind = e.kind();
                self.telemetry.record(TelemetryEvent::CallSettled {
                    run,
                    outcome: CallOutcome::Failed(kind),
                });
                self.state.reduce(StateDelta::CallFailed(kind));
                Vec::new()
            }
        }
    }

    fn on_text_delay_elapsed(&mut self, run: RunId) -> Vec<SideEffect> {
        let Some(response) = self.state.run.as_ref().and_then(|ctx| ctx.response.clone()) else {
            return Vec::new();
        };
        let Some(next) = PhaseGraph::transition(self.state.phase, PhaseRequest::TextDelivered) else {
            return Vec::new();
        };

        self.state.reduce(StateDelta::ResponseStored(Some(response)));
        self.enter(run, next);
        Vec::new()
    }

    fn enter(&mut self, run: RunId, to: Phase) {
        let from = self.state.phase;
        self.state.reduce(StateDelta::PhaseChanged(to));
        self.telemetry.record(TelemetryEvent::PhaseTransition { run, from, to });
        info!("{}: {} -> {}", run, from, to);
    }
}
