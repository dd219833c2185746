use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::cancel::CancellationRegistry;
use super::engine::{Engine, EngineConfig};
use super::event::{Event, RunId};
use super::phase::Phase;
use super::scenario::Scenario;
use super::scheduler::SideEffect;
use super::telemetry::metrics::TelemetrySnapshot;
use super::view::SimView;
use crate::config::SimConfig;
use crate::error::{DecisionError, EngineError, SimError};
use crate::services::decision::DecisionService;

const CHANNEL_CAPACITY: usize = 64;

/// Requests from the UI. Each carries its reply slot.
#[derive(Debug)]
enum Request {
    SetScenario(Scenario, oneshot::Sender<()>),
    Trigger(oneshot::Sender<Result<RunId, EngineError>>),
    Reset(oneshot::Sender<()>),
    Telemetry(oneshot::Sender<TelemetrySnapshot>),
}

/// Single-task driver around the [`Engine`].
///
/// UI requests and delayed events are handled one at a time, so the engine
/// never sees concurrent mutation. Timers and the decision call run as spawned
/// tasks that only talk back through the event channel.
pub struct Reactor {
    engine: Engine,
    service: Arc<dyn DecisionService>,
    call_timeout: Option<Duration>,
    requests: mpsc::Receiver<Request>,
    events: mpsc::Receiver<Event>,
    events_tx: mpsc::Sender<Event>,
    cancel_registry: CancellationRegistry,
    view_tx: watch::Sender<SimView>,
}

impl Reactor {
    pub fn new(config: &SimConfig, service: Arc<dyn DecisionService>) -> (Self, SimulatorHandle) {
        let (requests_tx, requests) = mpsc::channel(CHANNEL_CAPACITY);
        let (events_tx, events) = mpsc::channel(CHANNEL_CAPACITY);
        let engine = Engine::new(EngineConfig::from(config));
        let (view_tx, view_rx) = watch::channel(engine.view());

        let reactor = Self {
            engine,
            service,
            call_timeout: config.call_timeout,
            requests,
            events,
            events_tx,
            cancel_registry: CancellationRegistry::new(),
            view_tx,
        };
        let handle = SimulatorHandle {
            requests: requests_tx,
            view: view_rx,
        };
        (reactor, handle)
    }

    /// Build and run on the current tokio runtime.
    pub fn spawn(config: &SimConfig, service: Arc<dyn DecisionService>) -> (SimulatorHandle, JoinHandle<()>) {
        let (reactor, handle) = Self::new(config, service);
        (handle, tokio::spawn(reactor.run()))
    }

    /// Async driver loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        info!("Simulator reactor started");

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.on_request(request),
                    None => break,
                },
                Some(event) = self.events.recv() => {
                    let effects = self.engine.handle(event);
                    self.execute(effects);
                    self.publish();
                }
            }
        }

        self.cancel_registry.cancel_all();
        info!("Simulator reactor stopped");
    }

    fn on_request(&mut self, request: Request) {
        // Publish before replying so callers observe the new view once their await returns.
        match request {
            Request::SetScenario(scenario, reply) => {
                self.engine.set_scenario(scenario);
                self.publish();
                let _ = reply.send(());
            }
            Request::Trigger(reply) => {
                let outcome = self.engine.trigger().map(|(run, effects)| {
                    self.execute(effects);
                    run
                });
                self.publish();
                let _ = reply.send(outcome);
            }
            Request::Reset(reply) => {
                let effects = self.engine.reset();
                self.execute(effects);
                self.publish();
                let _ = reply.send(());
            }
            Request::Telemetry(reply) => {
                let _ = reply.send(self.engine.telemetry().snapshot());
            }
        }
    }

    fn execute(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::StartTimer { run, timer, after } => {
                    let token = self.cancel_registry.token_for(run);
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => debug!("{} {:?} timer cancelled", run, timer),
                            _ = tokio::time::sleep(after) => {
                                let _ = tx.send(timer.fired(run)).await;
                            }
                        }
                    });
                }
                SideEffect::DispatchCall { run, request } => {
                    let token = self.cancel_registry.token_for(run);
                    let tx = self.events_tx.clone();
                    let service = Arc::clone(&self.service);
                    let limit = self.call_timeout;
                    tokio::spawn(async move {
                        let call = async move {
                            match limit {
                                Some(limit) => tokio::time::timeout(limit, service.missed_call(&request))
                                    .await
                                    .unwrap_or(Err(DecisionError::Timeout(limit))),
                                None => service.missed_call(&request).await,
                            }
                        };
                        tokio::select! {
                            _ = token.cancelled() => debug!("{} decision call abandoned", run),
                            result = call => {
                                let _ = tx.send(Event::CallSettled(run, result)).await;
                            }
                        }
                    });
                }
                SideEffect::CancelRun(run) => self.cancel_registry.cancel(run),
            }
        }
    }

    fn publish(&self) {
        let next = self.engine.view();
        self.view_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Cloneable UI-facing surface of a running simulator.
#[derive(Clone)]
pub struct SimulatorHandle {
    requests: mpsc::Sender<Request>,
    view: watch::Receiver<SimView>,
}

impl SimulatorHandle {
    pub async fn set_scenario(&self, scenario: Scenario) -> Result<(), SimError> {
        self.ask(|reply| Request::SetScenario(scenario, reply)).await
    }

    /// Start a run. Fails with `EngineError::NotIdle` unless the phase is idle.
    pub async fn trigger(&self) -> Result<RunId, SimError> {
        Ok(self.ask(Request::Trigger).await??)
    }

    pub async fn reset(&self) -> Result<(), SimError> {
        self.ask(Request::Reset).await
    }

    pub async fn telemetry(&self) -> Result<TelemetrySnapshot, SimError> {
        self.ask(Request::Telemetry).await
    }

    pub fn view(&self) -> SimView {
        self.view.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.view.borrow().phase
    }

    /// Receiver that wakes on every view change.
    pub fn subscribe(&self) -> watch::Receiver<SimView> {
        self.view.clone()
    }

    pub async fn wait_for_phase(&self, phase: Phase) -> Result<SimView, SimError> {
        let mut rx = self.view.clone();
        let view = rx.wait_for(|v| v.phase == phase).await.map_err(|_| SimError::Closed)?;
        Ok(view.clone())
    }

    async fn ask<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T, SimError> {
        let (reply, rx) = oneshot::channel();
        self.requests.send(make(reply)).await.map_err(|_| SimError::Closed)?;
        rx.await.map_err(|_| SimError::Closed)
    }
}
