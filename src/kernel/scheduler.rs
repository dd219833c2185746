use std::time::Duration;

use super::event::{Event, RunId};
use super::scenario::CallRequest;

/// The two suspension points of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Ring,
    Text,
}

impl Timer {
    /// Event delivered back to the engine when this timer fires.
    pub fn fired(self, run: RunId) -> Event {
        match self {
            Timer::Ring => Event::RingElapsed(run),
            Timer::Text => Event::TextDelayElapsed(run),
        }
    }
}

/// Work the engine asks the driver to perform. The engine itself never awaits.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    StartTimer { run: RunId, timer: Timer, after: Duration },
    DispatchCall { run: RunId, request: CallRequest },
    CancelRun(RunId),
}
