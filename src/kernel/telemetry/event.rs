use serde::{Deserialize, Serialize};

use crate::error::FailureKind;
use crate::kernel::event::{EventSource, RunId};
use crate::kernel::phase::Phase;

// Allowed: IDs, Phases, Durations, Counts, Enums
// Forbidden: message bodies, caller names, raw payloads

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    PhaseTransition {
        run: RunId,
        from: Phase,
        to: Phase,
    },

    TriggerRejected {
        phase: Phase,
    },

    CallSettled {
        run: RunId,
        outcome: CallOutcome,
    },

    StaleDiscarded {
        run: RunId,
        source: EventSource,
    },

    DelayClamped {
        run: RunId,
        applied_ms: u64,
    },

    Reset {
        run: Option<RunId>,
        from: Phase,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    Delivered,
    Failed(FailureKind),
}
