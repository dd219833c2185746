use serde::{Deserialize, Serialize};
use std::fmt;

/// The discrete states of one simulated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Home screen, no run active. The only phase that accepts a trigger.
    Idle,
    /// Incoming call on screen. Waits out the fixed ring duration.
    Ringing,
    /// Call was missed. The decision call is in flight (or failed and we wait for reset).
    Missed,
    /// Auto-response delivered. Terminal until reset.
    Texted,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Ringing => "ringing",
            Phase::Missed => "missed",
            Phase::Texted => "texted",
        };
        f.write_str(name)
    }
}

/// Requests for a phase transition.
/// These are REQUESTS, not forces. The graph validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequest {
    Trigger,
    RingElapsed,
    TextDelivered,
    Reset,
}

pub struct PhaseGraph;

impl PhaseGraph {
    /// Pure function: (Current Phase, Request) -> New Phase
    /// Returns None if the transition is invalid/ignored.
    pub fn transition(current: Phase, request: PhaseRequest) -> Option<Phase> {
        use Phase::*;
        use PhaseRequest::*;

        match (current, request) {
            (Idle, Trigger) => Some(Ringing),
            (Ringing, RingElapsed) => Some(Missed),
            (Missed, TextDelivered) => Some(Texted),

            // Reset is always honored, including from Idle (no-op target).
            (_, Reset) => Some(Idle),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_only_from_idle() {
        assert_eq!(PhaseGraph::transition(Phase::Idle, PhaseRequest::Trigger), Some(Phase::Ringing));
        for phase in [Phase::Ringing, Phase::Missed, Phase::Texted] {
            assert_eq!(PhaseGraph::transition(phase, PhaseRequest::Trigger), None);
        }
    }

    #[test]
    fn happy_path_is_linear() {
        let ringing = PhaseGraph::transition(Phase::Idle, PhaseRequest::Trigger).unwrap();
        let missed = PhaseGraph::transition(ringing, PhaseRequest::RingElapsed).unwrap();
        let texted = PhaseGraph::transition(missed, PhaseRequest::TextDelivered).unwrap();
        assert_eq!(texted, Phase::Texted);

        // No skipping ahead
        assert_eq!(PhaseGraph::transition(Phase::Ringing, PhaseRequest::TextDelivered), None);
        assert_eq!(PhaseGraph::transition(Phase::Texted, PhaseRequest::RingElapsed), None);
    }

    #[test]
    fn reset_from_anywhere() {
        for phase in [Phase::Idle, Phase::Ringing, Phase::Missed, Phase::Texted] {
            assert_eq!(PhaseGraph::transition(phase, PhaseRequest::Reset), Some(Phase::Idle));
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Texted).unwrap(), "\"texted\"");
        assert_eq!(Phase::Missed.to_string(), "missed");
    }
}
