use super::event::{CallOutcome, TelemetryEvent};
use crate::error::FailureKind;
use crate::kernel::phase::Phase;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub run_stats: RunStats,
    pub call_stats: CallStats,
    pub stale_discarded: u64,
    pub rejected_triggers: u64,
    pub resets: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub started: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallStats {
    pub delivered: u64,
    pub transport_failures: u64,
    pub status_failures: u64,
    pub malformed: u64,
    pub timeouts: u64,
    pub clamped_delays: u64,
}

impl CallStats {
    pub fn failed(&self) -> u64 {
        self.transport_failures + self.status_failures + self.malformed + self.timeouts
    }
}

impl TelemetrySnapshot {
    /// Fold one event into the counters.
    pub fn apply(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::PhaseTransition { to: Phase::Ringing, .. } => self.run_stats.started += 1,
            TelemetryEvent::PhaseTransition { to: Phase::Texted, .. } => self.run_stats.completed += 1,
            TelemetryEvent::PhaseTransition { .. } => {}
            TelemetryEvent::TriggerRejected { .. } => self.rejected_triggers += 1,
            TelemetryEvent::CallSettled { outcome, .. } => match outcome {
                CallOutcome::Delivered => self.call_stats.delivered += 1,
                CallOutcome::Failed(FailureKind::Transport) => self.call_stats.transport_failures += 1,
                CallOutcome::Failed(FailureKind::Status) => self.call_stats.status_failures += 1,
                CallOutcome::Failed(FailureKind::Malformed) => self.call_stats.malformed += 1,
                CallOutcome::Failed(FailureKind::Timeout) => self.call_stats.timeouts += 1,
            },
            TelemetryEvent::StaleDiscarded { .. } => self.stale_discarded += 1,
            TelemetryEvent::DelayClamped { .. } => self.call_stats.clamped_delays += 1,
            TelemetryEvent::Reset { .. } => self.resets += 1,
        }
    }
}

/// Counters over an arbitrary slice of events.
pub fn compute_snapshot<'a>(events: impl IntoIterator<Item = &'a TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    for event in events {
        snap.apply(event);
    }
    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::event::{EventSource, RunId};
    use std::collections::VecDeque;

    #[test]
    fn counts_by_kind() {
        let run = RunId(1);
        let events: VecDeque<TelemetryEvent> = vec![
            TelemetryEvent::PhaseTransition { run, from: Phase::Idle, to: Phase::Ringing },
            TelemetryEvent::PhaseTransition { run, from: Phase::Ringing, to: Phase::Missed },
            TelemetryEvent::CallSettled { run, outcome: CallOutcome::Failed(FailureKind::Timeout) },
            TelemetryEvent::CallSettled { run, outcome: CallOutcome::Failed(FailureKind::Status) },
            TelemetryEvent::CallSettled { run, outcome: CallOutcome::Delivered },
            TelemetryEvent::DelayClamped { run, applied_ms: 30_000 },
            TelemetryEvent::PhaseTransition { run, from: Phase::Missed, to: Phase::Texted },
            TelemetryEvent::StaleDiscarded { run, source: EventSource::DecisionCall },
            TelemetryEvent::TriggerRejected { phase: Phase::Texted },
            TelemetryEvent::Reset { run: Some(run), from: Phase::Texted },
        ]
        .into();

        let snap = compute_snapshot(&events);
        assert_eq!(snap.run_stats, RunStats { started: 1, completed: 1 });
        assert_eq!(snap.call_stats.delivered, 1);
        assert_eq!(snap.call_stats.failed(), 2);
        assert_eq!(snap.call_stats.clamped_delays, 1);
        assert_eq!(snap.stale_discarded, 1);
        assert_eq!(snap.rejected_triggers, 1);
        assert_eq!(snap.resets, 1);
    }
}
