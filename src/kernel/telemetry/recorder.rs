use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

/// Bounded window of recent events plus lifetime counters.
///
/// Eviction only trims the window; `snapshot` never goes backwards.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
    capacity: usize,
    totals: TelemetrySnapshot,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(MAX_EVENTS)),
            capacity: capacity.max(1),
            totals: TelemetrySnapshot::default(),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        self.totals.apply(&event);
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    /// Lifetime counters since the recorder was created.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.totals.clone()
    }

    /// Counters over the retained window only.
    pub fn window_snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::event::RunId;
    use crate::kernel::phase::Phase;

    #[test]
    fn ring_buffer_drops_oldest() {
        let mut recorder = TelemetryRecorder::with_capacity(2);
        recorder.record(TelemetryEvent::TriggerRejected { phase: Phase::Ringing });
        recorder.record(TelemetryEvent::TriggerRejected { phase: Phase::Missed });
        recorder.record(TelemetryEvent::TriggerRejected { phase: Phase::Texted });

        let phases: Vec<_> = recorder
            .events()
            .map(|e| match e {
                TelemetryEvent::TriggerRejected { phase } => *phase,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(phases, vec![Phase::Missed, Phase::Texted]);
        assert_eq!(recorder.window_snapshot().rejected_triggers, 2);
    }

    #[test]
    fn totals_survive_eviction() {
        let mut recorder = TelemetryRecorder::with_capacity(3);
        for n in 1..=5 {
            let run = RunId(n);
            recorder.record(TelemetryEvent::PhaseTransition { run, from: Phase::Idle, to: Phase::Ringing });
            recorder.record(TelemetryEvent::Reset { run: Some(run), from: Phase::Ringing });
        }

        assert_eq!(recorder.events().count(), 3);
        let snap = recorder.snapshot();
        assert_eq!(snap.run_stats.started, 5);
        assert_eq!(snap.resets, 5);

        recorder.record(TelemetryEvent::Reset { run: None, from: Phase::Idle });
        assert_eq!(recorder.snapshot().resets, 6);
        assert!(recorder.window_snapshot().resets < 6);
    }
}
