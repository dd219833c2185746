use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

use super::event::RunId;

/// Cancellation tokens for the tasks spawned on behalf of each run.
/// Lives in the effect layer; the engine only ever emits `CancelRun`.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
    root: CancellationToken,
    runs: HashMap<RunId, CancellationToken>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token shared by every task of `run`. Child of the registry root.
    pub fn token_for(&mut self, run: RunId) -> CancellationToken {
        self.runs
            .entry(run)
            .or_insert_with(|| self.root.child_token())
            .clone()
    }

    pub fn cancel(&mut self, run: RunId) {
        if let Some(token) = self.runs.remove(&run) {
            token.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        self.root.cancel();
        self.runs.clear();
    }

    pub fn tracked(&self) -> usize {
        self.runs.len()
    }
}
