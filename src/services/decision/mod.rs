//! The remote decision collaborator: given a missed call, it decides what to
//! text back and how long to wait first.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::DecisionError;
use crate::kernel::scenario::CallRequest;
use types::CallResponse;

/// One outbound `POST /api/missed-call`. Implementations must not retry.
#[async_trait]
pub trait DecisionService: Send + Sync {
    async fn missed_call(&self, request: &CallRequest) -> Result<CallResponse, DecisionError>;
}
