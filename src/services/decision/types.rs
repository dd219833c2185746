use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Payload returned by the decision collaborator.
///
/// Only `simulated_delay` and `message_body` are interpreted. Everything else
/// (`status`, `action`, `timestamp`, ...) rides along in `extra` for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    /// Seconds to wait before the text is shown, kept exactly as received.
    /// Untrusted: see `kernel::time::text_delay`.
    pub simulated_delay: Number,
    pub message_body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallResponse {
    /// Non-finite delays have no JSON form and are stored as `0`.
    pub fn new(simulated_delay: f64, message_body: impl Into<String>) -> Self {
        Self {
            simulated_delay: Number::from_f64(simulated_delay).unwrap_or_else(|| Number::from(0u8)),
            message_body: message_body.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn delay_secs(&self) -> Option<f64> {
        self.simulated_delay.as_f64()
    }

    pub fn action(&self) -> Option<&str> {
        self.extra.get("action").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.extra.get("status").and_then(Value::as_str)
    }
}
