use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::CallResponse;
use super::DecisionService;
use crate::config::SimConfig;
use crate::error::{ConfigError, DecisionError};
use crate::kernel::scenario::CallRequest;

#[derive(Clone)]
pub struct DecisionClient {
    client: Client,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl DecisionClient {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit); // Network-level bound, the reactor enforces its own
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            endpoint,
            timeout,
        }
    }

    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.endpoint()?, config.call_timeout))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn classify(&self, e: reqwest::Error) -> DecisionError {
        match self.timeout {
            Some(limit) if e.is_timeout() => DecisionError::Timeout(limit),
            _ => DecisionError::Transport(e),
        }
    }
}

#[async_trait]
impl DecisionService for DecisionClient {
    async fn missed_call(&self, request: &CallRequest) -> Result<CallResponse, DecisionError> {
        debug!("POST {} caller={} time_of_day={}", self.endpoint, request.caller_name, request.time_of_day);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(DecisionError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let parsed: CallResponse = serde_json::from_slice(&body)?;
        Ok(parsed)
    }
}
