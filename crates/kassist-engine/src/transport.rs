//! Transport to the remote agent endpoint.

use crate::config::Config;
use crate::prompt::AgentRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Something that can deliver an [`AgentRequest`] and return the decoded reply body.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send one request and wait for the JSON reply.
    async fn send(&self, request: &AgentRequest) -> Result<Value, TransportError>;
}

/// HTTP transport: one JSON `POST` per request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: Client,
}

impl HttpTransport {
    /// Create a transport for the given endpoint with an optional request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Create a transport from configuration.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            config.endpoint.clone(),
            config.request_timeout_seconds.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn send(&self, request: &AgentRequest) -> Result<Value, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            agent_id = %request.agent_id,
            session_id = %request.session_id,
            prompt_len = request.message.len(),
            "sending agent request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;
        tracing::debug!(%status, body_len = body.len(), "agent response received");

        // The agent proxy reports failures inside a JSON body, so the body is
        // decoded regardless of status. A non-JSON error page is a status error.
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
            Err(e) => Err(TransportError::Decode(e)),
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err)
    }
}

/// Errors that can occur while talking to the agent.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// Network or protocol failure.
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Non-success status with a body that is not JSON.
    #[error("Agent returned HTTP {0}")]
    Status(u16),

    /// The body was not valid JSON.
    #[error("Invalid JSON in agent reply: {0}")]
    Decode(#[source] serde_json::Error),

    /// The configured request timeout elapsed.
    #[error("Agent request timed out")]
    Timeout,

    /// The task running the request did not complete.
    #[error("Agent request task failed: {0}")]
    Task(String),
}
