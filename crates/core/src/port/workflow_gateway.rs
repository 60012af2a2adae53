// Workflow Gateway Port
// Abstraction over the remote workflow service (inputs / kickoff / status)

use crate::domain::{JobHandle, JobStatus, KickoffRequest};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures talking to a remote service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Transport-level failure (connection refused, timeout, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Body is not valid JSON; raw text kept for the caller
    #[error("Malformed response (HTTP {status}): {body}")]
    MalformedResponse { status: u16, body: String },

    /// Non-success HTTP status
    #[error("Request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Workflow Gateway trait
///
/// Implementations:
/// - HttpWorkflowGateway: bearer-token REST client (infra-http)
/// - ScriptedGateway: canned responses for tests
#[async_trait]
pub trait WorkflowGateway: Send + Sync {
    /// Schema of the inputs the remote job expects
    async fn fetch_inputs(&self) -> Result<Value, GatewayError>;

    /// Start a job; returns the raw response body
    ///
    /// # Errors
    /// - GatewayError::Network on transport failure
    /// - GatewayError::MalformedResponse if the body is not JSON
    async fn kickoff(&self, request: &KickoffRequest) -> Result<Value, GatewayError>;

    /// Fetch one status snapshot for a job
    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, GatewayError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Gateway that replays scripted responses
    pub struct ScriptedGateway {
        inputs: Value,
        kickoff: Result<Value, GatewayError>,
        statuses: Mutex<VecDeque<Result<Value, GatewayError>>>,
        kickoffs: Mutex<Vec<KickoffRequest>>,
        polled: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        pub fn new(kickoff: Value) -> Self {
            Self {
                inputs: Value::Null,
                kickoff: Ok(kickoff),
                statuses: Mutex::new(VecDeque::new()),
                kickoffs: Mutex::new(Vec::new()),
                polled: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_kickoff(error: GatewayError) -> Self {
            let mut gateway = Self::new(Value::Null);
            gateway.kickoff = Err(error);
            gateway
        }

        pub fn with_inputs(mut self, inputs: Value) -> Self {
            self.inputs = inputs;
            self
        }

        /// Queue status bodies, returned one per poll
        pub fn with_statuses(self, statuses: impl IntoIterator<Item = Value>) -> Self {
            self.statuses
                .lock()
                .unwrap()
                .extend(statuses.into_iter().map(Ok));
            self
        }

        /// Queue a poll failure
        pub fn with_status_error(self, error: GatewayError) -> Self {
            self.statuses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn poll_count(&self) -> usize {
            self.polled.lock().unwrap().len()
        }

        pub fn polled_handles(&self) -> Vec<String> {
            self.polled.lock().unwrap().clone()
        }

        pub fn kickoff_requests(&self) -> Vec<KickoffRequest> {
            self.kickoffs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkflowGateway for ScriptedGateway {
        async fn fetch_inputs(&self) -> Result<Value, GatewayError> {
            Ok(self.inputs.clone())
        }

        async fn kickoff(&self, request: &KickoffRequest) -> Result<Value, GatewayError> {
            self.kickoffs.lock().unwrap().push(request.clone());
            self.kickoff.clone()
        }

        async fn status(&self, handle: &JobHandle) -> Result<JobStatus, GatewayError> {
            self.polled.lock().unwrap().push(handle.as_str().to_string());
            let next = self.statuses.lock().unwrap().pop_front();
            match next {
                Some(Ok(body)) => Ok(JobStatus::new(body)),
                Some(Err(e)) => Err(e),
                // Script exhausted: keep reporting a running job
                None => Ok(JobStatus::new(serde_json::json!({"status": "running"}))),
            }
        }
    }
}
