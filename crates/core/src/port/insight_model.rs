// Insight Model Port
// Hosted language model that turns a diet log into a JSON report

use crate::port::GatewayError;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// JSON schema the answer must follow (sent as guidance)
    pub schema: Option<Value>,
    pub temperature: f32,
}

#[async_trait]
pub trait InsightModel: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// One completion call; returns the raw text of the answer
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Model that always answers with the same text
    pub struct CannedModel {
        answer: Result<String, GatewayError>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedModel {
        pub fn new(answer: impl Into<String>) -> Self {
            Self {
                answer: Ok(answer.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: GatewayError) -> Self {
            Self {
                answer: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InsightModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.answer.clone()
        }
    }
}
