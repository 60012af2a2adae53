// HTTP Workflow Gateway
//
// GET  {base}/inputs
// POST {base}/kickoff        body: {"inputs": {...}}
// GET  {base}/status/{handle}

use crate::connection::{
    auth_headers, create_client, join_segments, network_error, parse_base_url, read_json,
    read_json_with_status,
};
use async_trait::async_trait;
use pfolio_core::domain::{BearerToken, JobHandle, JobStatus, KickoffRequest};
use pfolio_core::error::Result;
use pfolio_core::port::{GatewayError, WorkflowGateway};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const INPUTS_TIMEOUT: Duration = Duration::from_secs(30);
const KICKOFF_TIMEOUT: Duration = Duration::from_secs(60);
const STATUS_TIMEOUT: Duration = Duration::from_secs(90);

pub struct HttpWorkflowGateway {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpWorkflowGateway {
    /// Create a gateway for the given service base URL
    pub fn new(base_url: &str, token: &BearerToken) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            base_url: parse_base_url(base_url)?,
            headers: auth_headers(token)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send_get(
        &self,
        segments: &[&str],
        timeout: Duration,
    ) -> std::result::Result<Response, GatewayError> {
        let url = join_segments(&self.base_url, segments)?;
        debug!(url = %url, "GET");

        self.client
            .get(url)
            .headers(self.headers.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(network_error)
    }

    async fn get(&self, segments: &[&str], timeout: Duration) -> std::result::Result<Value, GatewayError> {
        read_json(self.send_get(segments, timeout).await?).await
    }
}

#[async_trait]
impl WorkflowGateway for HttpWorkflowGateway {
    async fn fetch_inputs(&self) -> std::result::Result<Value, GatewayError> {
        self.get(&["inputs"], INPUTS_TIMEOUT).await
    }

    async fn kickoff(&self, request: &KickoffRequest) -> std::result::Result<Value, GatewayError> {
        let url = join_segments(&self.base_url, &["kickoff"])?;
        debug!(url = %url, inputs = request.inputs.len(), "POST kickoff");

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .timeout(KICKOFF_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    async fn status(&self, handle: &JobHandle) -> std::result::Result<JobStatus, GatewayError> {
        let response = self.send_get(&["status", handle.as_str()], STATUS_TIMEOUT).await?;
        let (status, body) = read_json_with_status(response).await?;
        // A snapshot must be an object; anything else can never turn terminal
        if !body.is_object() {
            return Err(GatewayError::MalformedResponse {
                status,
                body: body.to_string(),
            });
        }
        Ok(JobStatus::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> BearerToken {
        BearerToken::new("test-token-123").unwrap()
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        assert!(HttpWorkflowGateway::new("not a url", &token()).is_err());
        assert!(HttpWorkflowGateway::new("file:///tmp", &token()).is_err());
    }

    #[test]
    fn test_new_keeps_base_url() {
        let gateway = HttpWorkflowGateway::new(" https://crew.example.com/ ", &token()).unwrap();
        assert_eq!(gateway.base_url().as_str(), "https://crew.example.com/");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let gateway = HttpWorkflowGateway::new(&format!("http://{}", addr), &token()).unwrap();
        let err = gateway.fetch_inputs().await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }
}
