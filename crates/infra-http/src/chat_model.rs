// OpenAI-compatible chat completion adapter for InsightModel

use crate::connection::{create_client, join_segments, network_error, parse_base_url};
use async_trait::async_trait;
use pfolio_core::error::{AppError, Result};
use pfolio_core::port::{CompletionRequest, GatewayError, InsightModel};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiChatModel {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    response_format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatAnswer,
}

#[derive(Deserialize)]
struct ChatAnswer {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChatModel {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::MissingConfiguration(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }
        let model = model.trim();
        if model.is_empty() {
            return Err(AppError::Validation("Model name cannot be empty".to_string()));
        }

        Ok(Self {
            client: create_client()?,
            base_url: parse_base_url(base_url)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn system_message(request: &CompletionRequest) -> String {
        match &request.schema {
            Some(schema) => format!(
                "{}\n\nRespond with a single JSON object matching this schema:\n{}",
                request.system, schema
            ),
            None => request.system.clone(),
        }
    }
}

#[async_trait]
impl InsightModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, GatewayError> {
        let url = join_segments(&self.base_url, &["chat", "completions"])?;
        let system = Self::system_message(request);
        let body = ChatRequest {
            model: &self.model,
            temperature: request.temperature,
            messages: vec![
                ChatMessage { role: "system", content: &system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
            response_format: json!({"type": "json_object"}),
        };

        debug!(url = %url, model = %self.model, "POST chat completion");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .timeout(COMPLETION_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let text = response.text().await.map_err(network_error)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Chat completion rejected");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|_| {
            GatewayError::MalformedResponse {
                status: status.as_u16(),
                body: text.clone(),
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GatewayError::MalformedResponse {
                status: status.as_u16(),
                body: text,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(schema: Option<Value>) -> CompletionRequest {
        CompletionRequest {
            system: "You are helpful.".to_string(),
            prompt: "Date: 2025-01-04".to_string(),
            schema,
            temperature: 0.2,
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = OpenAiChatModel::new(DEFAULT_CHAT_BASE_URL, "  ", DEFAULT_CHAT_MODEL)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }

    #[test]
    fn test_name_is_model() {
        let model = OpenAiChatModel::new(DEFAULT_CHAT_BASE_URL, "sk-test", DEFAULT_CHAT_MODEL).unwrap();
        assert_eq!(model.name(), "gpt-4.1-mini");
    }

    #[test]
    fn test_system_message_embeds_schema() {
        let with_schema = OpenAiChatModel::system_message(&request(Some(json!({"name": "daily_a1c_report"}))));
        assert!(with_schema.starts_with("You are helpful."));
        assert!(with_schema.contains("daily_a1c_report"));

        let without = OpenAiChatModel::system_message(&request(None));
        assert_eq!(without, "You are helpful.");
    }

    #[test]
    fn test_chat_response_shape() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{\"a\":1}"));
    }
}
