use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::completion::{CompletionRequest, CompletionService};
use crate::error::CompletionError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// `None` keeps the HTTP client's default, which never times out.
    pub timeout: Option<Duration>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionEnvelope {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client. Built once per process and
/// shared; `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    http_client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: OpenAiConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key,
            model: config.model,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionService for OpenAiCompletionClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let mut payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt }
            ],
            "temperature": request.temperature,
        });
        if request.json_response {
            payload["response_format"] = json!({ "type": "json_object" });
        }

        debug!(endpoint = %self.endpoint, model = %self.model, "sending chat completion");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let envelope: ChatCompletionEnvelope =
            serde_json::from_str(&body).map_err(|error| CompletionError::Decode(error.to_string()))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyReply)
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
