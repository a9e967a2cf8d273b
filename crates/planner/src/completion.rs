use crate::error::CompletionError;

/// One single-turn chat completion: a system message and a user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    /// Ask the service for a JSON object reply where it supports it.
    pub json_response: bool,
}

pub trait CompletionService: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
