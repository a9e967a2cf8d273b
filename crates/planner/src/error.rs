use thiserror::Error;
use venture_core::ValidationError;

/// Failures talking to the completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("completion request timed out")]
    Timeout,

    #[error("completion service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("completion envelope could not be decoded: {0}")]
    Decode(String),

    #[error("completion reply had no message content")]
    EmptyReply,
}

impl From<reqwest::Error> for CompletionError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(error)
        }
    }
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("place lookup failed: {0:#}")]
    Store(anyhow::Error),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Failed to parse JSON response from the model.")]
    MalformedReply(#[source] serde_json::Error),
}
