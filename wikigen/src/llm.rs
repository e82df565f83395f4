use async_trait::async_trait;

use crate::prompt::Prompt;

pub mod gemini;
pub mod openai;

#[async_trait]
pub trait LLM {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Empty string when the provider answered without any text.
    async fn generate(&self, prompt: &Prompt) -> Result<String, Self::Error>;
}

/// Both vendors wrap failures as `{"error": {"message": ...}}`; fall back to the raw body.
pub(crate) fn api_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }

    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}
