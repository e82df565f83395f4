use async_trait::async_trait;
use url::Url;

use crate::{
    llm::{LLM, api_error_message},
    prompt::Prompt,
    transport::{HttpRequest, Transport, TransportError},
};

/// Client for an OpenAI-compatible chat completion API.
pub struct OpenAi<'a, T: Transport> {
    transport: &'a T,
    base_url: String,
    api_key: &'a str,
    model: &'a str,
}

impl<'a, T: Transport> OpenAi<'a, T> {
    pub fn new(
        transport: &'a T,
        base_url: impl Into<String>,
        api_key: &'a str,
        model: &'a str,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key,
            model,
        }
    }

    fn completions_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{status} {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
}

#[async_trait]
impl<T: Transport> LLM for OpenAi<'_, T> {
    type Error = OpenAiError;

    async fn generate(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        use json_model::*;

        let req_body = ChatCompletionRequest {
            model: self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let request = HttpRequest {
            url: self.completions_url()?,
            bearer_token: Some(self.api_key.to_string()),
            headers: Vec::new(),
            body: serde_json::to_value(&req_body)?,
        };

        tracing::debug!(model = self.model, "Sending chat completion request");
        let resp = self.transport.post_json(request).await?;
        if !resp.status.is_success() {
            return Err(OpenAiError::Api {
                status: resp.status,
                message: api_error_message(&resp.body),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&resp.body)?;
        let answer = parsed
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Ok(answer)
    }
}

mod json_model {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    pub struct ChatMessage<'a> {
        pub role: &'a str,
        pub content: &'a str,
    }

    #[derive(Serialize)]
    pub struct ChatCompletionRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage<'a>>,
    }

    #[derive(Deserialize)]
    pub struct ChatCompletionResponse {
        pub choices: Option<Vec<Choice>>,
    }

    #[derive(Deserialize)]
    pub struct Choice {
        pub message: Option<ChoiceMessage>,
        // finish_reason / logprobs ...
    }

    #[derive(Deserialize)]
    pub struct ChoiceMessage {
        pub content: Option<String>,
    }
}
