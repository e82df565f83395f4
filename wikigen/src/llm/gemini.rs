use async_trait::async_trait;
use url::Url;

use crate::{
    llm::{LLM, api_error_message},
    prompt::Prompt,
    transport::{HttpRequest, Transport, TransportError},
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct Gemini<'a, T: Transport> {
    transport: &'a T,
    api_key: &'a str,
    model: &'a str,
}

impl<'a, T: Transport> Gemini<'a, T> {
    pub fn new(transport: &'a T, api_key: &'a str, model: &'a str) -> Self {
        Self {
            transport,
            api_key,
            model,
        }
    }

    // the key travels in a header so it never shows up in a url
    fn generate_content_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent",
            self.model
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
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
impl<T: Transport> LLM for Gemini<'_, T> {
    type Error = GeminiError;

    async fn generate(&self, prompt: &Prompt) -> Result<String, Self::Error> {
        use json_model::*;

        let req_body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: prompt.combined(),
                }],
            }],
        };

        let request = HttpRequest {
            url: self.generate_content_url()?,
            bearer_token: None,
            headers: vec![(API_KEY_HEADER, self.api_key.to_string())],
            body: serde_json::to_value(&req_body)?,
        };

        tracing::debug!(model = self.model, "Sending generateContent request");
        let resp = self.transport.post_json(request).await?;
        if !resp.status.is_success() {
            return Err(GeminiError::Api {
                status: resp.status,
                message: api_error_message(&resp.body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&resp.body)?;
        let answer = parsed
            .candidates
            .and_then(|cands| cands.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(answer)
    }
}

mod json_model {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    pub struct Part {
        pub text: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    pub struct Content {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub role: Option<String>,
        pub parts: Vec<Part>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    pub struct GenerateContentRequest {
        pub contents: Vec<Content>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub struct GenerateContentResponse {
        pub candidates: Option<Vec<Candidate>>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub struct Candidate {
        // a candidate stopped for safety reasons carries no content
        pub content: Option<CandidateContent>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub struct CandidateContent {
        pub parts: Option<Vec<CandidatePart>>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub struct CandidatePart {
        pub text: Option<String>,
    }
}
