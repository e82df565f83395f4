use serde::Serialize;

use crate::{
    endpoint::resolve_base_url,
    llm::{LLM, gemini::Gemini, openai::OpenAi},
    prompt::{PromptError, PromptTemplates},
    settings::{GeminiSettings, OpenAiSettings, ProviderConfig, ProviderKind, Settings},
    transport::Transport,
};

/// What a host renders after one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallResult {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            error: Some(error.into()),
        }
    }
}

impl From<Result<String, DispatchError>> for CallResult {
    fn from(result: Result<String, DispatchError>) -> Self {
        match result {
            Ok(content) => CallResult::success(content),
            Err(err) => CallResult::failure(err.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{}", missing_credential_message(.0))]
    MissingCredential(ProviderKind),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("{}", empty_response_message(.0))]
    EmptyResponse(ProviderKind),
    #[error("{} API 오류: {message}", provider_name(.provider))]
    Api {
        provider: ProviderKind,
        message: String,
    },
}

impl DispatchError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DispatchError::MissingCredential(_) | DispatchError::Prompt(_)
        )
    }
}

fn missing_credential_message(provider: &ProviderKind) -> &'static str {
    match provider {
        ProviderKind::OpenAi => "API 키가 설정되지 않았습니다. 설정에서 API 키를 입력해주세요.",
        ProviderKind::Gemini => {
            "Gemini API 키가 설정되지 않았습니다. 설정에서 Gemini API 키를 입력해주세요."
        }
    }
}

fn provider_name(provider: &ProviderKind) -> &'static str {
    provider.display_name()
}

fn empty_response_message(provider: &ProviderKind) -> &'static str {
    match provider {
        ProviderKind::OpenAi => "GPT로부터 응답을 받지 못했습니다.",
        ProviderKind::Gemini => "Gemini로부터 응답을 받지 못했습니다.",
    }
}

/// Turns a document title and a settings snapshot into generated markdown.
/// Holds no per-call state; every call builds its own provider client.
pub struct Dispatcher<T: Transport> {
    transport: T,
    templates: PromptTemplates,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            templates: PromptTemplates::default(),
        }
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Never fails: every fault ends up in [`CallResult::error`].
    pub async fn dispatch(&self, title: &str, settings: &Settings) -> CallResult {
        let result = self.try_dispatch(title, &settings.active_provider()).await;
        if let Err(err) = &result {
            tracing::warn!(provider = %settings.provider, error = %err, "Document generation failed");
        }
        result.into()
    }

    #[tracing::instrument(skip_all, fields(provider = %provider.kind(), title = %title))]
    pub async fn try_dispatch(
        &self,
        title: &str,
        provider: &ProviderConfig,
    ) -> Result<String, DispatchError> {
        let kind = provider.kind();
        let text = match provider {
            ProviderConfig::OpenAi(cfg) => self.call_openai(title, cfg).await?,
            ProviderConfig::Gemini(cfg) => self.call_gemini(title, cfg).await?,
        };

        if text.trim().is_empty() {
            return Err(DispatchError::EmptyResponse(kind));
        }
        tracing::info!(chars = text.chars().count(), "Document generated");
        Ok(text)
    }

    async fn call_openai(&self, title: &str, cfg: &OpenAiSettings) -> Result<String, DispatchError> {
        if cfg.api_key.trim().is_empty() {
            return Err(DispatchError::MissingCredential(ProviderKind::OpenAi));
        }
        let prompt = self.templates.openai.render(title)?;

        let base_url = resolve_base_url(cfg.api_url.as_deref());
        let client = OpenAi::new(&self.transport, base_url, &cfg.api_key, &cfg.model);
        client.generate(&prompt).await.map_err(|err| DispatchError::Api {
            provider: ProviderKind::OpenAi,
            message: err.to_string(),
        })
    }

    async fn call_gemini(&self, title: &str, cfg: &GeminiSettings) -> Result<String, DispatchError> {
        if cfg.api_key.trim().is_empty() {
            return Err(DispatchError::MissingCredential(ProviderKind::Gemini));
        }
        let prompt = self.templates.gemini.render(title)?;

        let client = Gemini::new(&self.transport, &cfg.api_key, &cfg.model);
        client.generate(&prompt).await.map_err(|err| DispatchError::Api {
            provider: ProviderKind::Gemini,
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::{
        dispatch::{CallResult, DispatchError, Dispatcher},
        prompt::{PromptTemplate, PromptTemplates},
        settings::{ProviderKind, Settings},
        transport::testing::RecordingTransport,
    };

    fn openai_settings(api_key: &str) -> Settings {
        Settings {
            api_key: api_key.to_string(),
            ..Settings::default()
        }
    }

    fn gemini_settings(api_key: &str) -> Settings {
        Settings {
            provider: ProviderKind::Gemini,
            gemini_api_key: api_key.to_string(),
            // inactive provider's key must not satisfy validation
            api_key: "sk-unused".to_string(),
            ..Settings::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn quantum_mechanics_document_via_openai() {
        let document = "# 양자역학\n...\n---\n관련 문서: [[고전역학]]";
        let dispatcher =
            Dispatcher::new(RecordingTransport::respond(StatusCode::OK, completion(document)));

        let result = dispatcher.dispatch("양자역학", &openai_settings("sk-test")).await;

        assert_eq!(result, CallResult::success(document));
        assert_eq!(result.error, None);

        let requests = dispatcher.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        let user = requests[0].body["messages"][1]["content"].as_str().unwrap();
        assert!(user.starts_with("양자역학에 맞는"));
    }

    #[tokio::test]
    async fn missing_openai_key_never_reaches_transport() {
        let dispatcher =
            Dispatcher::new(RecordingTransport::respond(StatusCode::OK, completion("x")));

        for key in ["", "   "] {
            let result = dispatcher.dispatch("양자역학", &openai_settings(key)).await;
            assert_eq!(result.content, "");
            assert_eq!(
                result.error.as_deref(),
                Some("API 키가 설정되지 않았습니다. 설정에서 API 키를 입력해주세요.")
            );
        }
        assert_eq!(dispatcher.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn missing_gemini_key_mentions_gemini() {
        let dispatcher =
            Dispatcher::new(RecordingTransport::respond(StatusCode::OK, json!({})));

        let result = dispatcher.dispatch("양자역학", &gemini_settings("")).await;

        assert_eq!(result.content, "");
        let error = result.error.unwrap();
        assert!(error.contains("Gemini API 키"));
        assert_eq!(dispatcher.transport().call_count(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_reported_not_raised() {
        let dispatcher = Dispatcher::new(RecordingTransport::fail("connection refused"));

        let result = dispatcher.dispatch("양자역학", &openai_settings("sk-test")).await;

        assert_eq!(result.content, "");
        assert_eq!(
            result.error.as_deref(),
            Some("OpenAI API 오류: connection refused")
        );

        let result = dispatcher.dispatch("양자역학", &gemini_settings("AIza")).await;
        assert_eq!(
            result.error.as_deref(),
            Some("Gemini API 오류: connection refused")
        );
    }

    #[tokio::test]
    async fn failed_gemini_request_keeps_key_out_of_error() {
        let dispatcher = Dispatcher::new(RecordingTransport::fail_with_url());

        let result = dispatcher
            .dispatch("양자역학", &gemini_settings("AIza-SECRET-KEY"))
            .await;

        let error = result.error.unwrap();
        assert!(error.starts_with("Gemini API 오류: error sending request for url"));
        assert!(!error.contains("AIza-SECRET-KEY"), "{error}");
        assert_eq!(dispatcher.transport().call_count(), 1);
    }

    #[tokio::test]
    async fn api_error_carries_vendor_message() {
        let dispatcher = Dispatcher::new(RecordingTransport::respond(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"message": "Rate limit reached"}}),
        ));

        let result = dispatcher.dispatch("양자역학", &openai_settings("sk-test")).await;

        let error = result.error.unwrap();
        assert!(error.starts_with("OpenAI API 오류: "));
        assert!(error.contains("Rate limit reached"));
        assert_eq!(dispatcher.transport().call_count(), 1);
    }

    #[tokio::test]
    async fn empty_completion_is_no_response_error() {
        let dispatcher =
            Dispatcher::new(RecordingTransport::respond(StatusCode::OK, completion("  \n")));
        let result = dispatcher.dispatch("양자역학", &openai_settings("sk-test")).await;
        assert_eq!(result, CallResult::failure("GPT로부터 응답을 받지 못했습니다."));

        let dispatcher = Dispatcher::new(RecordingTransport::respond(
            StatusCode::OK,
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
        ));
        let err = dispatcher
            .try_dispatch("양자역학", &openai_settings("sk-test").active_provider())
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::EmptyResponse(ProviderKind::OpenAi)));

        let dispatcher =
            Dispatcher::new(RecordingTransport::respond(StatusCode::OK, json!({})));
        let result = dispatcher.dispatch("양자역학", &gemini_settings("AIza")).await;
        assert_eq!(result, CallResult::failure("Gemini로부터 응답을 받지 못했습니다."));
    }

    #[tokio::test]
    async fn gemini_uses_its_own_template_and_model() {
        let dispatcher = Dispatcher::new(RecordingTransport::respond(
            StatusCode::OK,
            json!({"candidates": [{"content": {"parts": [{"text": "# Rust"}]}}]}),
        ))
        .with_templates(PromptTemplates {
            gemini: PromptTemplate::new("sys", "about {title}"),
            ..PromptTemplates::default()
        });

        let result = dispatcher.dispatch("Rust", &gemini_settings("AIza")).await;
        assert_eq!(result, CallResult::success("# Rust"));

        let request = &dispatcher.transport().requests()[0];
        assert!(
            request
                .url
                .as_str()
                .contains("/models/gemini-3-pro-preview:generateContent")
        );
        assert_eq!(
            request.body["contents"][0]["parts"][0]["text"],
            "sys\n\nabout Rust"
        );
    }

    #[tokio::test]
    async fn custom_endpoint_is_normalized() {
        let dispatcher =
            Dispatcher::new(RecordingTransport::respond(StatusCode::OK, completion("ok")));
        let settings = Settings {
            api_url: "https://proxy.example.com/openai/v1/chat/completions/".to_string(),
            ..openai_settings("sk-test")
        };

        dispatcher.dispatch("양자역학", &settings).await;

        assert_eq!(
            dispatcher.transport().requests()[0].url.as_str(),
            "https://proxy.example.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn configuration_errors_are_distinguished() {
        assert!(DispatchError::MissingCredential(ProviderKind::Gemini).is_configuration_error());
        assert!(!DispatchError::EmptyResponse(ProviderKind::Gemini).is_configuration_error());
    }
}
