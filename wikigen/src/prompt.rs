use std::collections::HashMap;

use dynfmt::Format;
use serde::{Deserialize, Serialize};

use crate::settings::ProviderKind;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that creates encyclopedia-style markdown documents in Korean. Create comprehensive, well-structured content. Return only the markdown content without any explanations or additional text.";

const DOCUMENT_REQUEST: &str = "{title}에 맞는 마크다운 문서 생성. 백과사전 느낌으로, 한국어 문서 생성. 용어는 영어로 사용해도 괜찮다.";
const MATH_REQUEST: &str =
    "수식은 인라인일 때 $수식$, 블록일 때 $$수식$$ 형식으로 작성해줘.";
const RELATED_DOCUMENTS_REQUEST: &str = "문서 마지막에는\n\n---\n\n관련 문서: [[다른 문서명]], [[다른 문서명2]]\n\n이런식으로 형식 맞춰줘. 관련 문서명은 새롭게 추천해서 추가.";

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("프롬프트 템플릿 오류: {0}")]
    Template(String),
}

/// A rendered system + user instruction pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single prompt form for providers without a separate system role.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    pub fn openai_default() -> Self {
        Self::new(
            DEFAULT_SYSTEM_PROMPT,
            [DOCUMENT_REQUEST, MATH_REQUEST, RELATED_DOCUMENTS_REQUEST].join("\n\n"),
        )
    }

    pub fn gemini_default() -> Self {
        Self::new(
            DEFAULT_SYSTEM_PROMPT,
            [DOCUMENT_REQUEST, RELATED_DOCUMENTS_REQUEST].join("\n\n"),
        )
    }

    /// placeholders: {title}
    pub fn render(&self, title: &str) -> Result<Prompt, PromptError> {
        let mut map: HashMap<&str, String> = HashMap::new();
        map.insert("title", title.to_string());

        Ok(Prompt {
            system: format_with(&self.system, &map)?,
            user: format_with(&self.user, &map)?,
        })
    }
}

fn format_with(template: &str, map: &HashMap<&str, String>) -> Result<String, PromptError> {
    dynfmt::SimpleCurlyFormat
        .format(template, map)
        .map(|s| s.into_owned())
        .map_err(|e| PromptError::Template(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub openai: PromptTemplate,
    pub gemini: PromptTemplate,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            openai: PromptTemplate::openai_default(),
            gemini: PromptTemplate::gemini_default(),
        }
    }
}

impl PromptTemplates {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn for_provider(&self, provider: ProviderKind) -> &PromptTemplate {
        match provider {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        prompt::{DEFAULT_SYSTEM_PROMPT, Prompt, PromptTemplate, PromptTemplates},
        settings::ProviderKind,
    };

    #[test]
    fn render_embeds_title() {
        let prompt = PromptTemplate::openai_default().render("양자역학").unwrap();

        assert_eq!(prompt.system, DEFAULT_SYSTEM_PROMPT);
        assert!(prompt.user.starts_with("양자역학에 맞는 마크다운 문서 생성."));
        assert!(prompt.user.contains("관련 문서: [[다른 문서명]], [[다른 문서명2]]"));
        assert!(prompt.user.contains("$$수식$$"));
    }

    #[test]
    fn gemini_default_has_no_math_instruction() {
        let prompt = PromptTemplate::gemini_default().render("고전역학").unwrap();

        assert!(prompt.user.starts_with("고전역학에 맞는 마크다운 문서 생성."));
        assert!(prompt.user.contains("[[다른 문서명2]]"));
        assert!(!prompt.user.contains('$'));
    }

    #[test]
    fn combined_joins_with_blank_line() {
        let prompt = Prompt {
            system: "system".to_string(),
            user: "user".to_string(),
        };
        assert_eq!(prompt.combined(), "system\n\nuser");
    }

    #[test]
    fn partial_template_file_keeps_defaults() {
        let templates = PromptTemplates::from_json(
            r#"{"gemini":{"system":"sys","user":"Write about {title}"}}"#,
        )
        .unwrap();

        assert_eq!(templates.openai, PromptTemplate::openai_default());
        let prompt = templates
            .for_provider(ProviderKind::Gemini)
            .render("Rust")
            .unwrap();
        assert_eq!(prompt.user, "Write about Rust");
        assert_eq!(prompt.system, "sys");
    }
}
