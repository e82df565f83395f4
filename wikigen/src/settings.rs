use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
        }
    }

    /// Model ids offered by settings UIs. Free-form ids are still accepted.
    pub fn known_models(self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["gpt-4", "gpt-4-turbo", "gpt-5-nano-2025-08-07"],
            ProviderKind::Gemini => &["gemini-3-pro-preview", "gemini-pro"],
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => f.write_str("openai"),
            ProviderKind::Gemini => f.write_str("gemini"),
        }
    }
}

/// The record a host persists. Missing keys take their default, so a partially
/// written file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub provider: ProviderKind,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            provider: ProviderKind::OpenAi,
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Snapshot of the fields that belong to the active provider.
    pub fn active_provider(&self) -> ProviderConfig {
        match self.provider {
            ProviderKind::OpenAi => ProviderConfig::OpenAi(OpenAiSettings {
                api_key: self.api_key.clone(),
                model: self.model.clone(),
                api_url: Some(self.api_url.trim())
                    .filter(|url| !url.is_empty())
                    .map(str::to_string),
            }),
            ProviderKind::Gemini => ProviderConfig::Gemini(GeminiSettings {
                api_key: self.gemini_api_key.clone(),
                model: self.gemini_model.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    OpenAi(OpenAiSettings),
    Gemini(GeminiSettings),
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::OpenAi(_) => ProviderKind::OpenAi,
            ProviderConfig::Gemini(_) => ProviderKind::Gemini,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
}
