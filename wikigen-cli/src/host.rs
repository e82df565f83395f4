use std::{io::ErrorKind, path::PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use wikigen::{ActiveDocument, HostAdapter, ProviderKind, Settings};

/// Values taken from flags or the environment for a single run. Never saved.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverride {
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl SettingsOverride {
    fn apply(&self, settings: &mut Settings) {
        if let Some(provider) = self.provider {
            settings.provider = provider;
        }
        if let Some(key) = self.api_key.as_ref().filter(|key| !key.is_empty()) {
            settings.api_key = key.clone();
        }
        if let Some(key) = self.gemini_api_key.as_ref().filter(|key| !key.is_empty()) {
            settings.gemini_api_key = key.clone();
        }
    }
}

/// A host where the active document is a file on disk and settings live in a JSON file.
pub struct FileHost {
    document: Option<PathBuf>,
    settings_path: PathBuf,
    overrides: SettingsOverride,
}

impl FileHost {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            document: None,
            settings_path: settings_path.into(),
            overrides: SettingsOverride::default(),
        }
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.document = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: SettingsOverride) -> Self {
        self.overrides = overrides;
        self
    }
}

#[async_trait]
impl HostAdapter for FileHost {
    fn active_document(&self) -> Option<ActiveDocument> {
        self.document
            .as_ref()
            .filter(|path| path.is_file())
            .map(ActiveDocument::new)
    }

    async fn overwrite_active_document(&self, text: &str) -> anyhow::Result<()> {
        let path = self
            .document
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no active document"))?;
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }

    async fn load_settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match tokio::fs::read_to_string(&self.settings_path).await {
            Ok(json) => Settings::from_json(&json)
                .with_context(|| format!("invalid settings file {}", self.settings_path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.settings_path.display(), "No settings file, using defaults");
                Settings::default()
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read {}", self.settings_path.display())
                });
            }
        };
        self.overrides.apply(&mut settings);
        Ok(settings)
    }

    async fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.settings_path, json)
            .await
            .with_context(|| format!("failed to write {}", self.settings_path.display()))
    }
}
