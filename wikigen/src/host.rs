use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    path: PathBuf,
}

impl ActiveDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its extension.
    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_markdown(&self) -> bool {
        self.path.to_string_lossy().ends_with(".md")
    }
}

/// What the generation workflow needs from the application hosting it.
#[async_trait]
pub trait HostAdapter: Send + Sync {
    fn active_document(&self) -> Option<ActiveDocument>;

    fn active_document_title(&self) -> Option<String> {
        self.active_document().map(|doc| doc.title())
    }

    async fn overwrite_active_document(&self, text: &str) -> anyhow::Result<()>;

    /// Transient, user visible message.
    fn notify(&self, message: &str);

    async fn load_settings(&self) -> anyhow::Result<Settings>;

    async fn save_settings(&self, settings: &Settings) -> anyhow::Result<()>;
}
