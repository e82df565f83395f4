use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub title: String,
    pub path: PathBuf,
    pub state: StatusState,
    pub message: String,
}

/// Persisted status lines, one per generation request, oldest first.
#[derive(Debug, Default)]
pub struct StatusLog {
    entries: Vec<StatusEntry>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index used to update the entry later.
    pub fn start(&mut self, title: &str, path: &Path) -> usize {
        self.entries.push(StatusEntry {
            title: title.to_string(),
            path: path.to_path_buf(),
            state: StatusState::Loading,
            message: format!("'{title}' 문서를 생성하는 중..."),
        });
        self.entries.len() - 1
    }

    pub fn succeed(&mut self, index: usize, message: impl Into<String>) {
        self.finish(index, StatusState::Success, message.into());
    }

    pub fn fail(&mut self, index: usize, message: impl Into<String>) {
        self.finish(index, StatusState::Error, message.into());
    }

    fn finish(&mut self, index: usize, state: StatusState, message: String) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.state = state;
            entry.message = message;
        }
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&StatusEntry> {
        self.entries.last()
    }
}
