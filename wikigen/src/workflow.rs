use crate::{
    dispatch::Dispatcher,
    host::HostAdapter,
    status::StatusLog,
    transport::Transport,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    NoActiveDocument,
    NotMarkdown,
    /// Settings could not be read, or the dispatcher reported an error.
    Failed(String),
    Saved { title: String },
    /// Generation succeeded but the document could not be written.
    SaveFailed(String),
}

impl GenerationOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, GenerationOutcome::Saved { .. })
    }
}

/// Generate a document for the host's active note and overwrite it.
#[tracing::instrument(skip_all)]
pub async fn generate_active_document<H, T>(
    host: &H,
    dispatcher: &Dispatcher<T>,
    status: &mut StatusLog,
) -> GenerationOutcome
where
    H: HostAdapter + ?Sized,
    T: Transport,
{
    let Some(document) = host.active_document() else {
        host.notify("열린 문서가 없습니다.");
        return GenerationOutcome::NoActiveDocument;
    };
    if !document.is_markdown() {
        host.notify("마크다운 파일만 편집할 수 있습니다.");
        return GenerationOutcome::NotMarkdown;
    }

    let title = document.title();
    let entry = status.start(&title, document.path());
    tracing::info!(title = %title, "Generating document");

    let settings = match host.load_settings().await {
        Ok(settings) => settings,
        Err(err) => {
            let message = format!("설정을 불러오지 못했습니다: {err}");
            host.notify(&message);
            status.fail(entry, format!("'{title}' 문서 생성 실패: {message}"));
            return GenerationOutcome::Failed(message);
        }
    };

    let result = dispatcher.dispatch(&title, &settings).await;
    if let Some(error) = result.error {
        host.notify(&error);
        status.fail(entry, format!("'{title}' 문서 생성 실패: {error}"));
        return GenerationOutcome::Failed(error);
    }

    match host.overwrite_active_document(&result.content).await {
        Ok(()) => {
            host.notify(&format!("'{title}' 문서 생성이 완료되었습니다!"));
            status.succeed(entry, format!("'{title}' 문서 생성 완료!"));
            GenerationOutcome::Saved { title }
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to write generated document");
            host.notify(&format!("문서 저장 오류: {err}"));
            status.fail(entry, format!("'{title}' 문서 저장 오류: {err}"));
            GenerationOutcome::SaveFailed(err.to_string())
        }
    }
}
