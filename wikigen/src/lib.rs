mod dispatch;
mod endpoint;
mod host;
mod llm;
mod prompt;
mod settings;
mod status;
mod transport;
mod workflow;

pub use dispatch::{CallResult, DispatchError, Dispatcher};
pub use endpoint::resolve_base_url;
pub use host::{ActiveDocument, HostAdapter};
pub use llm::{LLM, gemini, openai};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, Prompt, PromptError, PromptTemplate, PromptTemplates};
pub use settings::{
    DEFAULT_API_URL, GeminiSettings, OpenAiSettings, ProviderConfig, ProviderKind, Settings,
};
pub use status::{StatusEntry, StatusLog, StatusState};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use workflow::{GenerationOutcome, generate_active_document};
