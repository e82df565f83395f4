use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub bearer_token: Option<String>,
    /// Extra headers, e.g. vendor key headers. Values never end up in error text.
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// The vendor HTTP boundary: one JSON POST in, status and raw body out.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self::with_client(reqwest::Client::builder().build()?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(request.url).json(&request.body);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        // reqwest errors print the request url; keep query strings out of messages
        let resp = builder.send().await.map_err(|e| e.without_url())?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| e.without_url())?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::{HttpRequest, HttpResponse, Transport, TransportError};

    pub enum Reply {
        Respond(StatusCode, String),
        Fail(String),
        /// Fails the way reqwest does, naming the request url.
        FailWithUrl,
    }

    /// Answers every request with the same reply and keeps what it was sent.
    pub struct RecordingTransport {
        reply: Reply,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        pub fn respond(status: StatusCode, body: serde_json::Value) -> Self {
            Self::new(Reply::Respond(status, body.to_string()))
        }

        pub fn fail(message: &str) -> Self {
            Self::new(Reply::Fail(message.to_string()))
        }

        pub fn fail_with_url() -> Self {
            Self::new(Reply::FailWithUrl)
        }

        fn new(reply: Reply) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.url.to_string();
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Reply::Respond(status, body) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Reply::Fail(message) => Err(TransportError::Other(message.clone())),
                Reply::FailWithUrl => Err(TransportError::Other(format!(
                    "error sending request for url ({url})"
                ))),
            }
        }
    }
}
