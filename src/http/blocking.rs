//! Engine backed by `reqwest::blocking`.

use super::body::{ReaderBody, ResponseBody};
use super::client::{create_blocking_client, HttpClientConfig};
use super::engine::{permits_body, reason_phrase, EngineRequest, EngineResponse, HttpEngine, RequestParts};
use super::header::HeaderList;
use super::WebBody;
use crate::utils::content_length::parse_content_length;
use crate::{Error, Result};

use reqwest::blocking::{Body, Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::debug;

/// Engine issuing requests through a blocking reqwest client.
///
/// The client, and with it the connection pool and cookie store, is shared
/// by every request this engine creates.
///
/// ```rust,no_run
/// use fetchkit::http::{BlockingEngine, HttpClientConfig};
///
/// let engine = BlockingEngine::new(&HttpClientConfig::default())?;
/// # Ok::<(), fetchkit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BlockingEngine {
    client: Client,
}

impl BlockingEngine {
    /// Build the engine. Must not be called from within an async runtime.
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let client = create_blocking_client(config)
            .map_err(|e| Error::Internal(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpEngine for BlockingEngine {
    fn new_request(&self) -> Box<dyn EngineRequest> {
        Box::new(BlockingRequest {
            client: self.client.clone(),
            parts: RequestParts::default(),
        })
    }
}

struct BlockingRequest {
    client: Client,
    parts: RequestParts,
}

impl EngineRequest for BlockingRequest {
    fn set_url(&mut self, url: Url) {
        self.parts.url = Some(url);
    }

    fn method(&mut self, name: &str, body: Option<Box<dyn WebBody>>) -> Result<()> {
        self.parts.set_method(name, body)
    }

    fn header(&mut self, name: &str, value: &str) {
        self.parts.headers.add(name, value);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.parts.headers.set(name, value);
    }

    fn headers(&self) -> &HeaderList {
        &self.parts.headers
    }

    fn execute(self: Box<Self>) -> Result<Box<dyn EngineResponse>> {
        let BlockingRequest { client, mut parts } = *self;
        let url = parts.require_url()?.clone();
        let headers = parts.headers.to_header_map()?;

        let mut builder = client.request(parts.method.clone(), url.clone()).headers(headers);
        if let Some(mut body) = parts.body.take() {
            if let Some(content_type) = body.content_type() {
                if !parts.headers.contains(CONTENT_TYPE.as_str()) {
                    builder = builder.header(CONTENT_TYPE, content_type);
                }
            }
            let length = body.content_length();
            let reader = body.open().map_err(|e| Error::transport(&url, e))?;
            builder = builder.body(match length {
                Some(len) => Body::sized(reader, len),
                None => Body::new(reader),
            });
        }

        debug!("{} {}", parts.method, url);
        let response = builder.send().map_err(|e| Error::transport(&url, e))?;
        let status = response.status();
        debug!("{} answered {}", url, status);

        Ok(Box::new(BlockingResponse {
            status: status.as_u16(),
            url: response.url().clone(),
            reason: reason_phrase(status),
            headers: HeaderList::from(response.headers()),
            has_body: permits_body(&parts.method, status.as_u16()),
            response: Some(response),
        }))
    }
}

struct BlockingResponse {
    status: u16,
    url: Url,
    reason: String,
    headers: HeaderList,
    has_body: bool,
    response: Option<Response>,
}

impl EngineResponse for BlockingResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn headers(&self) -> &HeaderList {
        &self.headers
    }

    fn take_body(&mut self) -> Option<ResponseBody> {
        if !self.has_body {
            return None;
        }
        let response = self.response.take()?;
        let length = parse_content_length(&self.headers);
        let content_type = self.headers.get(CONTENT_TYPE.as_str()).map(String::from);
        Some(ReaderBody::new(response, length).with_content_type(content_type))
    }

    fn close(&mut self) {
        self.response = None;
    }
}

impl Drop for BlockingResponse {
    fn drop(&mut self) {
        self.close();
    }
}
