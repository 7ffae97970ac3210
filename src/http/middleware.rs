//! Engine backed by the async reqwest client and its middleware stack.
//!
//! The engine owns a small tokio runtime and blocks on it for every
//! network step, so callers keep the same synchronous contract as with the
//! blocking engine. The response body is pulled chunk by chunk through a
//! [`Read`] adapter.

use super::body::{read_to_vec, ReaderBody, ResponseBody};
use super::client::{create_http_client, HttpClientConfig};
use super::engine::{permits_body, reason_phrase, EngineRequest, EngineResponse, HttpEngine, RequestParts};
use super::header::HeaderList;
use super::WebBody;
use crate::utils::content_length::parse_content_length;
use crate::{Error, Result};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::io::{self, Read};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Engine issuing requests through [`ClientWithMiddleware`].
///
/// Requests go through the tracing middleware and, when
/// [`HttpClientConfig::retries`] is non-zero, the transient retry policy.
/// Must not be used from within another async runtime.
#[derive(Clone)]
pub struct MiddlewareEngine {
    client: ClientWithMiddleware,
    runtime: Arc<Runtime>,
}

impl std::fmt::Debug for MiddlewareEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareEngine").finish_non_exhaustive()
    }
}

impl MiddlewareEngine {
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("fetchkit-io")
            .enable_all()
            .build()
            .map_err(|e| Error::Internal(format!("cannot start runtime: {e}")))?;
        let client = create_http_client(config)
            .map_err(|e| Error::Internal(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }
}

impl HttpEngine for MiddlewareEngine {
    fn new_request(&self) -> Box<dyn EngineRequest> {
        Box::new(MiddlewareRequest {
            engine: self.clone(),
            parts: RequestParts::default(),
        })
    }
}

struct MiddlewareRequest {
    engine: MiddlewareEngine,
    parts: RequestParts,
}

impl EngineRequest for MiddlewareRequest {
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
        let MiddlewareRequest { engine, mut parts } = *self;
        let url = parts.require_url()?.clone();
        let headers = parts.headers.to_header_map()?;

        let mut builder = engine
            .client
            .request(parts.method.clone(), url.clone())
            .headers(headers);
        if let Some(mut body) = parts.body.take() {
            if let Some(content_type) = body.content_type() {
                if !parts.headers.contains(CONTENT_TYPE.as_str()) {
                    builder = builder.header(CONTENT_TYPE, content_type);
                }
            }
            // The async client wants an owned payload; the body is opened once here.
            let payload = read_to_vec(body.as_mut()).map_err(|e| Error::transport(&url, e))?;
            builder = builder.body(payload);
        }

        debug!("{} {}", parts.method, url);
        let response = engine
            .runtime
            .block_on(builder.send())
            .map_err(|e| Error::transport(&url, e))?;
        let status = response.status();
        debug!("{} answered {}", url, status);

        Ok(Box::new(MiddlewareResponse {
            status: status.as_u16(),
            url: response.url().clone(),
            reason: reason_phrase(status),
            headers: HeaderList::from(response.headers()),
            has_body: permits_body(&parts.method, status.as_u16()),
            runtime: engine.runtime,
            response: Some(response),
        }))
    }
}

struct MiddlewareResponse {
    status: u16,
    url: Url,
    reason: String,
    headers: HeaderList,
    has_body: bool,
    runtime: Arc<Runtime>,
    response: Option<Response>,
}

impl EngineResponse for MiddlewareResponse {
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
        let reader = ChunkReader {
            runtime: self.runtime.clone(),
            response,
            pending: Vec::new(),
            offset: 0,
        };
        Some(ReaderBody::new(reader, length).with_content_type(content_type))
    }

    fn close(&mut self) {
        self.response = None;
    }
}

impl Drop for MiddlewareResponse {
    fn drop(&mut self) {
        self.close();
    }
}

/// Blocking reader over an async response body.
struct ChunkReader {
    runtime: Arc<Runtime>,
    response: Response,
    pending: Vec<u8>,
    offset: usize,
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.offset >= self.pending.len() {
            match self.runtime.block_on(self.response.chunk()) {
                Ok(Some(chunk)) => {
                    self.pending = chunk.to_vec();
                    self.offset = 0;
                }
                Ok(None) => return Ok(0),
                Err(e) => return Err(io::Error::other(e)),
            }
        }
        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        Ok(n)
    }
}
