use std::collections::VecDeque;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fetchkit::http::{
    EngineRequest, EngineResponse, HeaderList, HttpEngine, ReaderBody, ResponseBody, WebBody,
};
use fetchkit::progress::DownloadListener;
use fetchkit::{parse_content_length, Error, Result};
use reqwest::Url;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use wiremock::{Mock, MockServer};

// Common test constants
pub const TEST_URL: &str = "http://files.example.com/data.bin";
pub const TEST_USER_AGENT: &str = "fetchkit-test-agent";
pub const HELLO_BODY: &[u8] = b"hello world";
pub const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

/// Routes library logs to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// A whole-second timestamp `secs` after the epoch, so it survives an
/// HTTP-date round trip.
pub fn timestamp(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Asserts that a file holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = std::fs::read(path).expect("Failed to read file");
    assert_eq!(content, expected, "File content mismatch at path: {:?}", path);
}

// === Scripted engine ===

/// How a scripted body behaves when read.
pub enum ScriptedBody {
    /// Yields all bytes, then EOF.
    Complete(Vec<u8>),
    /// Yields the bytes, then fails with a connection reset.
    Broken(Vec<u8>),
}

/// A canned response replayed by [`ScriptedEngine`].
pub struct ScriptedResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderList,
    pub body: Option<ScriptedBody>,
    /// Final URL reported after a simulated redirect.
    pub redirected_to: Option<Url>,
}

impl ScriptedResponse {
    /// A `200 OK` carrying `body` with a matching Content-Length.
    pub fn ok(body: &[u8]) -> Self {
        Self::status(200, "OK")
            .header("Content-Length", &body.len().to_string())
            .body(body)
    }

    /// A response without a body.
    pub fn status(status: u16, reason: &str) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            headers: HeaderList::new(),
            body: None,
            redirected_to: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = Some(ScriptedBody::Complete(body.to_vec()));
        self
    }

    /// Report `url` as the final URL, as if a redirect was followed.
    pub fn redirected_to(mut self, url: &str) -> Self {
        self.redirected_to = Some(Url::parse(url).expect("invalid redirect URL"));
        self
    }

    /// Replace the body by one that breaks after `partial`.
    pub fn broken_body(mut self, partial: &[u8]) -> Self {
        self.body = Some(ScriptedBody::Broken(partial.to_vec()));
        self
    }
}

/// A request as the engine received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: Url,
    pub method: String,
    pub headers: HeaderList,
}

#[derive(Default)]
struct Shared {
    script: Mutex<VecDeque<std::result::Result<ScriptedResponse, io::ErrorKind>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    closes: Mutex<usize>,
}

/// An in-process [`HttpEngine`] replaying canned responses in order.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    shared: Arc<Shared>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request.
    pub fn respond(self, response: ScriptedResponse) -> Self {
        self.shared.script.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a transport failure for the next request.
    pub fn fail(self, kind: io::ErrorKind) -> Self {
        self.shared.script.lock().unwrap().push_back(Err(kind));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request was executed")
    }

    /// Number of responses closed so far.
    pub fn closes(&self) -> usize {
        *self.shared.closes.lock().unwrap()
    }

    pub fn into_engine(self) -> Arc<dyn HttpEngine> {
        Arc::new(self)
    }
}

impl HttpEngine for ScriptedEngine {
    fn new_request(&self) -> Box<dyn EngineRequest> {
        Box::new(ScriptedRequest {
            shared: self.shared.clone(),
            url: None,
            method: "GET".to_string(),
            headers: HeaderList::new(),
        })
    }
}

struct ScriptedRequest {
    shared: Arc<Shared>,
    url: Option<Url>,
    method: String,
    headers: HeaderList,
}

impl EngineRequest for ScriptedRequest {
    fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    fn method(&mut self, name: &str, _body: Option<Box<dyn WebBody>>) -> Result<()> {
        self.method = name.to_string();
        Ok(())
    }

    fn header(&mut self, name: &str, value: &str) {
        self.headers.add(name, value);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    fn headers(&self) -> &HeaderList {
        &self.headers
    }

    fn execute(self: Box<Self>) -> Result<Box<dyn EngineResponse>> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| Error::Config("no URL set".into()))?;
        self.shared.requests.lock().unwrap().push(RecordedRequest {
            url: url.clone(),
            method: self.method.clone(),
            headers: self.headers.clone(),
        });

        let next = self
            .shared
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: script exhausted");
        match next {
            Ok(response) => Ok(Box::new(ScriptedHandle {
                shared: self.shared.clone(),
                url: response.redirected_to.clone().unwrap_or(url),
                response,
                closed: false,
            })),
            Err(kind) => Err(Error::transport(
                url,
                io::Error::new(kind, "scripted transport failure"),
            )),
        }
    }
}

struct ScriptedHandle {
    shared: Arc<Shared>,
    url: Url,
    response: ScriptedResponse,
    closed: bool,
}

impl EngineResponse for ScriptedHandle {
    fn status(&self) -> u16 {
        self.response.status
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn reason(&self) -> &str {
        &self.response.reason
    }

    fn headers(&self) -> &HeaderList {
        &self.response.headers
    }

    fn take_body(&mut self) -> Option<ResponseBody> {
        let length = parse_content_length(&self.response.headers);
        let reader: Box<dyn Read + Send> = match self.response.body.take()? {
            ScriptedBody::Complete(data) => Box::new(Cursor::new(data)),
            ScriptedBody::Broken(data) => Box::new(Cursor::new(data).chain(BrokenReader)),
        };
        Some(ReaderBody::new(reader, length))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            *self.shared.closes.lock().unwrap() += 1;
        }
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
    }
}

// === Listener ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Connecting,
    Start(Option<u64>),
    Progress(u64),
    Finished(bool),
}

/// Records every listener callback in order.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(total) => Some(total),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl DownloadListener for RecordingListener {
    fn connecting(&self) {
        self.push(Event::Connecting);
    }

    fn start(&self, length: Option<u64>) {
        self.push(Event::Start(length));
    }

    fn progress(&self, total: u64) {
        self.push(Event::Progress(total));
    }

    fn finished(&self, success: bool) {
        self.push(Event::Finished(success));
    }
}

// === Mock server ===

/// A wiremock server driven from synchronous tests.
///
/// The engines must not run inside an async context, so the server lives on
/// its own runtime and tests talk to it from the plain test thread.
pub struct TestServer {
    // Dropped before the runtime.
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        init_tracing();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build test runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    pub fn received(&self) -> Vec<wiremock::Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}
