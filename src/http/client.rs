//! HTTP client setup shared by the engines.
//!
//! Both engines are configured from the same [`HttpClientConfig`]. Each
//! client gets its own in-memory cookie store, follows redirects (including
//! `http` to `https`), and applies the optional proxy, default headers and
//! timeouts.
//!
//! # Examples
//!
//! ```rust
//! use fetchkit::http::{create_blocking_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyFetcher/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     headers: Some(headers),
//!     timeout: Some(Duration::from_secs(30)),
//!     ..HttpClientConfig::default()
//! };
//! let client = create_blocking_client(&config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, redirect, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Transient-failure retries, honoured by the middleware engine only.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Total request timeout.
    pub timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Option<Duration>,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 0,
            proxy: None,
            headers: None,
            timeout: None,
            connect_timeout: None,
            max_redirects: 10,
        }
    }
}

/// Creates a blocking reqwest client.
///
/// Must not be called from within an async runtime.
pub fn create_blocking_client(
    config: &HttpClientConfig,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    let mut builder = reqwest::blocking::Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::limited(config.max_redirects))
        // The blocking builder defaults to a 30s timeout; only the config decides.
        .timeout(config.timeout);

    if let Some(ref proxy) = config.proxy {
        builder = builder.proxy(proxy.clone());
    }
    if let Some(ref headers) = config.headers {
        builder = builder.default_headers(headers.clone());
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    builder.build()
}

/// Creates an async HTTP client with middleware configuration.
///
/// This function sets up a reqwest client with:
/// - Tracing middleware for request/response logging
/// - Retry middleware with exponential backoff, when `retries > 0`
/// - The shared cookie, redirect, proxy, header and timeout settings
///
/// # Arguments
///
/// * `config` - Configuration for the HTTP client
///
/// # Returns
///
/// A configured `ClientWithMiddleware`, or the reqwest error raised while
/// building the inner client (e.g. an unusable proxy or TLS backend).
///
/// # Example
///
/// ```rust
/// use fetchkit::http::client::{create_http_client, HttpClientConfig};
///
/// let config = HttpClientConfig {
///     retries: 3,
///     ..HttpClientConfig::default()
/// };
/// let client = create_http_client(&config).unwrap();
/// ```
pub fn create_http_client(config: &HttpClientConfig) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::limited(config.max_redirects));

    if let Some(ref proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy.clone());
    }
    if let Some(ref headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers.clone());
    }
    if let Some(timeout) = config.timeout {
        inner_client_builder = inner_client_builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        inner_client_builder = inner_client_builder.connect_timeout(connect_timeout);
    }

    let inner_client = inner_client_builder.build()?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let mut builder = ClientBuilder::new(inner_client).with(TracingMiddleware::default());
    if config.retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}
