//! Builder pattern implementation for creating DownloadAction instances.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchkit::dest::FileDest;
//! use fetchkit::download::DownloadActionBuilder;
//! use fetchkit::http::{BlockingEngine, HttpClientConfig};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(BlockingEngine::new(&HttpClientConfig::default())?);
//! let mut action = DownloadActionBuilder::new(engine)
//!     .url("https://example.com/data.json")
//!     .dest(FileDest::new("data.json"))
//!     .use_etag(true)
//!     .only_if_modified(true)
//!     .user_agent("MyApp/1.0")
//!     .build();
//! let summary = action.execute()?;
//! println!("{:?}", summary.status());
//! # Ok(())
//! # }
//! ```

use super::action::DownloadAction;
use super::config::ActionConfig;
use super::hash::Checksum;
use crate::dest::Dest;
use crate::http::{HeaderList, HttpEngine};
use crate::progress::{DownloadListener, StyleOptions};
use crate::Result;

use std::sync::Arc;

/// A builder used to create a [`DownloadAction`].
///
/// Every option starts disabled: no conditional headers, no checksum, and a
/// console progress bar unless [`quiet`](Self::quiet) or a
/// [`listener`](Self::listener) is set. A URL and a destination are
/// required; a missing one is reported by
/// [`DownloadAction::execute`] as [`Error::Config`](crate::Error::Config).
///
/// # Example
///
/// ```rust
/// use fetchkit::dest::MemoryDest;
/// use fetchkit::download::DownloadActionBuilder;
/// use fetchkit::http::{create_engine, EngineKind, HttpClientConfig};
///
/// let engine = create_engine(EngineKind::Blocking, &HttpClientConfig::default()).unwrap();
/// let action = DownloadActionBuilder::new(engine)
///     .url("https://example.com/feed.xml")
///     .dest(MemoryDest::new())
///     .header("Accept", "application/xml")
///     .use_etag(true)
///     .quiet(true)
///     .build();
/// assert!(action.config().use_etag);
/// ```
pub struct DownloadActionBuilder {
    engine: Arc<dyn HttpEngine>,
    dest: Option<Box<dyn Dest>>,
    config: ActionConfig,
}

impl DownloadActionBuilder {
    /// Creates a builder with the default options.
    pub fn new(engine: Arc<dyn HttpEngine>) -> Self {
        Self {
            engine,
            dest: None,
            config: ActionConfig::default(),
        }
    }

    /// Sets the URL to download.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = Some(url.into());
        self
    }

    /// Sets the destination.
    pub fn dest(mut self, dest: impl Dest + 'static) -> Self {
        self.dest = Some(Box::new(dest));
        self
    }

    /// Append a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.add(name, value);
        self
    }

    /// Append every header of `headers`.
    pub fn headers(mut self, headers: HeaderList) -> Self {
        self.config
            .headers
            .extend(headers.iter().map(|(n, v)| (n.to_string(), v.to_string())));
        self
    }

    /// User-Agent sent when no `User-Agent` header was configured.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn use_etag(mut self, use_etag: bool) -> Self {
        self.config.use_etag = use_etag;
        self
    }

    pub fn only_if_modified(mut self, only_if_modified: bool) -> Self {
        self.config.only_if_modified = only_if_modified;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config.quiet = quiet;
        self
    }

    /// Set the progress observer.
    pub fn listener(mut self, listener: Arc<dyn DownloadListener>) -> Self {
        self.config.listener = Some(listener);
        self
    }

    /// Set the style of the default console progress bar.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Expect the body to have the given SHA-256 or SHA-512 hex digest.
    ///
    /// # Arguments
    ///
    /// * `hash` - Hex digest; the algorithm is detected from its length
    ///
    /// # Returns
    ///
    /// The builder, or [`Error::Config`](crate::Error::Config) when `hash`
    /// is neither a SHA-256 nor a SHA-512 digest.
    pub fn checksum(mut self, hash: &str) -> Result<Self> {
        self.config.checksum = Some(Checksum::parse(hash)?);
        Ok(self)
    }

    /// Create the [`DownloadAction`] with the specified options.
    pub fn build(self) -> DownloadAction {
        DownloadAction::new(self.engine, self.dest, self.config)
    }
}

impl std::fmt::Debug for DownloadActionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadActionBuilder")
            .field("dest", &self.dest.as_ref().map(|d| d.describe()))
            .field("config", &self.config)
            .finish()
    }
}
