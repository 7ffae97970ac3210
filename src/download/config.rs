//! Configuration structures and defaults for the download action.

use super::hash::Checksum;
use crate::http::HeaderList;
use crate::progress::{DownloadListener, StyleOptions};

use std::sync::Arc;

/// Configuration of a [`DownloadAction`](super::DownloadAction).
#[derive(Clone, Default)]
pub struct ActionConfig {
    /// URL to fetch.
    pub url: Option<String>,
    /// Extra request headers.
    pub headers: HeaderList,
    /// User-Agent sent unless `headers` already carries one.
    pub user_agent: Option<String>,
    /// Send `If-None-Match` from the stored ETag and persist the new one.
    pub use_etag: bool,
    /// Send `If-Modified-Since` from the stored timestamp, compare and
    /// persist Last-Modified.
    pub only_if_modified: bool,
    /// Suppress the default progress bar and lower per-run logging.
    pub quiet: bool,
    /// Progress observer; a console bar is used when unset and not quiet.
    pub listener: Option<Arc<dyn DownloadListener>>,
    /// Style of the default console bar.
    pub style_options: StyleOptions,
    /// Expected digest of the body.
    pub checksum: Option<Checksum>,
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("user_agent", &self.user_agent)
            .field("use_etag", &self.use_etag)
            .field("only_if_modified", &self.only_if_modified)
            .field("quiet", &self.quiet)
            .field("listener", &self.listener.is_some())
            .field("style_options", &self.style_options)
            .field("checksum", &self.checksum)
            .finish()
    }
}
