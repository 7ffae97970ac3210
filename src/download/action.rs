//! Conditional download orchestration.
//!
//! [`DownloadAction::execute`] runs one download attempt:
//!
//! 1. validate the configuration (URL and destination are required);
//! 2. build a `GET` request, adding `If-None-Match` / `If-Modified-Since`
//!    from the destination's cache metadata when enabled;
//! 3. execute it and validate the status (2xx, or 304);
//! 4. decide whether the destination is up to date;
//! 5. otherwise stream the body into the destination, reporting progress;
//! 6. persist the new ETag / Last-Modified after a successful transfer.

use super::config::ActionConfig;
use super::hash::{Checksum, HashingReader};
use super::summary::{Status, Summary};
use crate::dest::Dest;
use crate::http::{EngineResponse, HttpEngine, ResponseBody, WebBody};
use crate::progress::{ConsoleListener, DownloadListener, NoopListener, ProgressStream};
use crate::utils::{format_http_date, parse_http_date};
use crate::{Error, Result};

use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, USER_AGENT};
use reqwest::Url;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One configured download, executed synchronously.
///
/// An action may be executed again (e.g. to refresh a cached file), but a
/// destination must not be shared between two concurrently running
/// actions.
pub struct DownloadAction {
    engine: Arc<dyn HttpEngine>,
    dest: Option<Box<dyn Dest>>,
    config: ActionConfig,
    up_to_date: bool,
}

impl std::fmt::Debug for DownloadAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadAction")
            .field("dest", &self.dest.as_ref().map(|d| d.describe()))
            .field("config", &self.config)
            .field("up_to_date", &self.up_to_date)
            .finish()
    }
}

impl DownloadAction {
    pub(crate) fn new(
        engine: Arc<dyn HttpEngine>,
        dest: Option<Box<dyn Dest>>,
        config: ActionConfig,
    ) -> Self {
        Self {
            engine,
            dest,
            config,
            up_to_date: false,
        }
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.config.url = Some(url.into());
    }

    pub fn set_dest(&mut self, dest: impl Dest + 'static) {
        self.dest = Some(Box::new(dest));
    }

    pub fn dest(&self) -> Option<&dyn Dest> {
        self.dest.as_deref()
    }

    /// Remove the destination from the action.
    pub fn take_dest(&mut self) -> Option<Box<dyn Dest>> {
        self.dest.take()
    }

    /// Whether the last [`execute`](Self::execute) found the destination
    /// up to date.
    pub fn is_up_to_date(&self) -> bool {
        self.up_to_date
    }

    /// Run the download.
    pub fn execute(&mut self) -> Result<Summary> {
        self.up_to_date = false;
        let config = &self.config;

        let raw_url = config
            .url
            .as_deref()
            .ok_or_else(|| Error::Config("no URL configured".into()))?;
        let dest = self
            .dest
            .as_deref_mut()
            .ok_or_else(|| Error::Config("no destination configured".into()))?;
        let url = Url::parse(raw_url).map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", raw_url, e))
        })?;

        let listener: Arc<dyn DownloadListener> = match config.listener {
            Some(ref listener) => listener.clone(),
            None if config.quiet => Arc::new(NoopListener),
            None => Arc::new(ConsoleListener::new(
                config.style_options.clone(),
                dest.describe(),
            )),
        };

        // Build the request.
        let mut request = self.engine.new_request();
        request.set_url(url.clone());
        request.method("GET", None)?;
        for (name, value) in config.headers.iter() {
            request.header(name, value);
        }

        let stored_etag = if config.use_etag {
            dest.etag()
                .map(|etag| etag.trim().to_string())
                .filter(|etag| !etag.is_empty())
        } else {
            None
        };
        if let Some(ref etag) = stored_etag {
            debug!("Sending If-None-Match {} for {}", etag, url);
            request.set_header(IF_NONE_MATCH.as_str(), etag);
        }

        let stored_modified = if config.only_if_modified {
            dest.last_modified()
        } else {
            None
        };
        if let Some(time) = stored_modified {
            let date = format_http_date(time);
            debug!("Sending If-Modified-Since {} for {}", date, url);
            request.set_header(IF_MODIFIED_SINCE.as_str(), &date);
        }

        if let Some(ref user_agent) = config.user_agent {
            if !config.headers.contains(USER_AGENT.as_str()) {
                request.header(USER_AGENT.as_str(), user_agent);
            }
        }

        // Header errors are configuration errors: no event, no I/O.
        request.headers().to_header_map()?;

        listener.connecting();
        debug!("Fetching {}", url);
        let mut response = ResponseGuard(request.execute()?);

        // Check the status for errors.
        let code = response.status();
        if !(200..300).contains(&code) && code != 304 {
            return Err(Error::Status {
                url: url.to_string(),
                code,
                reason: response.reason().to_string(),
            });
        }

        let remote_modified = if config.only_if_modified {
            response
                .headers()
                .get(LAST_MODIFIED.as_str())
                .and_then(parse_http_date)
        } else {
            None
        };

        // ETag only drives the request header, never this decision.
        let up_to_date = code == 304
            || matches!((stored_modified, remote_modified), (Some(local), Some(remote)) if local >= remote);
        self.up_to_date = up_to_date;

        let final_url = response.url().clone();
        if final_url != url {
            debug!("{} was redirected to {}", url, final_url);
        }
        let summary = Summary::new(final_url, code);
        if up_to_date {
            report(config.quiet, format_args!("{} is up to date", dest.describe()));
            return Ok(summary.with_status(Status::UpToDate));
        }

        let Some(body) = response.take_body() else {
            report(config.quiet, format_args!("{} answered {} without a body", url, code));
            return Ok(summary.with_status(Status::NoContent));
        };

        let remote_etag = if config.use_etag {
            response.headers().get(ETAG.as_str()).map(String::from)
        } else {
            None
        };

        let size = transfer(&url, body, dest, listener.as_ref(), config.checksum.as_ref())?;
        drop(response);

        if let Some(time) = remote_modified {
            dest.set_last_modified(time)?;
        }
        if let Some(ref etag) = remote_etag {
            dest.set_etag(etag)?;
        }

        report(
            config.quiet,
            format_args!("Downloaded {} ({} bytes) into {}", url, size, dest.describe()),
        );
        Ok(summary.with_status(Status::Downloaded).with_size(size))
    }
}

/// Closes the engine response on every exit path.
struct ResponseGuard(Box<dyn EngineResponse>);

impl Deref for ResponseGuard {
    type Target = dyn EngineResponse;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for ResponseGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

impl Drop for ResponseGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn report(quiet: bool, message: std::fmt::Arguments<'_>) {
    if quiet {
        debug!("{}", message);
    } else {
        info!("{}", message);
    }
}

/// Stream `body` into `dest` and run the completion callback exactly once.
fn transfer(
    url: &Url,
    body: ResponseBody,
    dest: &mut dyn Dest,
    listener: &dyn DownloadListener,
    checksum: Option<&Checksum>,
) -> Result<u64> {
    let total = body.content_length();
    listener.start(total);
    debug!("Transferring {} into {}", url, dest.describe());

    let outcome = copy_body(url, body, dest, listener, checksum);
    let completed = dest.complete(outcome.is_ok());
    listener.finished(outcome.is_ok() && completed.is_ok());

    match (outcome, completed) {
        (Ok(size), Ok(())) => Ok(size),
        (Ok(_), Err(source)) => Err(Error::Transfer {
            url: url.to_string(),
            source,
        }),
        (Err(e), completed) => {
            if let Err(cleanup) = completed {
                warn!("Cleanup of {} failed: {}", dest.describe(), cleanup);
            }
            Err(e)
        }
    }
}

fn copy_body(
    url: &Url,
    body: ResponseBody,
    dest: &mut dyn Dest,
    listener: &dyn DownloadListener,
    checksum: Option<&Checksum>,
) -> Result<u64> {
    let transfer_error = |source: io::Error| Error::Transfer {
        url: url.to_string(),
        source,
    };

    let reader = body.into_reader().map_err(transfer_error)?;
    let mut stream = ProgressStream::new(reader, listener);
    let mut sink = dest.open().map_err(transfer_error)?;

    let written = match checksum {
        Some(checksum) => {
            let mut hashing = HashingReader::new(&mut stream, checksum.kind());
            let written = io::copy(&mut hashing, &mut sink).map_err(transfer_error)?;
            let actual = hashing.finalize_hex();
            if !checksum.matches(&actual) {
                return Err(Error::ChecksumMismatch {
                    expected: checksum.expected().to_string(),
                    actual,
                });
            }
            written
        }
        None => io::copy(&mut stream, &mut sink).map_err(transfer_error)?,
    };
    sink.flush().map_err(transfer_error)?;
    Ok(written)
}
