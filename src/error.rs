//! Error handling for the fetchkit library.
//!
//! This module provides centralized error handling for every stage of a
//! download: validating the configuration, talking to the transport,
//! interpreting the status code and streaming the body into a destination.
//! All errors implement the standard Error trait and carry enough context
//! (URL, status code, underlying cause) to be logged as-is.

use std::io;
use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can happen when using fetchkit.
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or inconsistent.
    ///
    /// Returned before any network I/O is performed, e.g. when no URL or
    /// destination was configured, or when a request body is missing for a
    /// method that requires one.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport could not complete the request.
    ///
    /// Connection failures, timeouts, TLS errors and protocol errors all
    /// land here. This crate never retries them.
    #[error("Transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The server answered with a status code outside of 2xx and 304.
    #[error("HTTP status {code} {reason} for {url}")]
    Status {
        url: String,
        code: u16,
        reason: String,
    },

    /// Error while copying the response body into the destination.
    #[error("Transfer failed for {url}: {source}")]
    Transfer {
        url: String,
        #[source]
        source: io::Error,
    },

    /// The downloaded bytes do not match the expected digest.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// I/O Error.
    ///
    /// Raised by destination metadata operations outside of the body
    /// transfer itself.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a transport-level cause for `url`.
    pub fn transport(url: impl ToString, source: impl Into<BoxError>) -> Self {
        Error::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    /// Status code carried by an [`Error::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Return `true` for transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

/// Result type alias for operations that can fail with a fetchkit error.
pub type Result<T> = std::result::Result<T, Error>;
