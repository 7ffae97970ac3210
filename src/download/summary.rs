//! Download summary functionality.
//!
//! A [`Summary`] describes the outcome of one successful
//! [`DownloadAction::execute`](super::DownloadAction::execute) run.
//!
//! # Examples
//!
//! ```rust
//! use fetchkit::download::{Status, Summary};
//! use reqwest::Url;
//!
//! let url = Url::parse("https://example.com/file.zip").unwrap();
//! let summary = Summary::new(url, 200).with_status(Status::Downloaded).with_size(1024);
//!
//! match summary.status() {
//!     Status::Downloaded => println!("{} bytes written", summary.size()),
//!     Status::UpToDate => println!("already up to date"),
//!     Status::NoContent => println!("server sent no body"),
//! }
//! ```

use reqwest::Url;

/// Outcome of a download run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The body was transferred into the destination.
    Downloaded,
    /// The destination is current; nothing was transferred.
    UpToDate,
    /// The server answered with success but without a body.
    NoContent,
}

/// Represents a download [`Summary`].
#[derive(Debug, Clone)]
pub struct Summary {
    url: Url,
    statuscode: u16,
    size: u64,
    status: Status,
}

impl Summary {
    /// Create a new [`Summary`], initially [`Status::NoContent`].
    pub fn new(url: Url, statuscode: u16) -> Self {
        Self {
            url,
            statuscode,
            size: 0,
            status: Status::NoContent,
        }
    }

    /// Attach a status.
    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    /// Attach the number of bytes written.
    pub fn with_size(self, size: u64) -> Self {
        Self { size, ..self }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP status code of the response.
    pub fn statuscode(&self) -> u16 {
        self.statuscode
    }

    /// Bytes written to the destination.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Return `true` if nothing had to be transferred.
    pub fn is_up_to_date(&self) -> bool {
        self.status == Status::UpToDate
    }
}
