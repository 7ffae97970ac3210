//! Download destinations.
//!
//! A [`Dest`] owns the sink the response body is written into, together
//! with the cache metadata (ETag, Last-Modified) used to build conditional
//! requests on the next run.
//!
//! # Lifecycle
//!
//! 1. The orchestrator reads [`Dest::etag`] and [`Dest::last_modified`]
//!    while building the request.
//! 2. If a body is transferred, [`Dest::open`] is called once and the
//!    returned writer is dropped before [`Dest::complete`] runs.
//! 3. [`Dest::complete`] runs exactly once per attempted transfer, with
//!    `success = false` if anything went wrong, so partial output can be
//!    discarded.
//! 4. Only after a successful completion are [`Dest::set_last_modified`]
//!    and [`Dest::set_etag`] called.
//!
//! # Examples
//!
//! ```rust
//! use fetchkit::dest::{Dest, MemoryDest};
//! use std::io::Write;
//!
//! let mut dest = MemoryDest::new();
//! {
//!     let mut sink = dest.open().unwrap();
//!     sink.write_all(b"hello").unwrap();
//! }
//! dest.complete(true).unwrap();
//! assert_eq!(dest.data(), b"hello");
//! ```

pub mod file;
pub mod memory;

pub use file::FileDest;
pub use memory::MemoryDest;

use std::io::{self, Write};
use std::time::SystemTime;

/// Output sink plus persisted cache metadata.
pub trait Dest: Send {
    /// Open the output sink for a new transfer.
    fn open(&mut self) -> io::Result<Box<dyn Write + '_>>;

    /// Stored ETag, verbatim.
    fn etag(&self) -> Option<String>;

    fn set_etag(&mut self, etag: &str) -> io::Result<()>;

    /// Stored Last-Modified timestamp.
    fn last_modified(&self) -> Option<SystemTime>;

    fn set_last_modified(&mut self, time: SystemTime) -> io::Result<()>;

    /// Completion callback, invoked once per attempted transfer.
    fn complete(&mut self, success: bool) -> io::Result<()>;

    /// Human readable description used in log lines.
    fn describe(&self) -> String {
        String::from("<dest>")
    }
}
