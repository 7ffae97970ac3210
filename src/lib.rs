//! fetchkit performs conditional, progress-tracked HTTP downloads over a
//! pluggable transport.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fetchkit::{BlockingEngine, DownloadActionBuilder, FileDest, HttpClientConfig, Error};
//!
//! # fn main() -> Result<(), Error> {
//! let engine = Arc::new(BlockingEngine::new(&HttpClientConfig::default())?);
//! let mut action = DownloadActionBuilder::new(engine)
//!     .url("https://example.com/archive.zip")
//!     .dest(FileDest::new("output/archive.zip"))
//!     .use_etag(true)
//!     .only_if_modified(true)
//!     .build();
//! let summary = action.execute()?;
//! println!("{:?}, up to date: {}", summary.status(), action.is_up_to_date());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`http`] - Transport abstraction, headers, bodies and the engines
//! - [`dest`] - Download destinations and their cache metadata
//! - [`download`] - The `DownloadAction` orchestrator and checksums
//! - [`progress`] - Progress listeners and progress bar styling
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`utils`] - Header parsing helpers

pub mod dest;
pub mod download;
pub mod error;
pub mod http;
pub mod progress;
pub mod utils;

pub use dest::{Dest, FileDest, MemoryDest};
pub use download::{
    detect_hash_type, verify_hash, Checksum, DownloadAction, DownloadActionBuilder, HashType,
    Status, Summary,
};
pub use error::{Error, Result};
pub use http::{
    create_engine, BlockingEngine, BytesBody, EngineKind, EngineRequest, EngineResponse,
    HeaderList, HttpClientConfig, HttpEngine, MiddlewareEngine, ResponseBody, WebBody,
};
pub use progress::{ConsoleListener, DownloadListener, ProgressBarOpts, StyleOptions};
pub use utils::{format_http_date, parse_content_length, parse_http_date};
