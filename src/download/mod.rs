//! Download orchestration.
//!
//! This module provides [`DownloadAction`], which performs conditional,
//! progress-tracked downloads into a [`Dest`](crate::dest::Dest) over any
//! [`HttpEngine`](crate::http::HttpEngine).
//!
//! # Overview
//!
//! - `action` - The orchestrator itself
//! - `builder` - [`DownloadActionBuilder`] for configuring an action
//! - `config` - Configuration structure with defaults
//! - [`summary`] - Outcome of a run
//! - [`hash`] - Checksum verification
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchkit::dest::MemoryDest;
//! use fetchkit::download::{DownloadActionBuilder, Status};
//! use fetchkit::http::{create_engine, EngineKind, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = create_engine(EngineKind::Middleware, &HttpClientConfig::default())?;
//! let dest = MemoryDest::new();
//! let mut action = DownloadActionBuilder::new(engine)
//!     .url("https://example.com/feed.xml")
//!     .dest(dest.clone())
//!     .use_etag(true)
//!     .quiet(true)
//!     .build();
//!
//! if action.execute()?.status() == Status::Downloaded {
//!     println!("{} bytes", dest.data().len());
//! }
//! // The second run sends If-None-Match with the stored ETag.
//! action.execute()?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod action;
pub(crate) mod builder;
pub(crate) mod config;
pub mod hash;
pub mod summary;

pub use action::DownloadAction;
pub use builder::DownloadActionBuilder;
pub use config::ActionConfig;
pub use hash::{detect_hash_type, verify_hash, Checksum, HashType};
pub use summary::{Status, Summary};
