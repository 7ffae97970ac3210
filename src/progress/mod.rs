//! Progress reporting.
//!
//! - `listener` - The [`DownloadListener`] observer trait
//! - `stream` - [`ProgressStream`], a reader reporting cumulative totals
//! - `style` - Progress bar styling options
//! - `display` - [`ConsoleListener`], a terminal progress bar
//!
//! # Examples
//!
//! ```rust
//! use fetchkit::progress::DownloadListener;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! #[derive(Default)]
//! struct LastTotal(AtomicU64);
//!
//! impl DownloadListener for LastTotal {
//!     fn progress(&self, bytes_so_far: u64) {
//!         self.0.store(bytes_so_far, Ordering::Relaxed);
//!     }
//! }
//! ```

pub(crate) mod display;
pub(crate) mod listener;
pub(crate) mod stream;
pub(crate) mod style;

pub use display::ConsoleListener;
pub use listener::{DownloadListener, NoopListener};
pub use stream::ProgressStream;
pub use style::{ProgressBarOpts, StyleOptions};
