//! Shared utility functions.
//!
//! This module contains header parsing helpers used by the engines and the
//! download orchestrator.
//!
//! - [`content_length`] - Content-Length extraction with an explicit "unknown"
//! - [`http_date`] - Formatting and parsing of HTTP dates

pub mod content_length;
pub mod http_date;

// Re-export commonly used utilities
pub use content_length::parse_content_length;
pub use http_date::{format_http_date, parse_http_date};
