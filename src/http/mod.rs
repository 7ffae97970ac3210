//! HTTP transport layer.
//!
//! This module defines the transport-agnostic request/response contract
//! used by the download orchestrator, together with the concrete engines
//! implementing it.
//!
//! # Overview
//!
//! - [`header`] - Ordered, case-insensitive [`HeaderList`]
//! - [`body`] - The [`WebBody`] payload abstraction
//! - [`engine`] - [`HttpEngine`], [`EngineRequest`] and [`EngineResponse`]
//! - [`client`] - Shared client configuration
//! - [`blocking`] / [`middleware`] - The two engines
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchkit::http::{create_engine, EngineKind, HttpClientConfig};
//! use reqwest::Url;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = create_engine(EngineKind::Blocking, &HttpClientConfig::default())?;
//! let mut request = engine.new_request();
//! request.set_url(Url::parse("https://example.com/")?);
//! request.method("GET", None)?;
//! let response = request.execute()?;
//! println!("{} {}", response.status(), response.reason());
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod body;
pub mod client;
pub mod engine;
pub mod header;
pub mod middleware;

pub use blocking::BlockingEngine;
pub use body::{BytesBody, ReaderBody, ResponseBody, WebBody};
pub use client::{create_blocking_client, create_http_client, HttpClientConfig};
pub use engine::{EngineRequest, EngineResponse, HttpEngine, RequestParts};
pub use header::HeaderList;
pub use middleware::MiddlewareEngine;

use crate::Result;
use std::sync::Arc;

/// Available engine implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    /// [`BlockingEngine`].
    #[default]
    Blocking,
    /// [`MiddlewareEngine`].
    Middleware,
}

/// Build the engine of the given kind.
pub fn create_engine(kind: EngineKind, config: &HttpClientConfig) -> Result<Arc<dyn HttpEngine>> {
    Ok(match kind {
        EngineKind::Blocking => Arc::new(BlockingEngine::new(config)?),
        EngineKind::Middleware => Arc::new(MiddlewareEngine::new(config)?),
    })
}
