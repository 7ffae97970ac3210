//! Transport abstraction.
//!
//! An [`HttpEngine`] hands out [`EngineRequest`]s. A request is configured
//! once, then consumed by [`EngineRequest::execute`], which blocks until the
//! response headers are in and returns an [`EngineResponse`] owning the
//! body stream. Engines are chosen at construction time and shared behind
//! an `Arc`; everything above this module is transport-agnostic.

use super::body::{ResponseBody, WebBody};
use super::header::HeaderList;
use crate::{Error, Result};

use reqwest::{Method, StatusCode, Url};
use std::fmt;

/// Factory for requests over one underlying HTTP client.
///
/// Implementations own long-lived client state (connection pool, cookie
/// store) and must be safe to use from several threads at once.
pub trait HttpEngine: Send + Sync {
    fn new_request(&self) -> Box<dyn EngineRequest>;
}

/// A request being built. Executed exactly once.
pub trait EngineRequest: Send {
    fn set_url(&mut self, url: Url);

    /// Set the method and optional body.
    ///
    /// Fails with [`Error::Config`] for an unknown method, a missing body on
    /// `POST`/`PUT`/`PATCH`, or a body on `GET`/`HEAD`.
    fn method(&mut self, name: &str, body: Option<Box<dyn WebBody>>) -> Result<()>;

    /// Append a header value.
    fn header(&mut self, name: &str, value: &str);

    /// Replace all values of a header.
    fn set_header(&mut self, name: &str, value: &str);

    fn headers(&self) -> &HeaderList;

    /// Send the request and wait for the response head.
    ///
    /// Every I/O or protocol failure is reported as [`Error::Transport`].
    fn execute(self: Box<Self>) -> Result<Box<dyn EngineResponse>>;
}

/// A response whose body has not necessarily been read.
pub trait EngineResponse: Send {
    fn status(&self) -> u16;

    /// URL the response came from, after redirects.
    fn url(&self) -> &Url;

    /// Reason phrase, empty when unknown.
    fn reason(&self) -> &str;

    fn headers(&self) -> &HeaderList;

    /// Take the body stream. `None` if the response carries no entity or the
    /// body was already taken.
    fn take_body(&mut self) -> Option<ResponseBody>;

    /// Release transport resources. Safe to call more than once.
    fn close(&mut self);
}

/// Engine-independent request state shared by the concrete engines.
#[derive(Default)]
pub struct RequestParts {
    pub url: Option<Url>,
    pub method: Method,
    pub headers: HeaderList,
    pub body: Option<Box<dyn WebBody>>,
}

impl fmt::Debug for RequestParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestParts")
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body.is_some())
            .finish()
    }
}

impl RequestParts {
    /// Validate and store a method/body pair.
    pub fn set_method(&mut self, name: &str, body: Option<Box<dyn WebBody>>) -> Result<()> {
        let method = Method::from_bytes(name.as_bytes())
            .map_err(|_| Error::Config(format!("invalid HTTP method {name:?}")))?;
        check_method_body(&method, body.is_some())?;
        self.method = method;
        self.body = body;
        Ok(())
    }

    /// The URL, or a configuration error if none was set.
    pub fn require_url(&self) -> Result<&Url> {
        self.url
            .as_ref()
            .ok_or_else(|| Error::Config("request has no URL".into()))
    }
}

/// Enforce which methods take a request body.
pub fn check_method_body(method: &Method, has_body: bool) -> Result<()> {
    let requires = matches!(*method, Method::POST | Method::PUT | Method::PATCH);
    let forbids = matches!(*method, Method::GET | Method::HEAD);
    if requires && !has_body {
        return Err(Error::Config(format!("method {method} requires a request body")));
    }
    if forbids && has_body {
        return Err(Error::Config(format!("method {method} must not have a request body")));
    }
    Ok(())
}

/// Return `true` if a response to `method` with `status` can carry an entity.
pub fn permits_body(method: &Method, status: u16) -> bool {
    *method != Method::HEAD
        && !(100..200).contains(&status)
        && status != StatusCode::NO_CONTENT.as_u16()
        && status != StatusCode::NOT_MODIFIED.as_u16()
}

/// Canonical reason phrase for `status`, empty when there is none.
pub fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}
