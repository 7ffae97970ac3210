//! Request and response payloads.
//!
//! A [`WebBody`] describes a byte payload with an optional declared length
//! and content type. Bodies that can be replayed (e.g. an in-memory buffer)
//! report [`WebBody::is_repeatable`]; the others refuse to be opened twice.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

/// Byte payload travelling with a request or a response.
pub trait WebBody: Send {
    /// Declared length in bytes, `None` when unknown.
    fn content_length(&self) -> Option<u64>;

    /// Declared media type.
    fn content_type(&self) -> Option<&str>;

    /// Return `true` if [`WebBody::open`] may be called more than once.
    fn is_repeatable(&self) -> bool;

    /// Open a reader over the payload.
    ///
    /// Non-repeatable bodies fail with [`io::ErrorKind::Other`] on a second
    /// call.
    fn open(&mut self) -> io::Result<Box<dyn Read + Send>>;
}

fn already_consumed() -> io::Error {
    io::Error::other("body can only be opened once")
}

/// Repeatable in-memory body.
#[derive(Clone)]
pub struct BytesBody {
    data: Arc<[u8]>,
    content_type: Option<String>,
}

impl BytesBody {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Arc::from(data.into()),
            content_type: None,
        }
    }

    /// Attach a content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for BytesBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesBody")
            .field("len", &self.data.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl WebBody for BytesBody {
    fn content_length(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn is_repeatable(&self) -> bool {
        true
    }

    fn open(&mut self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.data.clone())))
    }
}

/// One-shot body over an arbitrary reader.
///
/// Used both for streaming request payloads and for response bodies handed
/// out by the engines.
pub struct ReaderBody {
    reader: Option<Box<dyn Read + Send>>,
    length: Option<u64>,
    content_type: Option<String>,
}

impl ReaderBody {
    pub fn new(reader: impl Read + Send + 'static, length: Option<u64>) -> Self {
        Self {
            reader: Some(Box::new(reader)),
            length,
            content_type: None,
        }
    }

    /// Attach a content type.
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Take the underlying reader without going through [`WebBody::open`].
    pub fn into_reader(mut self) -> io::Result<Box<dyn Read + Send>> {
        self.reader.take().ok_or_else(already_consumed)
    }
}

impl fmt::Debug for ReaderBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderBody")
            .field("length", &self.length)
            .field("content_type", &self.content_type)
            .field("consumed", &self.reader.is_none())
            .finish()
    }
}

impl WebBody for ReaderBody {
    fn content_length(&self) -> Option<u64> {
        self.length
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn is_repeatable(&self) -> bool {
        false
    }

    fn open(&mut self) -> io::Result<Box<dyn Read + Send>> {
        self.reader.take().ok_or_else(already_consumed)
    }
}

/// Body of an engine response.
pub type ResponseBody = ReaderBody;

/// Upper bound of the buffer reserved up front from a declared length.
const PREALLOC_LIMIT: u64 = 64 * 1024;

/// Read a whole body into memory.
///
/// The declared length only sizes the initial buffer, up to
/// [`PREALLOC_LIMIT`].
pub(crate) fn read_to_vec(body: &mut dyn WebBody) -> io::Result<Vec<u8>> {
    let reserve = body.content_length().unwrap_or(0).min(PREALLOC_LIMIT);
    let mut buf = Vec::with_capacity(reserve as usize);
    body.open()?.read_to_end(&mut buf)?;
    Ok(buf)
}
