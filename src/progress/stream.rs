//! Progress-reporting reader.

use super::DownloadListener;
use std::io::{self, Read};

/// Wraps a body stream and reports the cumulative byte count to a
/// [`DownloadListener`] after every read.
///
/// ```rust
/// use fetchkit::progress::{DownloadListener, ProgressStream};
/// use std::io::Read;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Totals(Mutex<Vec<u64>>);
///
/// impl DownloadListener for Totals {
///     fn progress(&self, bytes_so_far: u64) {
///         self.0.lock().unwrap().push(bytes_so_far);
///     }
/// }
///
/// let totals = Totals::default();
/// let mut stream = ProgressStream::new(&b"hello world"[..], &totals);
/// let mut out = Vec::new();
/// stream.read_to_end(&mut out).unwrap();
/// assert_eq!(stream.bytes_read(), 11);
/// assert_eq!(totals.0.lock().unwrap().last(), Some(&11));
/// ```
pub struct ProgressStream<'a, R> {
    inner: R,
    listener: &'a dyn DownloadListener,
    total: u64,
}

impl<'a, R: Read> ProgressStream<'a, R> {
    pub fn new(inner: R, listener: &'a dyn DownloadListener) -> Self {
        Self {
            inner,
            listener,
            total: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.total
    }
}

impl<R: Read> Read for ProgressStream<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(0) => Ok(0),
            Ok(n) => {
                self.total += n as u64;
                self.listener.progress(self.total);
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                // Report where the stream stopped before surfacing the failure.
                self.listener.progress(self.total);
                Err(e)
            }
        }
    }
}
