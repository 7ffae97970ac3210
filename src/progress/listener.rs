//! Download event observer.

/// Observer of a single download attempt.
///
/// Events arrive in order: [`connecting`](Self::connecting) once a request
/// is about to be issued, [`start`](Self::start) once a body transfer
/// begins, then a non-decreasing series of [`progress`](Self::progress)
/// totals, and finally [`finished`](Self::finished) right after the
/// destination's completion callback. All methods default to doing nothing.
pub trait DownloadListener: Send + Sync {
    fn connecting(&self) {}

    /// `total` is `None` when the server did not announce a length.
    fn start(&self, total: Option<u64>) {
        let _ = total;
    }

    /// Cumulative number of bytes read so far.
    fn progress(&self, bytes_so_far: u64) {
        let _ = bytes_so_far;
    }

    fn finished(&self, success: bool) {
        let _ = success;
    }
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl DownloadListener for NoopListener {}
