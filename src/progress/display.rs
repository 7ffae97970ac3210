//! Terminal progress display for a single download.

use super::{DownloadListener, StyleOptions};
use indicatif::ProgressBar;
use std::sync::Mutex;

/// [`DownloadListener`] drawing an indicatif progress bar.
///
/// The bar is created on [`start`](DownloadListener::start), as a bar when
/// the length is known and as a spinner otherwise.
///
/// ```rust,no_run
/// use fetchkit::progress::{ConsoleListener, DownloadListener, StyleOptions};
///
/// let listener = ConsoleListener::new(StyleOptions::default(), "file.zip");
/// listener.start(Some(1024));
/// listener.progress(512);
/// listener.finished(true);
/// ```
pub struct ConsoleListener {
    style_options: StyleOptions,
    message: String,
    bar: Mutex<Option<(ProgressBar, bool)>>,
}

impl ConsoleListener {
    pub fn new(style_options: StyleOptions, message: impl Into<String>) -> Self {
        Self {
            style_options,
            message: message.into(),
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some((ref pb, _)) = *guard {
                f(pb);
            }
        }
    }
}

impl std::fmt::Debug for ConsoleListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleListener")
            .field("style_options", &self.style_options)
            .field("message", &self.message)
            .finish()
    }
}

impl DownloadListener for ConsoleListener {
    fn start(&self, total: Option<u64>) {
        let opts = self.style_options.for_length(total);
        let pb = opts.to_progress_bar(total);
        pb.set_message(self.message.clone());
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some((pb, opts.clear));
        }
    }

    fn progress(&self, bytes_so_far: u64) {
        self.with_bar(|pb| pb.set_position(bytes_so_far));
    }

    fn finished(&self, success: bool) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some((pb, clear)) = guard.take() {
            if clear {
                pb.finish_and_clear();
            } else if success {
                pb.finish();
            } else {
                pb.abandon();
            }
        }
    }
}
