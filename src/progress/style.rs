//! Styling of the console progress display.
//!
//! A download shows either a bar (length announced by the server) or a
//! spinner (length unknown). [`StyleOptions`] holds the options for both.
//!
//! # Examples
//!
//! ```rust
//! use fetchkit::progress::{ProgressBarOpts, StyleOptions};
//!
//! let style_options = StyleOptions::new(
//!     ProgressBarOpts::new(
//!         Some("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}".to_string()),
//!         Some("█▉▊▋▌▍▎▏  ".to_string()),
//!         true,
//!         false,
//!     ),
//!     ProgressBarOpts::spinner(),
//! );
//! assert!(style_options.is_enabled());
//! ```

use indicatif::{ProgressBar, ProgressStyle};

/// Styles for the two shapes of download progress.
///
/// By default the bar uses the pip look and both shapes are cleared once
/// the download is finished.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Used when the total size is known.
    pub(crate) bar: ProgressBarOpts,
    /// Used when the total size is unknown.
    pub(crate) spinner: ProgressBarOpts,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            bar: ProgressBarOpts::with_pip_style(),
            spinner: ProgressBarOpts::spinner(),
        }
    }
}

impl StyleOptions {
    pub fn new(bar: ProgressBarOpts, spinner: ProgressBarOpts) -> Self {
        Self { bar, spinner }
    }

    /// Options that hide every progress display.
    pub fn hidden() -> Self {
        Self::new(ProgressBarOpts::hidden(), ProgressBarOpts::hidden())
    }

    /// Return `false` if neither shape is enabled.
    pub fn is_enabled(&self) -> bool {
        self.bar.enabled || self.spinner.enabled
    }

    pub fn bar(&self) -> &ProgressBarOpts {
        &self.bar
    }

    pub fn spinner(&self) -> &ProgressBarOpts {
        &self.spinner
    }

    /// Options for a download of the given (possibly unknown) size.
    pub(crate) fn for_length(&self, total: Option<u64>) -> &ProgressBarOpts {
        match total {
            Some(_) => &self.bar,
            None => &self.spinner,
        }
    }
}

/// Look and behavior of one progress display.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// indicatif template; the indicatif default when unset.
    template: Option<String>,
    /// Bar characters, at least three (done, current, remaining).
    progress_chars: Option<String>,
    pub(crate) enabled: bool,
    /// Remove the display from the terminal when the download ends.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: None,
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// Bar template in the style of pip.
    ///
    /// `━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ 211.23 KiB/211.23 KiB 1008.31 KiB/s eta 0s`
    pub const TEMPLATE_PIP: &'static str =
        "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue}";
    /// Template for downloads of unknown size.
    ///
    /// `⠋ 1.20 MiB 512.00 KiB/s file.zip`
    pub const TEMPLATE_SPINNER: &'static str =
        "{spinner:.green} {bytes:>11.green} {bytes_per_sec:>13.red} {msg}";
    /// Fine block characters.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Thin line characters, used by the pip look.
    pub const CHARS_LINE: &'static str = "━╾╴─";

    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// An invalid template falls back to the indicatif default.
    pub fn to_progress_style(&self) -> ProgressStyle {
        let mut style = match self.template {
            Some(ref template) => {
                ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
            }
            None => ProgressStyle::default_bar(),
        };
        if let Some(ref progress_chars) = self.progress_chars {
            style = style.progress_chars(progress_chars);
        }
        style
    }

    /// A bar of `len` bytes, or a spinner when `len` is `None`.
    pub fn to_progress_bar(&self, len: Option<u64>) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let pb = match len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        pb.with_style(self.to_progress_style())
    }

    /// Green bar with byte counts, rate and ETA.
    pub fn with_pip_style() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_PIP.into()),
            progress_chars: Some(ProgressBarOpts::CHARS_LINE.into()),
            enabled: true,
            clear: true,
        }
    }

    /// Spinner with byte count and rate.
    pub fn spinner() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_SPINNER.into()),
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }

    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Options that draw nothing.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }
}
