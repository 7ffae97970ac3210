//! File destination with atomic commit.

use super::Dest;
use crate::Error;

use reqwest::Url;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes the body into a file next to the target and renames it into place
/// once the transfer succeeded.
///
/// The ETag is kept in a sidecar file (`<target>.etag`); Last-Modified is
/// the modification time of the target itself.
#[derive(Debug)]
pub struct FileDest {
    path: PathBuf,
    temp: Option<NamedTempFile>,
}

impl FileDest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    /// Target `directory/<file name>` where the file name is the last path
    /// segment of `url`, percent-decoded.
    ///
    /// Path separators and control characters in the decoded name are
    /// replaced by `_`, so the target always stays inside `directory`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`] when the URL has no usable last segment (none,
    /// empty, not UTF-8 once decoded, or `.`/`..`).
    ///
    /// ```rust
    /// use fetchkit::dest::FileDest;
    /// use reqwest::Url;
    ///
    /// let url = Url::parse("https://example.com/files/my%20file.zip").unwrap();
    /// let dest = FileDest::in_directory("downloads", &url).unwrap();
    /// assert!(dest.path().ends_with("my file.zip"));
    /// ```
    pub fn in_directory(directory: impl AsRef<Path>, url: &Url) -> Result<Self, Error> {
        let segment = url
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a valid path", url))
            })?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", url))
            })?;
        let decoded = urlencoding::decode(segment).map_err(|e| {
            Error::InvalidUrl(format!("The filename of \"{}\" is not valid UTF-8: {}", url, e))
        })?;
        let filename = sanitize_filename(&decoded).ok_or_else(|| {
            Error::InvalidUrl(format!("The url \"{}\" does not contain a usable filename", url))
        })?;
        Ok(Self::new(directory.as_ref().join(filename)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the ETag sidecar file.
    pub fn etag_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".etag");
        PathBuf::from(name)
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Dest for FileDest {
    fn open(&mut self) -> io::Result<Box<dyn Write + '_>> {
        let directory = self.directory().to_path_buf();
        debug!("Creating destination directory {:?}", directory);
        fs::create_dir_all(&directory)?;
        let temp = self.temp.insert(NamedTempFile::new_in(&directory)?);
        debug!("Writing to temporary file {:?}", temp.path());
        Ok(Box::new(BufWriter::new(temp.as_file_mut())))
    }

    fn etag(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        fs::read_to_string(self.etag_path()).ok()
    }

    fn set_etag(&mut self, etag: &str) -> io::Result<()> {
        fs::write(self.etag_path(), etag)
    }

    fn last_modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn set_last_modified(&mut self, time: SystemTime) -> io::Result<()> {
        File::options().write(true).open(&self.path)?.set_modified(time)
    }

    fn complete(&mut self, success: bool) -> io::Result<()> {
        let Some(temp) = self.temp.take() else {
            return Ok(());
        };
        if success {
            debug!("Committing {:?}", self.path);
            temp.persist(&self.path)?;
        } else {
            debug!("Discarding partial download for {:?}", self.path);
            temp.close()?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Make `name` a single plain path component, or `None` if nothing usable
/// is left.
fn sanitize_filename(name: &str) -> Option<String> {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = sanitized.trim();
    match trimmed {
        "" | "." | ".." => None,
        _ => Some(trimmed.to_string()),
    }
}
