//! Checksum verification for downloads.
//!
//! Digests are given as hexadecimal strings; the algorithm is detected from
//! the length of the string.
//!
//! # Supported Hash Types
//!
//! - **SHA-256**: 64 hexadecimal characters
//! - **SHA-512**: 128 hexadecimal characters
//!
//! # Examples
//!
//! ```rust
//! use fetchkit::download::hash::{detect_hash_type, HashType};
//!
//! let sha256 = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
//! assert_eq!(detect_hash_type(sha256), Some(HashType::Sha256));
//! assert_eq!(detect_hash_type("invalid"), None);
//! ```

use crate::{Error, Result};

use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Supported hash types for download verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// SHA-256 hash algorithm
    Sha256,
    /// SHA-512 hash algorithm
    Sha512,
}

/// Detect hash type based on the hash string format.
pub fn detect_hash_type(hash: &str) -> Option<HashType> {
    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hash.len() {
        64 => Some(HashType::Sha256),
        128 => Some(HashType::Sha512),
        _ => None,
    }
}

/// Incremental hasher over one of the supported algorithms.
#[derive(Clone)]
pub(crate) enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    pub(crate) fn new(kind: HashType) -> Self {
        match kind {
            HashType::Sha256 => Hasher::Sha256(Sha256::new()),
            HashType::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    pub(crate) fn finalize_hex(self) -> String {
        match self {
            Hasher::Sha256(h) => hex::encode(h.finalize()),
            Hasher::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

impl Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Hasher::Sha256(h) => h.write(buf),
            Hasher::Sha512(h) => h.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hex digest of everything `reader` yields.
pub fn digest_reader(mut reader: impl Read, kind: HashType) -> io::Result<String> {
    let mut hasher = Hasher::new(kind);
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize_hex())
}

/// Verify the hash of a local file against an expected hash.
///
/// Returns true if hashes match or if no hash is provided.
///
/// # Arguments
///
/// * `file_path` - Path to the file to verify
/// * `expected_hash` - Optional SHA-256 or SHA-512 hex digest
///
/// # Returns
///
/// * `Ok(true)` if the digest matches or no hash is provided
/// * `Ok(false)` if the file does not exist or the digest differs
/// * `Err(Error::Config)` if `expected_hash` is not a recognized digest
///
/// # Examples
///
/// ```no_run
/// use fetchkit::download::hash::verify_hash;
/// use std::path::Path;
///
/// let ok = verify_hash(
///     Path::new("hello.txt"),
///     Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"),
/// )
/// .unwrap();
/// println!("verified: {ok}");
/// ```
pub fn verify_hash(file_path: &Path, expected_hash: Option<&str>) -> Result<bool> {
    let Some(expected) = expected_hash else {
        return Ok(true);
    };
    let checksum = Checksum::parse(expected)?;
    if !file_path.exists() {
        return Ok(false);
    }
    let actual = digest_reader(File::open(file_path)?, checksum.kind)?;
    Ok(checksum.matches(&actual))
}

/// Expected digest of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    kind: HashType,
    expected: String,
}

impl Checksum {
    /// Parse a hex digest. Unrecognized formats are a configuration error.
    pub fn parse(hash: &str) -> Result<Self> {
        let hash = hash.trim();
        let kind = detect_hash_type(hash)
            .ok_or_else(|| Error::Config(format!("unrecognized checksum format {hash:?}")))?;
        Ok(Self {
            kind,
            expected: hash.to_ascii_lowercase(),
        })
    }

    pub fn kind(&self) -> HashType {
        self.kind
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn matches(&self, actual: &str) -> bool {
        self.expected.eq_ignore_ascii_case(actual)
    }
}

/// Reader computing a digest over the bytes passing through it.
pub(crate) struct HashingReader<R> {
    inner: R,
    hasher: Hasher,
}

impl<R: Read> HashingReader<R> {
    pub(crate) fn new(inner: R, kind: HashType) -> Self {
        Self {
            inner,
            hasher: Hasher::new(kind),
        }
    }

    pub(crate) fn finalize_hex(self) -> String {
        self.hasher.finalize_hex()
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
