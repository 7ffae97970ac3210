//! In-memory destination.

use super::Dest;

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

#[derive(Debug, Default)]
struct MemoryState {
    data: Vec<u8>,
    staging: Vec<u8>,
    etag: Option<String>,
    last_modified: Option<SystemTime>,
    opens: usize,
    completions: Vec<bool>,
}

/// Buffer destination.
///
/// Clones share the same state, so a caller can keep a handle while the
/// orchestrator owns another one. Bytes are staged during a transfer and
/// only become visible through [`MemoryDest::data`] after a successful
/// completion.
#[derive(Debug, Clone, Default)]
pub struct MemoryDest {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache metadata, as if left behind by a previous run.
    pub fn with_metadata(etag: Option<&str>, last_modified: Option<SystemTime>) -> Self {
        let dest = Self::new();
        {
            let mut state = dest.state();
            state.etag = etag.map(String::from);
            state.last_modified = last_modified;
        }
        dest
    }

    /// Committed bytes.
    pub fn data(&self) -> Vec<u8> {
        self.state().data.clone()
    }

    /// How many times the sink was opened.
    pub fn opens(&self) -> usize {
        self.state().opens
    }

    /// Success flags passed to [`Dest::complete`], in call order.
    pub fn completions(&self) -> Vec<bool> {
        self.state().completions.clone()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .staging
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Dest for MemoryDest {
    fn open(&mut self) -> io::Result<Box<dyn Write + '_>> {
        {
            let mut state = self.state();
            state.opens += 1;
            state.staging.clear();
        }
        Ok(Box::new(MemorySink {
            state: self.state.clone(),
        }))
    }

    fn etag(&self) -> Option<String> {
        self.state().etag.clone()
    }

    fn set_etag(&mut self, etag: &str) -> io::Result<()> {
        self.state().etag = Some(etag.to_string());
        Ok(())
    }

    fn last_modified(&self) -> Option<SystemTime> {
        self.state().last_modified
    }

    fn set_last_modified(&mut self, time: SystemTime) -> io::Result<()> {
        self.state().last_modified = Some(time);
        Ok(())
    }

    fn complete(&mut self, success: bool) -> io::Result<()> {
        let mut state = self.state();
        state.completions.push(success);
        let staged = std::mem::take(&mut state.staging);
        if success {
            state.data = staged;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        String::from("<memory>")
    }
}
