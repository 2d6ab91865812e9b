//! Failure diagnostics sink
//!
//! Failed commands never interrupt editing; they set the status-line flag and
//! leave one line here so the user can find out what went wrong afterwards.

use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub trait Diagnostics {
    /// Record one failure description
    fn record(&mut self, context: &str);
}

/// Appends records to a file that is removed again if nothing was recorded
#[derive(Debug)]
pub struct FileDiagnostics {
    path: PathBuf,
    file: File,
    records: usize,
}

impl FileDiagnostics {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        tracing::debug!("Diagnostics file: {}", path.display());
        Ok(Self {
            path,
            file,
            records: 0,
        })
    }
}

impl Diagnostics for FileDiagnostics {
    fn record(&mut self, context: &str) {
        tracing::warn!("{}", context);
        self.records += 1;
        if let Err(e) = writeln!(self.file, "{context}") {
            tracing::error!("Failed to write diagnostics: {}", e);
        }
    }
}

impl Drop for FileDiagnostics {
    fn drop(&mut self) {
        if self.records == 0 {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Keeps records in memory; clones share the same record list
#[derive(Debug, Clone, Default)]
pub struct MemoryDiagnostics {
    entries: Rc<RefCell<Vec<String>>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn record(&mut self, context: &str) {
        tracing::warn!("{}", context);
        self.entries.borrow_mut().push(context.to_string());
    }
}
