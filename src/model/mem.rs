//! Growable owned byte span
//!
//! `Mem` backs the clipboard, the current search pattern and the strings typed
//! into the command line (file names, filter scripts). Its storage only ever
//! grows: refilling it with a shorter value keeps the allocation so repeated
//! small copies never hit the allocator.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mem {
    data: Vec<u8>,
}

impl Mem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut mem = Self::new();
        mem.set(bytes);
        mem
    }

    /// Replace the contents, reusing the existing allocation when it is large enough
    pub fn set(&mut self, bytes: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(bytes);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Interpret the bytes as a file system path
    pub fn to_path_buf(&self) -> PathBuf {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            PathBuf::from(std::ffi::OsStr::from_bytes(&self.data))
        }
        #[cfg(not(unix))]
        {
            PathBuf::from(String::from_utf8_lossy(&self.data).into_owned())
        }
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

impl AsRef<[u8]> for Mem {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
