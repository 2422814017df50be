//! Thread-safe handle to a file table
//!
//! The whole table sits behind one lock. Every operation takes the lock
//! once, so each call is atomic with respect to other threads.

use crate::model::{Fd, FileStat};
use crate::table::FileTable;
use crate::Result;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A cloneable, lock-serialized [`FileTable`]
#[derive(Clone, Debug, Default)]
pub struct SharedFileTable {
    inner: Arc<Mutex<FileTable>>,
}

impl SharedFileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing table
    pub fn from_table(table: FileTable) -> Self {
        SharedFileTable {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    /// Hold the lock across several operations
    pub fn lock(&self) -> MutexGuard<'_, FileTable> {
        self.inner.lock()
    }

    pub fn create(&self, name: impl Into<String>) -> Result<()> {
        self.inner.lock().create(name)
    }

    pub fn open(&self, name: &str) -> Result<Fd> {
        self.inner.lock().open(name)
    }

    pub fn close(&self, fd: Fd) -> Result<()> {
        self.inner.lock().close(fd)
    }

    pub fn read(&self, fd: Fd, size: usize) -> Result<Vec<u8>> {
        self.inner.lock().read(fd, size)
    }

    pub fn write(&self, fd: Fd, data: &[u8]) -> Result<()> {
        self.inner.lock().write(fd, data)
    }

    pub fn ls(&self) -> Vec<String> {
        self.inner.lock().ls()
    }

    pub fn link(&self, target: &str, alias: impl Into<String>) -> Result<()> {
        self.inner.lock().link(target, alias)
    }

    pub fn unlink(&self, alias: &str) -> Result<()> {
        self.inner.lock().unlink(alias)
    }

    pub fn truncate(&self, name: &str, size: usize) -> Result<()> {
        self.inner.lock().truncate(name, size)
    }

    pub fn stat(&self, name: &str) -> Result<FileStat> {
        self.inner.lock().stat(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.inner.lock().exists(name)
    }

    pub fn size(&self, name: &str) -> Result<usize> {
        self.inner.lock().size(name)
    }

    pub fn offset(&self, fd: Fd) -> Result<usize> {
        self.inner.lock().offset(fd)
    }

    pub fn open_descriptors(&self) -> Vec<Fd> {
        self.inner.lock().open_descriptors()
    }

    pub fn links(&self) -> Vec<(String, String)> {
        self.inner.lock().links()
    }

    /// Owned copy of the alias's target, since the lock is released on return
    pub fn resolve(&self, alias: &str) -> Option<String> {
        self.inner.lock().resolve(alias).map(str::to_string)
    }
}
