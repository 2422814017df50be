//! The file table
//!
//! This module provides the main entry point for interacting with memfs.

use crate::model::{Fd, FileStat, OpenFile};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// An in-memory table of named files, open descriptors and links
///
/// Provides:
/// - Creating files and listing them in creation order
/// - Opening descriptors with independent read cursors
/// - Reading, writing and truncating file content
/// - A single-level alias table
///
/// Links are recorded but never dereferenced: `open`, `read`, `write`
/// and `truncate` only ever look at real file names.
#[derive(Debug, Default)]
pub struct FileTable {
    /// File contents by name
    files: HashMap<String, Vec<u8>>,
    /// File names in creation order
    order: Vec<String>,
    /// Alias → target file name
    links: BTreeMap<String, String>,
    /// Open descriptors
    descriptors: BTreeMap<Fd, OpenFile>,
    /// Next descriptor to hand out
    next_fd: Fd,
}

impl FileTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    // === File Operations ===

    /// Create a new, empty file
    pub fn create(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.files.contains_key(&name) {
            return Err(Error::AlreadyExists(format!("file '{}'", name)));
        }

        log::debug!("create {:?}", name);
        self.files.insert(name.clone(), Vec::new());
        self.order.push(name);
        Ok(())
    }

    /// List file names in creation order
    pub fn ls(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Resize a file, dropping trailing bytes or padding with zeros
    pub fn truncate(&mut self, name: &str, size: usize) -> Result<()> {
        let content = self.file_mut(name)?;
        content.resize(size, 0);
        log::debug!("truncate {:?} to {} bytes", name, size);
        Ok(())
    }

    /// Check whether `name` is a file (aliases don't count)
    pub fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Current content length of a file
    pub fn size(&self, name: &str) -> Result<usize> {
        Ok(self.file(name)?.len())
    }

    /// Summarize a file
    pub fn stat(&self, name: &str) -> Result<FileStat> {
        let size = self.file(name)?.len();
        let open_descriptors = self
            .descriptors
            .values()
            .filter(|open| open.name == name)
            .count();
        let aliases = self
            .links
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.clone())
            .collect();

        Ok(FileStat {
            name: name.to_string(),
            size,
            open_descriptors,
            aliases,
        })
    }

    // === Descriptor Operations ===

    /// Open a file, returning a fresh descriptor positioned at 0
    pub fn open(&mut self, name: &str) -> Result<Fd> {
        if !self.files.contains_key(name) {
            return Err(Error::NotFound(format!("file '{}'", name)));
        }

        let fd = self.next_fd;
        self.next_fd = fd.next();
        self.descriptors.insert(fd, OpenFile::new(name));
        log::debug!("open {:?} -> fd {}", name, fd);
        Ok(fd)
    }

    /// Close a descriptor. Its id is never reused.
    pub fn close(&mut self, fd: Fd) -> Result<()> {
        self.descriptors
            .remove(&fd)
            .ok_or(Error::InvalidDescriptor(fd))?;
        log::debug!("close fd {}", fd);
        Ok(())
    }

    /// Read up to `size` bytes at the descriptor's offset and advance it
    ///
    /// Reading at or past the end of the file yields an empty buffer.
    pub fn read(&mut self, fd: Fd, size: usize) -> Result<Vec<u8>> {
        let open = self
            .descriptors
            .get_mut(&fd)
            .ok_or(Error::InvalidDescriptor(fd))?;
        let content = self
            .files
            .get(&open.name)
            .ok_or_else(|| Error::NotFound(format!("file '{}'", open.name)))?;

        let available = content.len().saturating_sub(open.offset);
        let read_size = size.min(available);
        let start = open.offset.min(content.len());
        let data = content[start..start + read_size].to_vec();
        open.offset += read_size;

        log::trace!("read fd {}: {} of {} bytes", fd, read_size, size);
        Ok(data)
    }

    /// Overwrite bytes starting at the descriptor's offset
    ///
    /// Content past the written range is kept and the file grows as
    /// needed. When the offset is past the end the data is appended
    /// without zero fill. The offset itself does not move.
    pub fn write(&mut self, fd: Fd, data: &[u8]) -> Result<()> {
        let open = self
            .descriptors
            .get(&fd)
            .ok_or(Error::InvalidDescriptor(fd))?;
        let offset = open.offset;
        let content = self
            .files
            .get_mut(&open.name)
            .ok_or_else(|| Error::NotFound(format!("file '{}'", open.name)))?;

        let start = offset.min(content.len());
        let end = offset.saturating_add(data.len()).min(content.len());
        content.splice(start..end, data.iter().copied());

        log::trace!("write fd {}: {} bytes at {}", fd, data.len(), start);
        Ok(())
    }

    /// Current cursor of a descriptor
    pub fn offset(&self, fd: Fd) -> Result<usize> {
        self.descriptors
            .get(&fd)
            .map(|open| open.offset)
            .ok_or(Error::InvalidDescriptor(fd))
    }

    /// Descriptors currently open, ascending
    pub fn open_descriptors(&self) -> Vec<Fd> {
        self.descriptors.keys().copied().collect()
    }

    // === Link Operations ===

    /// Record `alias` as a name for the file `target`
    ///
    /// An existing alias of the same name is replaced.
    pub fn link(&mut self, target: &str, alias: impl Into<String>) -> Result<()> {
        if !self.files.contains_key(target) {
            return Err(Error::NotFound(format!("file '{}'", target)));
        }

        let alias = alias.into();
        log::debug!("link {:?} -> {:?}", alias, target);
        self.links.insert(alias, target.to_string());
        Ok(())
    }

    /// Remove an alias
    pub fn unlink(&mut self, alias: &str) -> Result<()> {
        self.links
            .remove(alias)
            .ok_or_else(|| Error::NotFound(format!("link '{}'", alias)))?;
        log::debug!("unlink {:?}", alias);
        Ok(())
    }

    /// Target recorded for an alias
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.links.get(alias).map(String::as_str)
    }

    /// All aliases with their targets, sorted by alias
    pub fn links(&self) -> Vec<(String, String)> {
        self.links
            .iter()
            .map(|(alias, target)| (alias.clone(), target.clone()))
            .collect()
    }

    fn file(&self, name: &str) -> Result<&Vec<u8>> {
        self.files
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("file '{}'", name)))
    }

    fn file_mut(&mut self, name: &str) -> Result<&mut Vec<u8>> {
        self.files
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("file '{}'", name)))
    }
}
