//! # memfs
//!
//! An in-memory file table: named byte buffers accessed through open
//! descriptors, plus a single-level alias table.
//!
//! ## Core Concepts
//!
//! - **Files**: unique names mapped to byte content, listed in creation order
//! - **Descriptors**: integer handles with their own read cursor, never reused
//! - **Links**: alias → file name records, one level deep and never
//!   followed by file operations
//!
//! Reads advance a descriptor's offset; writes overwrite in place at the
//! offset and leave it where it was.
//!
//! ## Example
//!
//! ```
//! use memfs::FileTable;
//!
//! let mut table = FileTable::new();
//! table.create("f")?;
//! let fd = table.open("f")?;
//! table.write(fd, b"hello world")?;
//! assert_eq!(table.read(fd, 5)?, b"hello");
//! assert_eq!(table.read(fd, 6)?, b" world");
//! # Ok::<(), memfs::Error>(())
//! ```

pub mod config;
pub mod model;
pub mod script;

mod error;
mod shared;
mod table;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use model::{Fd, FileStat, OpenFile};
pub use script::{Command, RunSummary, Session, DEMO_SCRIPT};
pub use shared::SharedFileTable;
pub use table::FileTable;
