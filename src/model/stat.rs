//! Point-in-time summary of a file

use serde::{Deserialize, Serialize};

/// Snapshot of a file's metadata as seen by the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub name: String,
    /// Content length in bytes
    pub size: usize,
    /// Number of descriptors currently open on this file
    pub open_descriptors: usize,
    /// Aliases whose recorded target is this file, sorted
    pub aliases: Vec<String>,
}
