//! File descriptors and the per-descriptor cursor state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle for one open session on a file
///
/// Allocated from a monotonically increasing counter starting at 0.
/// Closed descriptors are never handed out again.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fd(pub u64);

impl Fd {
    pub fn new(raw: u64) -> Self {
        Fd(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The descriptor allocated after this one
    pub(crate) fn next(&self) -> Fd {
        Fd(self.0 + 1)
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Fd {
    fn from(raw: u64) -> Self {
        Fd(raw)
    }
}

impl FromStr for Fd {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Fd)
    }
}

/// Registry entry for an open descriptor: which file, and where the cursor is
///
/// The offset may point past the end of the file, e.g. after the file
/// was truncated underneath an open descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenFile {
    /// Name of the file this descriptor was opened on
    pub name: String,
    /// Byte cursor, advanced by reads only
    pub offset: usize,
}

impl OpenFile {
    pub fn new(name: impl Into<String>) -> Self {
        OpenFile {
            name: name.into(),
            offset: 0,
        }
    }
}
