//! Core data model types for memfs

mod descriptor;
mod stat;

pub use descriptor::{Fd, OpenFile};
pub use stat::FileStat;
