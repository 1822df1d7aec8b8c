//! paneclone-procfs: process-table IO boundary.
//! Linux reads `/proc` through the `procfs` crate (exact argv, exe, comm);
//! elsewhere `ps` is parsed, which loses argv boundaries but is good enough
//! for matching.

#[cfg(target_os = "linux")]
pub mod linux;
pub mod ps;
mod tree;

use paneclone_core::{ProcessError, ProcessTable};

#[cfg(target_os = "linux")]
pub use linux::{ProcFs, ProcFsSnapshot};
pub use ps::{PsSnapshot, PsTable, parse_ps_output};

/// A table that can freeze the whole process tree once and answer any
/// number of `descendants` queries from it. Loops that visit every pane take
/// one snapshot per pass.
pub trait Snapshot {
    type Frozen: ProcessTable;

    fn snapshot(&self) -> Result<Self::Frozen, ProcessError>;
}

/// Process table for the running platform.
#[cfg(target_os = "linux")]
pub type SystemTable = ProcFs;
#[cfg(not(target_os = "linux"))]
pub type SystemTable = PsTable;

pub fn system_table() -> SystemTable {
    SystemTable::default()
}
