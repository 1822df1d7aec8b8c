//! `/proc` process table (Linux), read through the `procfs` crate.

use std::io;
use std::path::{Path, PathBuf};

use paneclone_core::{ProcessError, ProcessHandle, ProcessTable};
use procfs::ProcError;
use procfs::process::{Process, all_processes_with_root};

use crate::Snapshot;
use crate::tree::ChildMap;

/// Reads `/proc/<pid>/{stat,cmdline,exe}`. The root is configurable so
/// tests can point it at a fake tree.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot one process; `None` if it exited.
    pub fn read_process(&self, pid: u32) -> Option<ProcessHandle> {
        let process = Process::new_with_root(self.root.join(pid.to_string())).ok()?;
        let stat = process.stat().ok()?;
        let cmdline = process.cmdline().ok()?;
        Some(ProcessHandle {
            pid,
            exe: process.exe().ok(),
            name: stat.comm,
            cmdline,
        })
    }
}

fn to_process_error(e: ProcError) -> ProcessError {
    match e {
        ProcError::Io(source, _) => ProcessError::Io(source),
        other => ProcessError::Io(io::Error::other(other.to_string())),
    }
}

/// Parent links of every process under a `/proc` root, taken in one pass.
#[derive(Debug, Clone)]
pub struct ProcFsSnapshot {
    table: ProcFs,
    map: ChildMap,
}

impl Snapshot for ProcFs {
    type Frozen = ProcFsSnapshot;

    fn snapshot(&self) -> Result<ProcFsSnapshot, ProcessError> {
        let mut map = ChildMap::default();
        for process in all_processes_with_root(&self.root).map_err(to_process_error)? {
            // Processes exit mid-scan; skip them.
            let Ok(stat) = process.and_then(|p| p.stat()) else {
                continue;
            };
            if let (Ok(pid), Ok(ppid)) = (u32::try_from(stat.pid), u32::try_from(stat.ppid)) {
                map.insert(pid, ppid);
            }
        }
        tracing::trace!(processes = map.len(), "scanned procfs");
        Ok(ProcFsSnapshot {
            table: self.clone(),
            map,
        })
    }
}

impl ProcessTable for ProcFsSnapshot {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
        if !self.map.contains(pid) {
            return Err(ProcessError::NotFound(pid));
        }
        let handles: Vec<ProcessHandle> = self
            .map
            .descendants(pid)
            .into_iter()
            .filter_map(|child| self.table.read_process(child))
            .collect();
        tracing::debug!(pid, count = handles.len(), "read descendants from procfs");
        Ok(handles)
    }
}

impl ProcessTable for ProcFs {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
        self.snapshot()?.descendants(pid)
    }
}
