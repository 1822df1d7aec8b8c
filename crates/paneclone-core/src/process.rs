//! Read-only view of OS processes and the process-table boundary.

use std::path::{Path, PathBuf};

use crate::error::ProcessError;

/// Snapshot of a live process, taken fresh on every query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessHandle {
    pub pid: u32,
    /// Resolved executable path. `None` when the kernel refuses to reveal it
    /// (other users' processes, kernel threads).
    pub exe: Option<PathBuf>,
    /// Name the kernel reports for the process (`comm`).
    pub name: String,
    /// Argument vector, `argv[0]` included.
    pub cmdline: Vec<String>,
}

impl ProcessHandle {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_exe(mut self, exe: impl Into<PathBuf>) -> Self {
        self.exe = Some(exe.into());
        self
    }

    #[must_use]
    pub fn with_cmdline<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmdline = args.into_iter().map(Into::into).collect();
        self
    }

    /// Base name of the executable path, if any.
    pub fn exe_basename(&self) -> Option<&str> {
        self.exe
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }
}

/// Source of process-tree snapshots. Enables mock injection for testing.
pub trait ProcessTable {
    /// Every descendant of `pid` (children, grandchildren, ...), in the
    /// table's enumeration order. `pid` itself is not included.
    ///
    /// Returns [`ProcessError::NotFound`] when `pid` no longer exists.
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError>;
}

impl<T: ProcessTable + ?Sized> ProcessTable for &T {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
        (**self).descendants(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exe_basename_strips_directories() {
        let proc = ProcessHandle::new(1, "ssh").with_exe("/usr/bin/ssh");
        assert_eq!(proc.exe_basename(), Some("ssh"));
    }

    #[test]
    fn exe_basename_none_without_exe() {
        assert_eq!(ProcessHandle::new(1, "ssh").exe_basename(), None);
    }

    #[test]
    fn with_cmdline_collects_args() {
        let proc = ProcessHandle::new(7, "ssh").with_cmdline(["ssh", "-p", "22", "box"]);
        assert_eq!(proc.cmdline, vec!["ssh", "-p", "22", "box"]);
    }
}
