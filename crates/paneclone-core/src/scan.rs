//! Find the remote session running somewhere below a pane's shell.

use crate::error::ProcessError;
use crate::process::{ProcessHandle, ProcessTable};
use crate::session::RemoteSessionKind;

/// A descendant process recognized as a remote session. Only meaningful while
/// the process is alive; re-scan rather than hold on to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMatch {
    pub process: ProcessHandle,
    pub kind: RemoteSessionKind,
}

impl RemoteMatch {
    pub fn host(&self) -> Option<String> {
        self.kind.extract_host(&self.process)
    }

    pub fn clone_command(&self) -> Vec<String> {
        self.kind.build_clone_command(&self.process)
    }
}

/// First descendant of `pid` matched by any of `kinds`.
///
/// Descendants are visited in the table's order; for each one the kinds are
/// tried in slice order. A vanished `pid` is reported as no match.
pub fn find_remote_descendant(
    table: &impl ProcessTable,
    pid: u32,
    kinds: &[RemoteSessionKind],
) -> Option<RemoteMatch> {
    let descendants = match table.descendants(pid) {
        Ok(descendants) => descendants,
        Err(ProcessError::NotFound(gone)) => {
            tracing::debug!(pid = gone, "process has gone away");
            return None;
        }
        Err(e) => {
            tracing::debug!(pid, "process table query failed: {e}");
            return None;
        }
    };

    let found = descendants.into_iter().find_map(|process| {
        kinds
            .iter()
            .find(|kind| kind.matches(&process))
            .cloned()
            .map(|kind| RemoteMatch { process, kind })
    });

    match &found {
        Some(m) => tracing::debug!(pid, child = m.process.pid, kind = %m.kind, "found remote session"),
        None => tracing::debug!(pid, "no remote session below process"),
    }
    found
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// In-memory process table keyed by the queried pid.
    #[derive(Debug, Default, Clone)]
    pub struct FakeTable {
        pub trees: HashMap<u32, Vec<ProcessHandle>>,
    }

    impl FakeTable {
        pub fn with_tree(mut self, pid: u32, descendants: Vec<ProcessHandle>) -> Self {
            self.trees.insert(pid, descendants);
            self
        }
    }

    impl ProcessTable for FakeTable {
        fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
            self.trees
                .get(&pid)
                .cloned()
                .ok_or(ProcessError::NotFound(pid))
        }
    }

    pub fn ssh_proc(pid: u32, target: &str) -> ProcessHandle {
        ProcessHandle::new(pid, "ssh")
            .with_exe("/usr/bin/ssh")
            .with_cmdline(["ssh", target])
    }

    pub fn shell_proc(pid: u32) -> ProcessHandle {
        ProcessHandle::new(pid, "bash")
            .with_exe("/usr/bin/bash")
            .with_cmdline(["-bash"])
    }
}
