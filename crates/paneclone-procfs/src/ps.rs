//! `ps`-based process table for platforms without `/proc`.
//!
//! `ps` prints argv joined by spaces, so arguments containing spaces are
//! split apart. Matching only looks at `argv[0]` and the name, and the
//! host parsers tolerate the loss.

use paneclone_core::{ProcessError, ProcessHandle, ProcessTable};

use crate::Snapshot;
use crate::tree::ChildMap;

/// One row of `ps -axo pid=,ppid=,args=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsRow {
    pub pid: u32,
    pub ppid: u32,
    pub args: String,
}

#[derive(Debug, Clone)]
pub struct PsTable {
    ps_bin: String,
}

impl Default for PsTable {
    fn default() -> Self {
        Self::new("ps")
    }
}

impl PsTable {
    pub fn new(ps_bin: impl Into<String>) -> Self {
        Self {
            ps_bin: ps_bin.into(),
        }
    }

    fn scan(&self) -> Result<Vec<PsRow>, ProcessError> {
        let output = std::process::Command::new(&self.ps_bin)
            .args(["-axo", "pid=,ppid=,args="])
            .output()?;
        if !output.status.success() {
            return Err(ProcessError::Io(std::io::Error::other(format!(
                "ps exited with {}",
                output.status
            ))));
        }
        Ok(parse_ps_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Rows of one `ps` run.
#[derive(Debug, Clone, Default)]
pub struct PsSnapshot {
    pub rows: Vec<PsRow>,
}

impl Snapshot for PsTable {
    type Frozen = PsSnapshot;

    fn snapshot(&self) -> Result<PsSnapshot, ProcessError> {
        Ok(PsSnapshot { rows: self.scan()? })
    }
}

impl ProcessTable for PsSnapshot {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
        descendants_from_rows(&self.rows, pid)
    }
}

impl ProcessTable for PsTable {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
        self.snapshot()?.descendants(pid)
    }
}

/// Descendants of `pid` among `rows`, in breadth-first order.
pub fn descendants_from_rows(rows: &[PsRow], pid: u32) -> Result<Vec<ProcessHandle>, ProcessError> {
    if !rows.iter().any(|row| row.pid == pid) {
        return Err(ProcessError::NotFound(pid));
    }
    let map: ChildMap = rows.iter().map(|row| (row.pid, row.ppid)).collect();
    Ok(map
        .descendants(pid)
        .into_iter()
        .filter_map(|child| rows.iter().find(|row| row.pid == child))
        .map(row_to_handle)
        .collect())
}

fn row_to_handle(row: &PsRow) -> ProcessHandle {
    let cmdline: Vec<String> = row.args.split_whitespace().map(String::from).collect();
    let name = cmdline
        .first()
        .map(|arg0| arg0.rsplit('/').next().unwrap_or(arg0).to_string())
        .unwrap_or_default();
    ProcessHandle {
        pid: row.pid,
        exe: None,
        name,
        cmdline,
    }
}

/// Parse `ps -axo pid=,ppid=,args=` output, skipping unparseable lines.
pub fn parse_ps_output(output: &str) -> Vec<PsRow> {
    output.lines().filter_map(parse_ps_line).collect()
}

fn parse_ps_line(line: &str) -> Option<PsRow> {
    let s = line.trim();
    if s.is_empty() {
        return None;
    }
    // PID: first whitespace-delimited token
    let ws = s.find(|c: char| c.is_ascii_whitespace())?;
    let pid: u32 = s[..ws].parse().ok()?;
    let s = s[ws..].trim_start();
    // PPID: second token
    let ws = s.find(|c: char| c.is_ascii_whitespace()).unwrap_or(s.len());
    let ppid: u32 = s[..ws].parse().ok()?;
    let args = s[ws..].trim_start().to_string();
    Some(PsRow { pid, ppid, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ps_output_basic() {
        let output = "    1     0 /sbin/launchd\n  500   1 -zsh\n  512   500 /usr/bin/ssh -p 22 alice@box\n";
        let rows = parse_ps_output(output);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].pid, 512);
        assert_eq!(rows[2].ppid, 500);
        assert_eq!(rows[2].args, "/usr/bin/ssh -p 22 alice@box");
    }

    #[test]
    fn parse_ps_output_skips_junk() {
        let rows = parse_ps_output("\n   \nPID PPID ARGS\n42 1 sleep 60\n100 50\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pid, 42);
        assert_eq!(rows[1].args, "");
    }

    #[test]
    fn rows_to_descendants() {
        let rows = parse_ps_output("500 1 -zsh\n512 500 /usr/bin/ssh alice@box\n600 1 vim\n");
        let found = descendants_from_rows(&rows, 500).expect("found");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "ssh");
        assert_eq!(found[0].cmdline, vec!["/usr/bin/ssh", "alice@box"]);
        assert!(found[0].exe.is_none());
    }

    #[test]
    fn snapshot_serves_every_pane() {
        let snapshot = PsSnapshot {
            rows: parse_ps_output("500 1 -zsh\n512 500 ssh box\n600 1 -zsh\n610 600 podman exec -it web sh\n"),
        };
        assert_eq!(snapshot.descendants(500).expect("found")[0].name, "ssh");
        assert_eq!(snapshot.descendants(600).expect("found")[0].name, "podman");
    }

    #[test]
    fn unknown_pid_is_not_found() {
        let rows = parse_ps_output("500 1 -zsh\n");
        assert!(matches!(
            descendants_from_rows(&rows, 7),
            Err(ProcessError::NotFound(7))
        ));
    }
}
