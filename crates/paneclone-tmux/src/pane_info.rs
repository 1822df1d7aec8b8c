//! TmuxPaneInfo, list_panes format string, and parser.

use serde::{Deserialize, Serialize};

use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;

/// Tab-delimited format string for `tmux list-panes -F`.
pub const LIST_PANES_FORMAT: &str = "#{pane_id}\t#{pane_pid}\t#{pane_width}\t#{pane_height}\t#{pane_active}\t#{pane_current_command}\t#{pane_current_path}";

const MIN_FIELDS: usize = 5;

/// The pane metadata the host adapter needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TmuxPaneInfo {
    pub pane_id: String,
    /// PID of the process the pane was started with (tmux `#{pane_pid}`).
    pub pane_pid: Option<u32>,
    pub width: u16,
    pub height: u16,
    pub active: bool,
    pub current_cmd: String,
    pub current_path: String,
}

/// Execute `tmux list-panes -a` and parse the output.
pub fn list_panes(runner: &impl TmuxCommandRunner) -> Result<Vec<TmuxPaneInfo>, TmuxError> {
    let output = runner.run(&["list-panes", "-a", "-F", LIST_PANES_FORMAT])?;
    parse_list_panes_output(&output)
}

/// Metadata of a single pane via `tmux display-message`.
pub fn pane_info(runner: &impl TmuxCommandRunner, pane: &str) -> Result<TmuxPaneInfo, TmuxError> {
    let output = runner.run(&["display-message", "-p", "-t", pane, LIST_PANES_FORMAT])?;
    let line = output.lines().find(|l| !l.trim().is_empty()).ok_or_else(|| {
        TmuxError::ParseError {
            line_num: 1,
            detail: format!("no output for pane {pane}"),
        }
    })?;
    parse_line(line.trim_end_matches('\r'), 1)
}

/// Parse the raw output of `tmux list-panes -a -F <FORMAT>`.
pub fn parse_list_panes_output(output: &str) -> Result<Vec<TmuxPaneInfo>, TmuxError> {
    let mut panes = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        panes.push(parse_line(line, idx + 1)?);
    }
    Ok(panes)
}

fn parse_line(line: &str, line_num: usize) -> Result<TmuxPaneInfo, TmuxError> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < MIN_FIELDS {
        return Err(TmuxError::ParseError {
            line_num,
            detail: format!(
                "expected at least {MIN_FIELDS} tab-separated fields, got {}",
                parts.len()
            ),
        });
    }
    let pane_id = parts[0].trim();
    if !pane_id.starts_with('%') {
        return Err(TmuxError::ParseError {
            line_num,
            detail: format!("not a pane id: {pane_id:?}"),
        });
    }

    Ok(TmuxPaneInfo {
        pane_id: pane_id.to_string(),
        pane_pid: parts[1].trim().parse().ok(),
        width: parts[2].trim().parse().unwrap_or(80),
        height: parts[3].trim().parse().unwrap_or(24),
        active: parse_bool(parts[4]),
        current_cmd: parts.get(5).map(|s| s.to_string()).unwrap_or_default(),
        current_path: parts.get(6).map(|s| s.to_string()).unwrap_or_default(),
    })
}

fn parse_bool(s: &str) -> bool {
    matches!(s.trim(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_line() {
        let pane = parse_line("%3\t4242\t200\t50\t1\tssh\t/home/user", 1).expect("should parse");
        assert_eq!(pane.pane_id, "%3");
        assert_eq!(pane.pane_pid, Some(4242));
        assert_eq!(pane.width, 200);
        assert_eq!(pane.height, 50);
        assert!(pane.active);
        assert_eq!(pane.current_cmd, "ssh");
        assert_eq!(pane.current_path, "/home/user");
    }

    #[test]
    fn parse_multiple_panes() {
        let output = "%0\t100\t80\t24\t1\tzsh\t/home\n\n%1\t200\t80\t24\t0\tdocker\t/srv\n";
        let panes = parse_list_panes_output(output).expect("should parse");
        assert_eq!(panes.len(), 2);
        assert_eq!(panes[1].pane_id, "%1");
        assert!(!panes[1].active);
    }

    #[test]
    fn parse_empty_output() {
        assert!(parse_list_panes_output("").expect("should parse").is_empty());
    }

    #[test]
    fn parse_path_with_spaces() {
        let pane = parse_line("%0\t1\t80\t24\t1\tbash\t/home/user/my dir", 1).expect("should parse");
        assert_eq!(pane.current_path, "/home/user/my dir");
    }

    #[test]
    fn parse_missing_pid_and_bad_size() {
        let pane = parse_line("%0\t\tXX\tYY\t0", 1).expect("should parse");
        assert_eq!(pane.pane_pid, None);
        assert_eq!(pane.width, 80);
        assert_eq!(pane.height, 24);
        assert!(pane.current_cmd.is_empty());
    }

    #[test]
    fn parse_errors_carry_line_number() {
        let err = parse_list_panes_output("%0\t1\t80\t24\t1\n%1\t2").expect_err("too few fields");
        assert!(matches!(err, TmuxError::ParseError { line_num: 2, .. }));

        let err = parse_line("oops\t1\t80\t24\t1", 4).expect_err("bad id");
        assert!(matches!(err, TmuxError::ParseError { line_num: 4, .. }));
    }

    #[test]
    fn mock_runner_list_panes() {
        struct MockRunner;
        impl TmuxCommandRunner for MockRunner {
            fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
                assert_eq!(&args[..2], &["list-panes", "-a"]);
                Ok("%0\t100\t80\t24\t1\tssh\t/home\n".to_string())
            }
        }
        let panes = list_panes(&MockRunner).expect("should list");
        assert_eq!(panes.len(), 1);
        assert_eq!(panes[0].current_cmd, "ssh");
    }

    #[test]
    fn mock_runner_single_pane() {
        struct MockRunner;
        impl TmuxCommandRunner for MockRunner {
            fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
                assert_eq!(&args[..4], &["display-message", "-p", "-t", "%7"]);
                Ok("%7\t777\t120\t40\t0\tpodman\t/tmp\n".to_string())
            }
        }
        let pane = pane_info(&MockRunner, "%7").expect("should parse");
        assert_eq!(pane.pane_pid, Some(777));
        assert_eq!(pane.width, 120);
    }
}
