//! Guess the remote working directory from what the prompt printed.
//!
//! Only works when the remote `PS1` shows the directory. The last path-like
//! token near the cursor wins.

use std::sync::LazyLock;

use regex::Regex;

/// Screen lines, counting back from the cursor, searched for a path.
pub const CWD_SCAN_LINES: usize = 3;

// Absolute paths and `~`-relative paths made of word characters, dots and
// dashes.
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(/(?:[\w.-]+/)*[\w.-]+|~(?:/[\w.-]+)*)+(?:\.\w+)?").expect("valid path regex")
});

/// Last path-like token in the final `CWD_SCAN_LINES` of `lines`.
///
/// Trailing blank lines (the unused bottom of the screen) are skipped first.
pub fn infer_cwd(lines: &[String]) -> Option<String> {
    let used = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |idx| idx + 1);
    let start = used.saturating_sub(CWD_SCAN_LINES);
    let text = lines[start..used].join("\n");

    let found = PATH_RE.find_iter(&text).last().map(|m| m.as_str().to_string());
    match &found {
        Some(cwd) => tracing::debug!(%cwd, "inferred remote cwd"),
        None => tracing::debug!("no path in {text:?}"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn picks_last_path_on_prompt() {
        let screen = lines(&["alice@box:/var/log$ cd /srv/app", "alice@box:/srv/app$ ", "", ""]);
        assert_eq!(infer_cwd(&screen).as_deref(), Some("/srv/app"));
    }

    #[test]
    fn tilde_paths() {
        let screen = lines(&["[alice@box ~/src/project]$ "]);
        assert_eq!(infer_cwd(&screen).as_deref(), Some("~/src/project"));
    }

    #[test]
    fn only_recent_lines_are_searched() {
        let screen = lines(&["/old/path", "one", "two", "box$ "]);
        assert_eq!(infer_cwd(&screen), None);
    }

    #[test]
    fn blank_screen() {
        assert_eq!(infer_cwd(&lines(&["", "  "])), None);
        assert_eq!(infer_cwd(&[]), None);
    }
}
