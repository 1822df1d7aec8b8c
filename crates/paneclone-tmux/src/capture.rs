//! Pane capture.

use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;

/// Visible lines of `pane` from the top of the screen down to the cursor
/// line inclusive. Wrapped lines are joined.
pub fn capture_visible(runner: &impl TmuxCommandRunner, pane: &str) -> Result<Vec<String>, TmuxError> {
    let screen = runner.run(&["capture-pane", "-p", "-J", "-t", pane])?;
    let cursor = runner.run(&["display-message", "-p", "-t", pane, "#{cursor_y}"])?;
    let cursor_y: usize = cursor.trim().parse().map_err(|_| TmuxError::ParseError {
        line_num: 1,
        detail: format!("bad cursor_y: {:?}", cursor.trim()),
    })?;
    Ok(lines_to_cursor(&screen, cursor_y))
}

fn lines_to_cursor(screen: &str, cursor_y: usize) -> Vec<String> {
    screen
        .lines()
        .take(cursor_y + 1)
        .map(|line| line.trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockRunner {
        screen: &'static str,
        cursor: &'static str,
    }

    impl TmuxCommandRunner for MockRunner {
        fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
            match args.first() {
                Some(&"capture-pane") => Ok(self.screen.to_string()),
                Some(&"display-message") => Ok(self.cursor.to_string()),
                _ => Err(TmuxError::CommandFailed(format!("unexpected {args:?}"))),
            }
        }
    }

    #[test]
    fn stops_at_cursor_line() {
        let runner = MockRunner {
            screen: "$ ls\nfoo  bar\nuser@box:~/src$   \n\n\n",
            cursor: "2\n",
        };
        let lines = capture_visible(&runner, "%0").expect("capture");
        assert_eq!(lines, vec!["$ ls", "foo  bar", "user@box:~/src$"]);
    }

    #[test]
    fn cursor_below_output_keeps_everything() {
        assert_eq!(lines_to_cursor("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn bad_cursor_is_parse_error() {
        let runner = MockRunner {
            screen: "x\n",
            cursor: "nope",
        };
        assert!(matches!(
            capture_visible(&runner, "%0"),
            Err(TmuxError::ParseError { .. })
        ));
    }
}
