//! `PaneHost` over a tmux server.
//!
//! Profiles have no native tmux counterpart. The profile name is kept in a
//! pane user option and, when the config gives the profile a style, that
//! style is applied as the pane's `window-style`.

use std::collections::HashMap;

use paneclone_core::{HostError, PaneHost, PaneId, PaneSet, SplitDirection};

use crate::capture::capture_visible;
use crate::error::TmuxError;
use crate::executor::TmuxCommandRunner;
use crate::pane_info::{TmuxPaneInfo, list_panes, pane_info};

/// Pane user option holding the applied profile name.
pub const PROFILE_OPTION: &str = "@paneclone-profile";

/// Global user option overriding the configured `auto_clone`.
pub const AUTO_CLONE_OPTION: &str = "@paneclone-auto-clone";

const STYLE_OPTION: &str = "window-style";

pub struct TmuxHost<R> {
    runner: R,
    styles: HashMap<String, String>,
}

impl<R: TmuxCommandRunner> TmuxHost<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            styles: HashMap::new(),
        }
    }

    /// Profile name to tmux style string, e.g. `"bg=colour52"`.
    #[must_use]
    pub fn with_profile_styles(mut self, styles: HashMap<String, String>) -> Self {
        self.styles = styles;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Server-wide `auto_clone` set by [`TmuxHost::set_auto_clone`], if any.
    pub fn auto_clone_override(&self) -> Result<Option<bool>, TmuxError> {
        let out = self.runner.run(&["show-options", "-gqv", AUTO_CLONE_OPTION])?;
        Ok(match out.trim() {
            "on" | "1" | "true" => Some(true),
            "off" | "0" | "false" => Some(false),
            _ => None,
        })
    }

    pub fn set_auto_clone(&self, on: bool) -> Result<(), TmuxError> {
        let value = if on { "on" } else { "off" };
        self.runner.run(&["set-option", "-g", AUTO_CLONE_OPTION, value])?;
        Ok(())
    }

    fn info(&self, pane: &PaneId) -> Result<TmuxPaneInfo, HostError> {
        pane_info(&self.runner, pane.as_str()).map_err(|e| not_found_or(pane, e))
    }
}

/// tmux reports unknown targets as a plain command failure.
fn not_found_or(pane: &PaneId, e: TmuxError) -> HostError {
    match &e {
        TmuxError::CommandFailed(msg) if msg.contains("can't find pane") => {
            HostError::PaneNotFound(pane.to_string())
        }
        _ => e.into(),
    }
}

/// tmux `-v` stacks panes (horizontal divider), `-h` places them side by side.
fn split_flag(direction: SplitDirection, info: &TmuxPaneInfo) -> &'static str {
    match direction {
        SplitDirection::Horizontal => "-v",
        SplitDirection::Vertical => "-h",
        // Terminal cells are roughly twice as tall as wide.
        SplitDirection::Auto if u32::from(info.width) > 2 * u32::from(info.height) => "-h",
        SplitDirection::Auto => "-v",
    }
}

impl<R: TmuxCommandRunner> PaneHost for TmuxHost<R> {
    fn pane_ids(&self) -> Result<PaneSet, HostError> {
        let panes = list_panes(&self.runner)?;
        Ok(panes.into_iter().map(|p| PaneId::new(p.pane_id)).collect())
    }

    fn pane_pid(&self, pane: &PaneId) -> Result<Option<u32>, HostError> {
        Ok(self.info(pane)?.pane_pid)
    }

    fn split(&self, pane: &PaneId, direction: SplitDirection) -> Result<(), HostError> {
        let info = self.info(pane)?;
        let flag = split_flag(direction, &info);
        let mut args = vec!["split-window", flag, "-t", pane.as_str()];
        if !info.current_path.is_empty() {
            args.extend(["-c", info.current_path.as_str()]);
        }
        tracing::debug!(%pane, flag, "split-window");
        self.runner.run(&args).map_err(|e| not_found_or(pane, e))?;
        Ok(())
    }

    fn feed_input(&self, pane: &PaneId, text: &str) -> Result<(), HostError> {
        // Typed text goes in literally; the line ending becomes an Enter key.
        let (body, enter) = match text.strip_suffix("\r\n").or_else(|| text.strip_suffix('\n')) {
            Some(body) => (body, true),
            None => (text, false),
        };
        if !body.is_empty() {
            self.runner
                .run(&["send-keys", "-t", pane.as_str(), "-l", "--", body])
                .map_err(|e| not_found_or(pane, e))?;
        }
        if enter {
            self.runner
                .run(&["send-keys", "-t", pane.as_str(), "Enter"])
                .map_err(|e| not_found_or(pane, e))?;
        }
        Ok(())
    }

    fn profile(&self, pane: &PaneId) -> Result<Option<String>, HostError> {
        let out = self
            .runner
            .run(&["show-options", "-pqv", "-t", pane.as_str(), PROFILE_OPTION])
            .map_err(|e| not_found_or(pane, e))?;
        let name = out.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    fn set_profile(&self, pane: &PaneId, profile: &str) -> Result<(), HostError> {
        self.runner
            .run(&["set-option", "-p", "-t", pane.as_str(), PROFILE_OPTION, profile])
            .map_err(|e| not_found_or(pane, e))?;
        match self.styles.get(profile) {
            Some(style) => {
                self.runner
                    .run(&["set-option", "-p", "-t", pane.as_str(), STYLE_OPTION, style])?;
            }
            None => {
                self.runner
                    .run(&["set-option", "-p", "-u", "-t", pane.as_str(), STYLE_OPTION])?;
            }
        }
        Ok(())
    }

    fn clear_profile(&self, pane: &PaneId) -> Result<(), HostError> {
        for option in [PROFILE_OPTION, STYLE_OPTION] {
            self.runner
                .run(&["set-option", "-p", "-u", "-t", pane.as_str(), option])
                .map_err(|e| not_found_or(pane, e))?;
        }
        Ok(())
    }

    fn screen_lines(&self, pane: &PaneId) -> Result<Vec<String>, HostError> {
        capture_visible(&self.runner, pane.as_str()).map_err(|e| not_found_or(pane, e))
    }
}
