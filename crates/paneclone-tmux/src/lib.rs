//! paneclone-tmux: tmux as the pane host.
//! Subprocess execution, pane listing/capture, and the `PaneHost`
//! implementation. No clone logic here, pure IO boundary.

pub mod capture;
pub mod error;
pub mod executor;
pub mod host;
pub mod pane_info;

pub use capture::capture_visible;
pub use error::TmuxError;
pub use executor::{TmuxCommandRunner, TmuxExecutor};
pub use host::{AUTO_CLONE_OPTION, PROFILE_OPTION, TmuxHost};
pub use pane_info::{LIST_PANES_FORMAT, TmuxPaneInfo, list_panes, pane_info, parse_list_panes_output};
