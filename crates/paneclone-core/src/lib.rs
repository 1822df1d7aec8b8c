//! paneclone-core: remote-session detection and pane cloning.
//! Classifies the remote session (ssh, docker, podman) running below a pane,
//! recovers its target, and replays it into a freshly split pane.
//! Pure logic: the process table and the terminal host are traits.

pub mod args;
pub mod config;
pub mod cwd;
pub mod error;
pub mod host;
pub mod menu;
pub mod orchestrator;
pub mod poll;
pub mod process;
pub mod profile;
pub mod scan;
pub mod session;
pub mod watch;

pub use config::{RemoteConfig, load_or_default, resolve_config_path};
pub use error::{CloneError, ConfigError, HostError, ProcessError};
pub use host::{LINE_ENDING, PaneHost, PaneId, PaneSet, SplitDirection};
pub use menu::{MenuItem, menu_items};
pub use orchestrator::{CloneOrchestrator, CloneState, ClonedPane, PendingClone, TickOutcome};
pub use poll::{CLONE_TIMEOUT, PollTimer, TimerTick};
pub use process::{ProcessHandle, ProcessTable};
pub use profile::{AppliedProfile, apply_host_settings, resolve_profile};
pub use scan::{RemoteMatch, find_remote_descendant};
pub use session::{RemoteSessionKind, SessionCategory, default_kinds};
pub use watch::{ProfileWatcher, WATCH_INTERVAL, WatchEvent};
