//! CLI definition using clap derive.

use clap::{Parser, Subcommand};
use paneclone_core::SplitDirection;

#[derive(Parser)]
#[command(name = "paneclone", about = "Clone ssh and container sessions into new tmux panes")]
pub struct Cli {
    /// Config file (default: $PANECLONE_CONFIG, then ~/.config/paneclone/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// tmux socket path
    #[arg(long, global = true)]
    pub tmux_socket: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the remote session running in a pane
    Detect(DetectOpts),
    /// List the context-menu entries a pane would get
    Menu(PaneOpts),
    /// Split a pane and replay its remote session in the new pane
    Clone(CloneOpts),
    /// Split a pane, cloning its session when auto_clone is on
    Split(CloneOpts),
    /// Switch pane profiles while remote sessions come and go
    Watch(WatchOpts),
    /// Flip "Clone On Split" for the whole tmux server
    ToggleAutoClone,
}

#[derive(clap::Args, Default)]
pub struct PaneOpts {
    /// Target pane (default: $TMUX_PANE)
    #[arg(long, short = 't', env = "TMUX_PANE")]
    pub pane: Option<String>,
}

#[derive(clap::Args, Default)]
pub struct DetectOpts {
    #[command(flatten)]
    pub target: PaneOpts,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct CloneOpts {
    #[command(flatten)]
    pub target: PaneOpts,

    /// Split direction: auto, horizontal or vertical
    #[arg(long, default_value = "auto")]
    pub split: SplitDirection,

    /// Interval between checks for the new pane, in milliseconds
    #[arg(long, default_value = "10")]
    pub tick_ms: u64,
}

#[derive(clap::Args)]
pub struct WatchOpts {
    /// Watch interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,
}
