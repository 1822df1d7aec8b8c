//! Everything a command needs: config, tmux host, process table.

use anyhow::Context as _;
use paneclone_core::{PaneId, RemoteConfig, load_or_default, resolve_config_path};
use paneclone_procfs::{SystemTable, system_table};
use paneclone_tmux::{TmuxExecutor, TmuxHost};

use crate::cli::{Cli, PaneOpts};

pub struct Context {
    pub config: RemoteConfig,
    pub host: TmuxHost<TmuxExecutor>,
    pub table: SystemTable,
}

impl Context {
    pub fn load(cli: &Cli) -> Self {
        let env = |name: &str| std::env::var(name).ok();
        let path = resolve_config_path(cli.config.as_deref(), env);
        let config = load_or_default(path.as_deref());
        let executor = TmuxExecutor::from_env(cli.tmux_socket.as_deref(), env);
        let host = TmuxHost::new(executor).with_profile_styles(config.profile_styles());
        Self {
            config,
            host,
            table: system_table(),
        }
    }

    /// `auto_clone` as toggled at runtime, else as configured.
    pub fn auto_clone(&self) -> bool {
        match self.host.auto_clone_override() {
            Ok(Some(on)) => on,
            Ok(None) => self.config.auto_clone,
            Err(e) => {
                tracing::debug!("cannot read auto-clone option: {e}");
                self.config.auto_clone
            }
        }
    }
}

/// The pane a command acts on.
pub fn target_pane(opts: &PaneOpts) -> anyhow::Result<PaneId> {
    let pane = opts
        .pane
        .as_deref()
        .filter(|p| !p.is_empty())
        .context("no target pane: pass --pane or run inside tmux")?;
    Ok(PaneId::new(pane))
}
