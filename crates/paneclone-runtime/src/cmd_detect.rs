//! `paneclone detect`, `paneclone menu` and `paneclone toggle-auto-clone`.

use paneclone_core::{
    MenuItem, PaneHost, PaneId, RemoteMatch, SessionCategory, find_remote_descendant, menu_items,
    resolve_profile,
};
use serde::Serialize;

use crate::context::Context;

/// What `detect` reports for a pane.
#[derive(Debug, Serialize)]
pub struct DetectReport {
    pub pane: String,
    pub pane_pid: Option<u32>,
    pub session: Option<SessionReport>,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub kind: String,
    pub category: &'static str,
    pub pid: u32,
    pub host: Option<String>,
    pub command: Vec<String>,
    pub profile: Option<String>,
}

fn find_remote(ctx: &Context, pane: &PaneId) -> anyhow::Result<(Option<u32>, Option<RemoteMatch>)> {
    let pid = ctx.host.pane_pid(pane)?;
    let kinds = paneclone_core::default_kinds();
    let remote = pid.and_then(|pid| find_remote_descendant(&ctx.table, pid, &kinds));
    Ok((pid, remote))
}

pub fn build_report(ctx: &Context, pane: &PaneId) -> anyhow::Result<DetectReport> {
    let (pane_pid, remote) = find_remote(ctx, pane)?;
    let session = remote.map(|remote| {
        let host = remote.host();
        SessionReport {
            kind: remote.kind.to_string(),
            category: match remote.kind.category() {
                SessionCategory::Ssh => "ssh",
                SessionCategory::Container => "container",
            },
            pid: remote.process.pid,
            profile: resolve_profile(&ctx.config, &remote.kind, host.as_deref()),
            command: remote.clone_command(),
            host,
        }
    });
    Ok(DetectReport {
        pane: pane.to_string(),
        pane_pid,
        session,
    })
}

pub fn format_report(report: &DetectReport) -> String {
    let Some(session) = &report.session else {
        return format!("{}: no remote session", report.pane);
    };
    let mut out = format!(
        "{}: {} (pid {})\n  host:    {}\n  command: {}",
        report.pane,
        session.kind,
        session.pid,
        session.host.as_deref().unwrap_or("-"),
        session.command.join(" "),
    );
    if let Some(profile) = &session.profile {
        out.push_str(&format!("\n  profile: {profile}"));
    }
    out
}

/// Entry point for `paneclone detect`.
pub fn cmd_detect(ctx: &Context, pane: &PaneId, json: bool) -> anyhow::Result<()> {
    let report = build_report(ctx, pane)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_report(&report));
    }
    Ok(())
}

pub fn format_menu(items: &[MenuItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            MenuItem::CloneOnSplit { active } => {
                format!("[{}] {}", if *active { "x" } else { " " }, item.label())
            }
            _ => item.label().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry point for `paneclone menu`.
pub fn cmd_menu(ctx: &Context, pane: &PaneId) -> anyhow::Result<()> {
    let (_, remote) = find_remote(ctx, pane)?;
    let items = menu_items(remote.as_ref(), ctx.auto_clone());
    if !items.is_empty() {
        println!("{}", format_menu(&items));
    }
    Ok(())
}

/// Entry point for `paneclone toggle-auto-clone`: activates the
/// "Clone On Split" entry and stores the result on the tmux server.
pub fn cmd_toggle_auto_clone(ctx: &Context) -> anyhow::Result<()> {
    let item = MenuItem::CloneOnSplit {
        active: ctx.auto_clone(),
    };
    let on = toggled(item)?;
    ctx.host.set_auto_clone(on)?;
    tracing::info!(auto_clone = on, "clone on split toggled");
    println!("{}", format_menu(&[MenuItem::CloneOnSplit { active: on }]));
    Ok(())
}

fn toggled(item: MenuItem) -> anyhow::Result<bool> {
    item.toggle()
        .ok_or_else(|| anyhow::anyhow!("{} is not a toggle", item.label()))
}
