//! `paneclone watch`: keep pane profiles in step with their sessions.

use std::time::{Duration, Instant};

use paneclone_core::{ProfileWatcher, WatchEvent};
use paneclone_procfs::Snapshot;
use tokio::time::{MissedTickBehavior, interval};

use crate::context::Context;

/// Entry point for `paneclone watch`. Runs until Ctrl-C or SIGTERM.
pub async fn cmd_watch(ctx: &Context, interval_ms: u64) -> anyhow::Result<()> {
    let mut watcher = ProfileWatcher::new();
    let mut ticker = interval(Duration::from_millis(interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval_ms, "profile watcher started");
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {}
        }
        // One process-table scan per pass, shared by every pane.
        let table = match ctx.table.snapshot() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("cannot read process table: {e}");
                continue;
            }
        };
        match watcher.update(&ctx.host, &table, &ctx.config, Instant::now()) {
            Ok(events) => events.iter().for_each(log_event),
            Err(e) => tracing::warn!("watch update failed: {e}"),
        }
    }

    tracing::info!("profile watcher stopped");
    Ok(())
}

fn log_event(event: &WatchEvent) {
    match event {
        WatchEvent::Applied { pane, profile } => tracing::info!(%pane, %profile, "profile applied"),
        WatchEvent::Restored { pane, profile } => {
            tracing::info!(%pane, profile = profile.as_deref().unwrap_or("(none)"), "profile restored");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!("cannot register SIGTERM handler: {e}");
                ctrl_c.await.ok();
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("received ctrl-c, shutting down");
    }
}
