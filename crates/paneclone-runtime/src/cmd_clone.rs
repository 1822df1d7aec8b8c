//! `paneclone clone` and `paneclone split`.

use std::time::{Duration, Instant};

use anyhow::bail;
use paneclone_core::{
    CloneOrchestrator, PaneHost, PaneId, SplitDirection, TickOutcome, find_remote_descendant,
};
use tokio::time::{MissedTickBehavior, interval};

use crate::context::Context;

/// Request the clone, then tick the orchestrator until it settles.
pub async fn cmd_clone(
    ctx: &Context,
    pane: &PaneId,
    direction: SplitDirection,
    tick_ms: u64,
) -> anyhow::Result<()> {
    let mut orchestrator = CloneOrchestrator::new();
    orchestrator.request(&ctx.host, &ctx.table, pane, direction, &ctx.config, Instant::now())?;
    if let Some(applied) = orchestrator.pending().and_then(|p| p.source_profile.as_ref()) {
        tracing::info!(%pane, profile = %applied.profile, "profile applied");
    }

    let mut ticker = interval(Duration::from_millis(tick_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let outcome = loop {
        ticker.tick().await;
        let outcome = orchestrator.tick(&ctx.host, &ctx.config, Instant::now());
        if outcome.is_finished() {
            break outcome;
        }
    };

    match outcome {
        TickOutcome::Cloned(cloned) => {
            tracing::info!(pane = %cloned.pane, command = %cloned.command, "cloned");
            if let Some(applied) = &cloned.profile {
                tracing::info!(pane = %cloned.pane, profile = %applied.profile, "profile applied");
            }
            println!("{}", cloned.pane);
            Ok(())
        }
        TickOutcome::TimedOut => bail!("no new pane appeared after splitting {pane}"),
        TickOutcome::Aborted => bail!("clone of {pane} aborted"),
        TickOutcome::Idle | TickOutcome::Pending => bail!("clone of {pane} never started"),
    }
}

/// Entry point for `paneclone split`.
pub async fn cmd_split(
    ctx: &Context,
    pane: &PaneId,
    direction: SplitDirection,
    tick_ms: u64,
) -> anyhow::Result<()> {
    if ctx.auto_clone() && has_remote_session(ctx, pane)? {
        return cmd_clone(ctx, pane, direction, tick_ms).await;
    }
    ctx.host.split(pane, direction)?;
    Ok(())
}

fn has_remote_session(ctx: &Context, pane: &PaneId) -> anyhow::Result<bool> {
    let Some(pid) = ctx.host.pane_pid(pane)? else {
        return Ok(false);
    };
    let kinds = paneclone_core::default_kinds();
    Ok(find_remote_descendant(&ctx.table, pid, &kinds).is_some())
}
