//! Clone orchestrator: split a pane that hosts a remote session and replay
//! the session in the new pane.
//!
//! The host creates panes asynchronously and says nothing when one appears,
//! so after requesting a split the orchestrator polls the pane registry
//! until exactly the new pane shows up, or gives up after [`CLONE_TIMEOUT`].
//!
//! ```text
//!   Idle ──request()──▶ AwaitingNewPane ──tick(): new pane──▶ Idle (Cloned)
//!                              │ ▲
//!                              └─┘ tick(): nothing yet
//!                              │
//!                              └──tick(): timeout / shrink──▶ Idle
//! ```

use std::time::{Duration, Instant};

use crate::config::RemoteConfig;
use crate::cwd::infer_cwd;
use crate::error::CloneError;
use crate::host::{LINE_ENDING, PaneHost, PaneId, PaneSet, SplitDirection};
use crate::poll::{CLONE_TIMEOUT, PollTimer, TimerTick};
use crate::process::ProcessTable;
use crate::profile::{AppliedProfile, apply_host_settings};
use crate::scan::{RemoteMatch, find_remote_descendant};
use crate::session::{RemoteSessionKind, default_kinds};

/// The one clone waiting for its pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClone {
    pub source: PaneId,
    pub target: RemoteMatch,
    pub before: PaneSet,
    /// Remote directory to `cd` into after the session starts.
    pub cwd: Option<String>,
    /// Profile switch made on the source pane when the clone was requested.
    pub source_profile: Option<AppliedProfile>,
    timer: PollTimer,
}

impl PendingClone {
    pub fn started(&self) -> Instant {
        self.timer.started()
    }

    pub fn polls(&self) -> u32 {
        self.timer.ticks()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CloneState {
    #[default]
    Idle,
    AwaitingNewPane(PendingClone),
}

/// Result of one [`CloneOrchestrator::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No clone in flight.
    Idle,
    /// Still waiting; tick again.
    Pending,
    /// The session was replayed into a new pane.
    Cloned(ClonedPane),
    /// No new pane within the timeout. Nothing was injected.
    TimedOut,
    /// The pane registry changed in an unexpected way, or the new pane could
    /// not take input. Nothing further happens.
    Aborted,
}

impl TickOutcome {
    /// Whether the orchestrator is done with the clone.
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedPane {
    pub pane: PaneId,
    /// The command line typed into the pane, without line ending.
    pub command: String,
    pub profile: Option<AppliedProfile>,
}

/// Owns the clone state. Not reentrant: one clone at a time.
#[derive(Debug, Clone)]
pub struct CloneOrchestrator {
    state: CloneState,
    kinds: Vec<RemoteSessionKind>,
    timeout: Duration,
}

impl Default for CloneOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl CloneOrchestrator {
    pub fn new() -> Self {
        Self {
            state: CloneState::Idle,
            kinds: default_kinds(),
            timeout: CLONE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_kinds(mut self, kinds: Vec<RemoteSessionKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn state(&self) -> &CloneState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingClone> {
        match &self.state {
            CloneState::AwaitingNewPane(pending) => Some(pending),
            CloneState::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    pub fn kinds(&self) -> &[RemoteSessionKind] {
        &self.kinds
    }

    /// Start cloning the remote session of `pane` into a new split.
    ///
    /// Refused while another clone is pending; the pending one is left
    /// untouched. The remote session is looked up again here because it may
    /// have ended since the caller last checked.
    pub fn request(
        &mut self,
        host: &impl PaneHost,
        table: &impl ProcessTable,
        pane: &PaneId,
        direction: SplitDirection,
        config: &RemoteConfig,
        now: Instant,
    ) -> Result<(), CloneError> {
        if let Some(pending) = self.pending() {
            tracing::error!(source = %pending.source, %pane, "already waiting for a pane");
            return Err(CloneError::AlreadyPending);
        }

        let pid = host
            .pane_pid(pane)?
            .ok_or_else(|| CloneError::NoPanePid(pane.to_string()))?;
        let Some(target) = find_remote_descendant(table, pid, &self.kinds) else {
            tracing::warn!(%pane, "remote session is gone");
            return Err(CloneError::NoRemoteSession(pane.to_string()));
        };

        let before = host.pane_ids()?;
        tracing::debug!(%pane, panes = before.len(), "first pane snapshot");

        let cwd = if config.infer_cwd {
            match host.screen_lines(pane) {
                Ok(lines) => infer_cwd(&lines),
                Err(e) => {
                    tracing::debug!(%pane, "cannot read screen: {e}");
                    None
                }
            }
        } else {
            None
        };

        // The source pane wears the host profile too.
        let source_profile =
            match apply_host_settings(host, pane, &target.kind, &target.process, config) {
                Ok(applied) => applied,
                Err(e) => {
                    tracing::error!(%pane, "cannot apply profile to source pane: {e}");
                    None
                }
            };

        host.split(pane, direction)?;
        self.state = CloneState::AwaitingNewPane(PendingClone {
            source: pane.clone(),
            target,
            before,
            cwd,
            source_profile,
            timer: PollTimer::start(now, self.timeout),
        });
        Ok(())
    }

    /// Poll the pane registry once.
    pub fn tick(
        &mut self,
        host: &impl PaneHost,
        config: &RemoteConfig,
        now: Instant,
    ) -> TickOutcome {
        let CloneState::AwaitingNewPane(mut pending) =
            std::mem::replace(&mut self.state, CloneState::Idle)
        else {
            return TickOutcome::Idle;
        };

        let after = match host.pane_ids() {
            Ok(after) => after,
            Err(e) => {
                tracing::error!("cannot list panes: {e}");
                pending.before.clone()
            }
        };

        if after.len() == pending.before.len() {
            return match pending.timer.tick(now) {
                TimerTick::Continue => {
                    tracing::debug!("polling for new panes");
                    self.state = CloneState::AwaitingNewPane(pending);
                    TickOutcome::Pending
                }
                TimerTick::Expired | TimerTick::Stopped => {
                    tracing::error!(
                        source = %pending.source,
                        waited_ms = pending.timer.elapsed(now).as_millis() as u64,
                        "timeout polling for new pane"
                    );
                    TickOutcome::TimedOut
                }
            };
        }

        let added = after.added_since(&pending.before);
        let Some(new_pane) = added.first().cloned() else {
            tracing::error!(
                before = pending.before.len(),
                after = after.len(),
                "panes disappeared while waiting for a new one"
            );
            return TickOutcome::Aborted;
        };
        if added.len() > 1 {
            tracing::error!(count = added.len(), %new_pane, "more than one new pane, using the first");
        }
        tracing::debug!(%new_pane, "found new pane");

        spawn_remote_session(host, config, &pending, new_pane)
    }

    /// Drop the pending clone, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.state, CloneState::Idle) {
            CloneState::AwaitingNewPane(pending) => {
                tracing::debug!(source = %pending.source, "clone cancelled");
                true
            }
            CloneState::Idle => false,
        }
    }
}

fn spawn_remote_session(
    host: &impl PaneHost,
    config: &RemoteConfig,
    pending: &PendingClone,
    pane: PaneId,
) -> TickOutcome {
    let command = pending.target.clone_command().join(" ");
    tracing::debug!(%pane, %command, "launching into new pane");
    if let Err(e) = host.feed_input(&pane, &format!("{command}{LINE_ENDING}")) {
        tracing::error!(%pane, "cannot type into new pane: {e}");
        return TickOutcome::Aborted;
    }

    if let Some(cwd) = &pending.cwd
        && let Err(e) = host.feed_input(&pane, &format!("cd {cwd}{LINE_ENDING}"))
    {
        tracing::error!(%pane, "cannot restore remote cwd: {e}");
    }

    let RemoteMatch { process, kind } = &pending.target;
    let profile = match apply_host_settings(host, &pane, kind, process, config) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(%pane, "cannot apply profile: {e}");
            None
        }
    };

    TickOutcome::Cloned(ClonedPane {
        pane,
        command,
        profile,
    })
}
