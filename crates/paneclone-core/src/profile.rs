//! Pick and apply the profile a pane should wear for its remote session.

use crate::config::RemoteConfig;
use crate::error::HostError;
use crate::host::{PaneHost, PaneId};
use crate::process::ProcessHandle;
use crate::session::RemoteSessionKind;

/// Profile for a session of `kind` connected to `host`.
///
/// The category default applies unless the host has its own `profile` entry.
pub fn resolve_profile(
    config: &RemoteConfig,
    kind: &RemoteSessionKind,
    host: Option<&str>,
) -> Option<String> {
    let default = config.default_profile(kind.category());
    if default.is_none() {
        tracing::debug!(%kind, "no default profile configured");
    }

    let overridden = match host {
        None => {
            tracing::debug!(%kind, "cannot determine host");
            None
        }
        Some(host) => match config.host_settings(host) {
            None => {
                tracing::debug!(host, "no host entry");
                None
            }
            Some(settings) => {
                if settings.profile.is_none() {
                    tracing::debug!(host, "host entry has no profile");
                }
                settings.profile.as_deref()
            }
        },
    };

    overridden.or(default).map(str::to_string)
}

/// A profile switch performed on a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedProfile {
    pub profile: String,
    /// What the pane had before, for restoring later.
    pub previous: Option<String>,
}

/// Resolve the profile for `process` and switch `pane` to it.
///
/// Returns `Ok(None)` when no profile resolves or the pane already wears it.
pub fn apply_host_settings(
    host: &impl PaneHost,
    pane: &PaneId,
    kind: &RemoteSessionKind,
    process: &ProcessHandle,
    config: &RemoteConfig,
) -> Result<Option<AppliedProfile>, HostError> {
    let remote_host = kind.extract_host(process);
    let Some(profile) = resolve_profile(config, kind, remote_host.as_deref()) else {
        tracing::debug!(%pane, "no profile to apply");
        return Ok(None);
    };

    let previous = host.profile(pane)?;
    if previous.as_deref() == Some(profile.as_str()) {
        return Ok(None);
    }

    tracing::debug!(%pane, %profile, "applying profile");
    host.set_profile(pane, &profile)?;
    Ok(Some(AppliedProfile { profile, previous }))
}
