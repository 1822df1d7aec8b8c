//! Background profile watcher.
//!
//! On every update each pane is checked for a remote session. Panes that
//! gain one get their host profile; panes whose session ended get their
//! previous profile back. Freshly seen panes get a grace period before being
//! restored, since a cloned pane's session takes a moment to start.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::RemoteConfig;
use crate::error::HostError;
use crate::host::{PaneHost, PaneId};
use crate::process::ProcessTable;
use crate::profile::{AppliedProfile, apply_host_settings, resolve_profile};
use crate::scan::{RemoteMatch, find_remote_descendant};
use crate::session::{RemoteSessionKind, default_kinds};

/// Default period between watcher updates.
pub const WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Panes younger than this are never restored.
pub const NEW_PANE_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Applied { pane: PaneId, profile: String },
    Restored { pane: PaneId, profile: Option<String> },
}

#[derive(Debug, Clone)]
pub struct ProfileWatcher {
    kinds: Vec<RemoteSessionKind>,
    /// Panes we switched, with the profile they had before.
    switched: HashMap<PaneId, Option<String>>,
    first_seen: HashMap<PaneId, Instant>,
    grace: Duration,
}

impl Default for ProfileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileWatcher {
    pub fn new() -> Self {
        Self {
            kinds: default_kinds(),
            switched: HashMap::new(),
            first_seen: HashMap::new(),
            grace: NEW_PANE_GRACE,
        }
    }

    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn is_switched(&self, pane: &PaneId) -> bool {
        self.switched.contains_key(pane)
    }

    /// Note a profile switch done elsewhere (a clone) so it is restored later.
    pub fn record(&mut self, pane: &PaneId, applied: &AppliedProfile, now: Instant) {
        self.first_seen.entry(pane.clone()).or_insert(now);
        self.switched
            .entry(pane.clone())
            .or_insert_with(|| applied.previous.clone());
    }

    /// Check every pane once.
    pub fn update(
        &mut self,
        host: &impl PaneHost,
        table: &impl ProcessTable,
        config: &RemoteConfig,
        now: Instant,
    ) -> Result<Vec<WatchEvent>, HostError> {
        let panes = host.pane_ids()?;
        self.switched.retain(|pane, _| panes.contains(pane));
        self.first_seen.retain(|pane, _| panes.contains(pane));

        let mut events = Vec::new();
        for pane in panes.iter() {
            let fresh = !self.first_seen.contains_key(pane);
            let first_seen = *self.first_seen.entry(pane.clone()).or_insert(now);

            let pid = match host.pane_pid(pane) {
                Ok(Some(pid)) => pid,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(%pane, "cannot get pane pid: {e}");
                    continue;
                }
            };

            match find_remote_descendant(table, pid, &self.kinds) {
                Some(remote) => {
                    if self.switched.contains_key(pane) {
                        continue;
                    }
                    match apply_host_settings(host, pane, &remote.kind, &remote.process, config) {
                        Ok(Some(applied)) => {
                            self.switched.insert(pane.clone(), applied.previous);
                            events.push(WatchEvent::Applied {
                                pane: pane.clone(),
                                profile: applied.profile,
                            });
                        }
                        Ok(None) if fresh => self.adopt(host, pane, &remote, config),
                        Ok(None) => {}
                        Err(e) => tracing::debug!(%pane, "cannot apply profile: {e}"),
                    }
                }
                None => {
                    if !self.switched.contains_key(pane)
                        || now.saturating_duration_since(first_seen) < self.grace
                    {
                        continue;
                    }
                    if let Some(event) = self.restore(host, pane) {
                        events.push(event);
                    }
                }
            }
        }
        Ok(events)
    }

    /// A pane first seen already wearing its remote profile was switched by
    /// someone else, typically a clone in another process. It started out
    /// with no profile.
    fn adopt(&mut self, host: &impl PaneHost, pane: &PaneId, remote: &RemoteMatch, config: &RemoteConfig) {
        let Some(expected) = resolve_profile(config, &remote.kind, remote.host().as_deref()) else {
            return;
        };
        if matches!(host.profile(pane), Ok(Some(current)) if current == expected) {
            tracing::debug!(%pane, profile = %expected, "adopting profiled pane");
            self.switched.insert(pane.clone(), None);
        }
    }

    fn restore(&mut self, host: &impl PaneHost, pane: &PaneId) -> Option<WatchEvent> {
        let previous = self.switched.get(pane)?.clone();
        tracing::debug!(%pane, ?previous, "restoring original profile");
        let result = match previous.as_deref() {
            Some(profile) => host.set_profile(pane, profile),
            None => host.clear_profile(pane),
        };
        if let Err(e) = result {
            tracing::debug!(%pane, "cannot restore profile: {e}");
            return None;
        }
        self.switched.remove(pane);
        Some(WatchEvent::Restored {
            pane: pane.clone(),
            profile: previous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeHost;
    use crate::scan::testing::{FakeTable, shell_proc, ssh_proc};

    fn config() -> RemoteConfig {
        RemoteConfig::from_toml("ssh_default_profile = \"remote\"").expect("parse")
    }

    fn pane(id: &str) -> PaneId {
        PaneId::new(id)
    }

    #[test]
    fn applies_once_then_restores_after_session_ends() {
        let host = FakeHost::default().with_pane("%0", 100);
        host.profiles
            .borrow_mut()
            .insert(pane("%0"), "local".to_string());
        let mut table = FakeTable::default().with_tree(100, vec![ssh_proc(101, "box")]);
        let mut watcher = ProfileWatcher::new();
        let t0 = Instant::now();

        let events = watcher.update(&host, &table, &config(), t0).expect("update");
        assert_eq!(
            events,
            vec![WatchEvent::Applied {
                pane: pane("%0"),
                profile: "remote".to_string()
            }]
        );
        assert!(watcher.is_switched(&pane("%0")));

        // Still remote: nothing new.
        assert!(watcher.update(&host, &table, &config(), t0 + Duration::from_secs(1)).expect("update").is_empty());
        assert_eq!(host.set_profile_calls.borrow().len(), 1);

        table = table.with_tree(100, vec![shell_proc(102)]);
        let events = watcher
            .update(&host, &table, &config(), t0 + Duration::from_secs(5))
            .expect("update");
        assert_eq!(
            events,
            vec![WatchEvent::Restored {
                pane: pane("%0"),
                profile: Some("local".to_string())
            }]
        );
        assert_eq!(
            host.profiles.borrow().get(&pane("%0")).map(String::as_str),
            Some("local")
        );
        assert!(!watcher.is_switched(&pane("%0")));
    }

    #[test]
    fn new_pane_is_not_restored_during_grace() {
        let host = FakeHost::default().with_pane("%1", 200);
        let table = FakeTable::default().with_tree(200, vec![shell_proc(201)]);
        let mut watcher = ProfileWatcher::new();
        let t0 = Instant::now();
        watcher.record(
            &pane("%1"),
            &AppliedProfile {
                profile: "remote".to_string(),
                previous: None,
            },
            t0,
        );
        host.profiles
            .borrow_mut()
            .insert(pane("%1"), "remote".to_string());

        assert!(watcher.update(&host, &table, &config(), t0 + Duration::from_secs(1)).expect("update").is_empty());
        assert!(watcher.is_switched(&pane("%1")));

        let events = watcher
            .update(&host, &table, &config(), t0 + NEW_PANE_GRACE)
            .expect("update");
        assert_eq!(
            events,
            vec![WatchEvent::Restored {
                pane: pane("%1"),
                profile: None
            }]
        );
        assert!(host.profiles.borrow().get(&pane("%1")).is_none());
    }

    #[test]
    fn vanished_panes_are_forgotten() {
        let host = FakeHost::default().with_pane("%0", 100);
        let table = FakeTable::default().with_tree(100, vec![ssh_proc(101, "box")]);
        let mut watcher = ProfileWatcher::new();
        let t0 = Instant::now();
        watcher.update(&host, &table, &config(), t0).expect("update");
        assert!(watcher.is_switched(&pane("%0")));

        host.remove_pane("%0");
        watcher.update(&host, &table, &config(), t0).expect("update");
        assert!(!watcher.is_switched(&pane("%0")));
    }

    #[test]
    fn pane_profiled_elsewhere_is_adopted() {
        let host = FakeHost::default().with_pane("%4", 400);
        host.profiles
            .borrow_mut()
            .insert(pane("%4"), "remote".to_string());
        let mut table = FakeTable::default().with_tree(400, vec![ssh_proc(401, "box")]);
        let mut watcher = ProfileWatcher::new().with_grace(Duration::ZERO);
        let t0 = Instant::now();

        assert!(watcher.update(&host, &table, &config(), t0).expect("update").is_empty());
        assert!(watcher.is_switched(&pane("%4")));
        assert!(host.set_profile_calls.borrow().is_empty());

        table = table.with_tree(400, vec![shell_proc(402)]);
        let events = watcher.update(&host, &table, &config(), t0).expect("update");
        assert_eq!(
            events,
            vec![WatchEvent::Restored {
                pane: pane("%4"),
                profile: None
            }]
        );
    }

    #[test]
    fn user_profile_on_known_pane_is_left_alone() {
        let host = FakeHost::default().with_pane("%5", 500);
        let mut table = FakeTable::default().with_tree(500, vec![shell_proc(501)]);
        let mut watcher = ProfileWatcher::new().with_grace(Duration::ZERO);
        let t0 = Instant::now();
        watcher.update(&host, &table, &config(), t0).expect("update");

        // Someone else sets the remote profile on a pane already known.
        host.profiles
            .borrow_mut()
            .insert(pane("%5"), "remote".to_string());
        table = table.with_tree(500, vec![ssh_proc(502, "box")]);
        watcher.update(&host, &table, &config(), t0).expect("update");
        assert!(!watcher.is_switched(&pane("%5")));
    }

    #[test]
    fn nothing_configured_changes_nothing() {
        let host = FakeHost::default().with_pane("%0", 100);
        let table = FakeTable::default().with_tree(100, vec![ssh_proc(101, "box")]);
        let mut watcher = ProfileWatcher::new().with_grace(Duration::ZERO);
        let events = watcher
            .update(&host, &table, &RemoteConfig::default(), Instant::now())
            .expect("update");
        assert!(events.is_empty());
        assert!(host.set_profile_calls.borrow().is_empty());
    }
}
