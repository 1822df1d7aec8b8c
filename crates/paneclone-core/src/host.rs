//! The host application boundary: the terminal that owns the panes.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Line terminator used when typing commands into a pane.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Opaque, unique identity of a pane.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(String);

impl PaneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pane identities known to the host at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneSet(BTreeSet<PaneId>);

impl PaneSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &PaneId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaneId> {
        self.0.iter()
    }

    /// Identities present in `self` but not in `earlier`.
    pub fn added_since(&self, earlier: &PaneSet) -> Vec<PaneId> {
        self.0.difference(&earlier.0).cloned().collect()
    }
}

impl FromIterator<PaneId> for PaneSet {
    fn from_iter<I: IntoIterator<Item = PaneId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How the new pane is placed next to the source pane.
///
/// `Horizontal` splits along a horizontal divider (new pane above/below),
/// `Vertical` along a vertical one (new pane beside). `Auto` lets the host
/// pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    Auto,
    Horizontal,
    Vertical,
}

impl FromStr for SplitDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "horizontal" | "horiz" | "h" => Ok(Self::Horizontal),
            "vertical" | "vert" | "v" => Ok(Self::Vertical),
            other => Err(format!(
                "invalid split direction: {other:?} (expected auto, horizontal or vertical)"
            )),
        }
    }
}

/// Operations the core needs from the host application.
pub trait PaneHost {
    /// Every live pane, as a fresh snapshot.
    fn pane_ids(&self) -> Result<PaneSet, HostError>;

    /// Pid of the process the pane was started with (usually a shell).
    fn pane_pid(&self, pane: &PaneId) -> Result<Option<u32>, HostError>;

    /// Ask for a new pane next to `pane`. Returns once the request is sent;
    /// the new pane shows up in [`PaneHost::pane_ids`] whenever the host
    /// gets to it.
    fn split(&self, pane: &PaneId, direction: SplitDirection) -> Result<(), HostError>;

    /// Deliver `text` to the pane as if typed.
    fn feed_input(&self, pane: &PaneId, text: &str) -> Result<(), HostError>;

    /// Name of the profile currently applied to the pane, if any.
    fn profile(&self, pane: &PaneId) -> Result<Option<String>, HostError>;

    fn set_profile(&self, pane: &PaneId, profile: &str) -> Result<(), HostError>;

    /// Return the pane to the host's default look.
    fn clear_profile(&self, pane: &PaneId) -> Result<(), HostError>;

    /// Visible screen contents up to the cursor line, top to bottom.
    fn screen_lines(&self, pane: &PaneId) -> Result<Vec<String>, HostError>;
}

impl<T: PaneHost + ?Sized> PaneHost for &T {
    fn pane_ids(&self) -> Result<PaneSet, HostError> {
        (**self).pane_ids()
    }
    fn pane_pid(&self, pane: &PaneId) -> Result<Option<u32>, HostError> {
        (**self).pane_pid(pane)
    }
    fn split(&self, pane: &PaneId, direction: SplitDirection) -> Result<(), HostError> {
        (**self).split(pane, direction)
    }
    fn feed_input(&self, pane: &PaneId, text: &str) -> Result<(), HostError> {
        (**self).feed_input(pane, text)
    }
    fn profile(&self, pane: &PaneId) -> Result<Option<String>, HostError> {
        (**self).profile(pane)
    }
    fn set_profile(&self, pane: &PaneId, profile: &str) -> Result<(), HostError> {
        (**self).set_profile(pane, profile)
    }
    fn clear_profile(&self, pane: &PaneId) -> Result<(), HostError> {
        (**self).clear_profile(pane)
    }
    fn screen_lines(&self, pane: &PaneId) -> Result<Vec<String>, HostError> {
        (**self).screen_lines(pane)
    }
}
