//! Context-menu entries offered for a pane.

use serde::Serialize;

use crate::host::SplitDirection;
use crate::scan::RemoteMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum MenuItem {
    CloneAuto,
    CloneHorizontally,
    CloneVertically,
    /// Check item reflecting (and toggling) `auto_clone`.
    CloneOnSplit { active: bool },
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CloneAuto => "Clone Auto",
            Self::CloneHorizontally => "Clone Horizontally",
            Self::CloneVertically => "Clone Vertically",
            Self::CloneOnSplit { .. } => "Clone On Split",
        }
    }

    /// Split requested by this item, `None` for the toggle.
    pub fn split(&self) -> Option<SplitDirection> {
        match self {
            Self::CloneAuto => Some(SplitDirection::Auto),
            Self::CloneHorizontally => Some(SplitDirection::Horizontal),
            Self::CloneVertically => Some(SplitDirection::Vertical),
            Self::CloneOnSplit { .. } => None,
        }
    }

    /// New `auto_clone` value when this item is activated, `None` for the
    /// clone entries.
    pub fn toggle(&self) -> Option<bool> {
        match self {
            Self::CloneOnSplit { active } => Some(!active),
            _ => None,
        }
    }
}

/// Entries for a pane whose remote session lookup returned `remote`.
/// No session, no entries.
pub fn menu_items(remote: Option<&RemoteMatch>, auto_clone: bool) -> Vec<MenuItem> {
    if remote.is_none() {
        return Vec::new();
    }
    vec![
        MenuItem::CloneAuto,
        MenuItem::CloneHorizontally,
        MenuItem::CloneVertically,
        MenuItem::CloneOnSplit { active: auto_clone },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::find_remote_descendant;
    use crate::scan::testing::{FakeTable, shell_proc, ssh_proc};
    use crate::session::default_kinds;

    #[test]
    fn no_remote_descendant_means_no_items() {
        let table = FakeTable::default().with_tree(1, vec![shell_proc(2)]);
        let remote = find_remote_descendant(&table, 1, &default_kinds());
        assert!(remote.is_none());
        assert!(menu_items(remote.as_ref(), true).is_empty());
    }

    #[test]
    fn remote_session_gets_all_items() {
        let table = FakeTable::default().with_tree(1, vec![ssh_proc(2, "box")]);
        let remote = find_remote_descendant(&table, 1, &default_kinds());
        let items = menu_items(remote.as_ref(), false);
        let labels: Vec<_> = items.iter().map(MenuItem::label).collect();
        assert_eq!(
            labels,
            vec!["Clone Auto", "Clone Horizontally", "Clone Vertically", "Clone On Split"]
        );
        assert_eq!(items[3], MenuItem::CloneOnSplit { active: false });
        assert_eq!(items[3].split(), None);
        assert_eq!(items[1].split(), Some(SplitDirection::Horizontal));
    }

    #[test]
    fn clone_on_split_flips_state() {
        assert_eq!(MenuItem::CloneOnSplit { active: false }.toggle(), Some(true));
        assert_eq!(MenuItem::CloneOnSplit { active: true }.toggle(), Some(false));
        assert_eq!(MenuItem::CloneAuto.toggle(), None);
    }
}
