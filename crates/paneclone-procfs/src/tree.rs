//! Parent→children map and breadth-first descendant walk.

use std::collections::{HashMap, HashSet, VecDeque};

/// Children of each pid, as found in one scan of the process table.
#[derive(Debug, Default, Clone)]
pub(crate) struct ChildMap {
    children: HashMap<u32, Vec<u32>>,
    known: HashSet<u32>,
}

impl ChildMap {
    pub(crate) fn insert(&mut self, pid: u32, ppid: u32) {
        self.children.entry(ppid).or_default().push(pid);
        self.known.insert(pid);
    }

    /// Whether `pid` was alive when the map was built.
    pub(crate) fn contains(&self, pid: u32) -> bool {
        self.known.contains(&pid)
    }

    pub(crate) fn len(&self) -> usize {
        self.known.len()
    }

    /// All descendants of `root`, nearest generation first, siblings in
    /// ascending pid order.
    pub(crate) fn descendants(&self, root: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(pid) = queue.pop_front() {
            let Some(children) = self.children.get(&pid) else {
                continue;
            };
            let mut children = children.clone();
            children.sort_unstable();
            for child in children {
                // pid reuse can in theory produce a cycle
                if child == root || out.contains(&child) {
                    continue;
                }
                out.push(child);
                queue.push_back(child);
            }
        }
        out
    }
}

impl FromIterator<(u32, u32)> for ChildMap {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        let mut map = ChildMap::default();
        for (pid, ppid) in iter {
            map.insert(pid, ppid);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadth_first_sorted() {
        let map: ChildMap = [(12, 10), (11, 10), (20, 11), (13, 12), (99, 1)]
            .into_iter()
            .collect();
        assert_eq!(map.descendants(10), vec![11, 12, 20, 13]);
    }

    #[test]
    fn leaf_has_no_descendants() {
        let map: ChildMap = [(11, 10)].into_iter().collect();
        assert!(map.descendants(11).is_empty());
    }

    #[test]
    fn parents_are_not_known_processes() {
        let map: ChildMap = [(11, 10)].into_iter().collect();
        assert!(map.contains(11));
        assert!(!map.contains(10));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn cycles_terminate() {
        let map: ChildMap = [(11, 10), (10, 11)].into_iter().collect();
        assert_eq!(map.descendants(10), vec![11]);
    }
}
