//! Ancestor resolution over the parent-index graph
//!
//! Parent references are edited by hand and may dangle or form cycles. Walks are
//! iterative and guarded by a visited set, so every lookup terminates. A cycle or
//! a dangling reference resolves to "not found"; neither is an error.

use std::collections::{HashMap, HashSet};

use crate::core::issue_type::IssueType;
use crate::core::ticket::Ticket;

#[derive(Debug, Clone, Copy)]
struct Node {
    kind: IssueType,
    parent: Option<usize>,
}

/// Adjacency view of a batch keyed by local index
#[derive(Debug, Clone)]
pub struct AncestorResolver {
    nodes: HashMap<usize, Node>,
}

/// Result of walking upward from one index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorWalk {
    /// Visited indices in order, starting at the walk's origin
    pub chain: Vec<usize>,
    /// The walk stopped because an index would repeat
    pub cyclic: bool,
}

impl AncestorResolver {
    pub fn new(tickets: &[Ticket]) -> Self {
        let nodes = tickets
            .iter()
            .map(|t| {
                (
                    t.index,
                    Node {
                        kind: t.kind(),
                        parent: t.parent_index,
                    },
                )
            })
            .collect();
        Self { nodes }
    }

    /// Normalized type of a live ticket
    pub fn kind(&self, index: usize) -> Option<IssueType> {
        self.nodes.get(&index).map(|n| n.kind)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.nodes.contains_key(&index)
    }

    /// Walk parent links from `start`, recording whether a cycle cut it short
    ///
    /// A dangling index is included in the chain (it was referenced) but has no
    /// outgoing link, so the walk ends there.
    pub fn walk(&self, start: usize) -> AncestorWalk {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(start);

        while let Some(index) = current {
            if !visited.insert(index) {
                return AncestorWalk {
                    chain,
                    cyclic: true,
                };
            }
            chain.push(index);
            current = self.nodes.get(&index).and_then(|n| n.parent);
        }

        AncestorWalk {
            chain,
            cyclic: false,
        }
    }

    /// Indices from `start` upward, ending at a missing parent or a repeat
    pub fn ancestor_chain(&self, start: usize) -> Vec<usize> {
        self.walk(start).chain
    }

    /// Whether the walk from `start` runs into a cycle
    pub fn has_cycle(&self, start: usize) -> bool {
        self.walk(start).cyclic
    }

    /// First live ticket in the chain from `start` matching `pred`
    pub fn find_in_chain<F>(&self, start: usize, pred: F) -> Option<usize>
    where
        F: Fn(IssueType) -> bool,
    {
        self.ancestor_chain(start)
            .into_iter()
            .find(|idx| self.kind(*idx).is_some_and(&pred))
    }

    /// First entry in the chain from `start` that is not a subtask
    pub fn first_non_subtask_ancestor(&self, start: usize) -> Option<usize> {
        self.find_in_chain(start, |kind| kind != IssueType::Subtask)
    }

    /// First epic in the chain from `start`
    pub fn nearest_epic_ancestor(&self, start: usize) -> Option<usize> {
        self.find_in_chain(start, |kind| kind == IssueType::Epic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(tickets: Vec<Ticket>) -> AncestorResolver {
        AncestorResolver::new(&tickets)
    }

    #[test]
    fn test_chain_follows_parents_to_root() {
        let r = resolver(vec![
            Ticket::new(0, "Epic", "E"),
            Ticket::new(1, "Story", "S").with_parent(0),
            Ticket::new(2, "Subtask", "T").with_parent(1),
        ]);
        assert_eq!(r.ancestor_chain(2), vec![2, 1, 0]);
        assert!(!r.has_cycle(2));
    }

    #[test]
    fn test_chain_stops_on_cycle() {
        let r = resolver(vec![
            Ticket::new(0, "Subtask", "A").with_parent(1),
            Ticket::new(1, "Subtask", "B").with_parent(0),
        ]);
        assert_eq!(r.ancestor_chain(0), vec![0, 1]);
        assert!(r.has_cycle(0));
        assert_eq!(r.first_non_subtask_ancestor(0), None);
        assert_eq!(r.nearest_epic_ancestor(1), None);
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let r = resolver(vec![Ticket::new(0, "Story", "A").with_parent(0)]);
        assert_eq!(r.ancestor_chain(0), vec![0]);
        assert!(r.has_cycle(0));
        // The start itself still matches
        assert_eq!(r.first_non_subtask_ancestor(0), Some(0));
    }

    #[test]
    fn test_dangling_reference_is_not_found() {
        let r = resolver(vec![Ticket::new(0, "Subtask", "A").with_parent(99)]);
        assert_eq!(r.ancestor_chain(99), vec![99]);
        assert_eq!(r.first_non_subtask_ancestor(99), None);
        assert_eq!(r.ancestor_chain(0), vec![0, 99]);
        assert_eq!(r.first_non_subtask_ancestor(0), None);
    }

    #[test]
    fn test_first_non_subtask_skips_nested_subtasks() {
        let r = resolver(vec![
            Ticket::new(0, "Task", "T"),
            Ticket::new(1, "Sub-task", "S1").with_parent(0),
            Ticket::new(2, "subtask", "S2").with_parent(1),
        ]);
        assert_eq!(r.first_non_subtask_ancestor(2), Some(0));
        assert_eq!(r.nearest_epic_ancestor(2), None);
    }

    #[test]
    fn test_nearest_epic_walks_past_stories() {
        let r = resolver(vec![
            Ticket::new(0, "Epic", "E"),
            Ticket::new(1, "Story", "S").with_parent(0),
            Ticket::new(2, "Task", "T").with_parent(1),
        ]);
        assert_eq!(r.nearest_epic_ancestor(2), Some(0));
        assert_eq!(r.first_non_subtask_ancestor(2), Some(2));
    }

    #[test]
    fn test_long_chain_terminates() {
        let mut tickets = vec![Ticket::new(0, "Epic", "root")];
        for i in 1..10_000 {
            tickets.push(Ticket::new(i, "Subtask", format!("s{i}")).with_parent(i - 1));
        }
        let r = resolver(tickets);
        assert_eq!(r.ancestor_chain(9_999).len(), 10_000);
        assert_eq!(r.first_non_subtask_ancestor(9_999), Some(0));
    }
}
