//! Helper iterator implementations used by [`Forest`] and [`TreeIndex`].
//!
//! [`TreeIndex`]: crate::TreeIndex

use ahash::AHashMap;

use crate::forest::{Forest, ParentId, TreeNodeId};
use crate::prop::TreeNodeProp;

// --- Ancestors Iterator ---

/// Walks a parent map upwards from a starting node, yielding each ancestor
/// node nearest first. The starting node and the root sequence are never yielded.
///
/// The walk ends at the first `ParentId::Root` or at a node with no entry.
/// It is also capped at the number of entries in the map, so a corrupted map
/// containing a cycle still terminates.
#[derive(Clone)]
pub struct AncestorsIter<'a> {
    parents: &'a AHashMap<TreeNodeId, ParentId>,
    current: TreeNodeId,
    remaining: usize,
}

impl<'a> AncestorsIter<'a> {
    pub(crate) fn new(parents: &'a AHashMap<TreeNodeId, ParentId>, start_node: TreeNodeId) -> Self {
        AncestorsIter {
            parents,
            current: start_node,
            remaining: parents.len(),
        }
    }
}

impl Iterator for AncestorsIter<'_> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.parents.get(&self.current)? {
            ParentId::Root => {
                self.remaining = 0;
                None
            }
            ParentId::Node(parent_id) => {
                self.remaining -= 1;
                self.current = *parent_id;
                Some(*parent_id)
            }
        }
    }
}

// --- Preorder Iterator ---

/// A pre-order DFS over a forest, driven by an explicit stack.
pub struct PreorderIter<'a, T, V, L> {
    forest: &'a Forest<T>,
    prop: &'a TreeNodeProp<T, V, L>,
    stack: Vec<TreeNodeId>,
}

impl<T, V, L> Clone for PreorderIter<'_, T, V, L> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest,
            prop: self.prop,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, T, V, L> PreorderIter<'a, T, V, L> {
    /// Create a new pre-order iterator visiting `starts` in order.
    pub fn new(
        forest: &'a Forest<T>,
        prop: &'a TreeNodeProp<T, V, L>,
        starts: impl DoubleEndedIterator<Item = TreeNodeId>,
    ) -> Self {
        PreorderIter {
            forest,
            prop,
            stack: starts.rev().collect(),
        }
    }
}

impl<T, V, L> Iterator for PreorderIter<'_, T, V, L> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;
            // Ids pointing outside the arena are skipped rather than yielded.
            let Some(data) = self.forest.get(node) else {
                continue;
            };
            // Reverse so the first child is popped next.
            self.stack
                .extend(self.prop.children(data).iter().rev().copied());
            return Some(node);
        }
    }
}
