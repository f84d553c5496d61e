//! The parent-lookup side table.
//!
//! A [`TreeIndex`] maps every node reachable in a [`Forest`] to its immediate
//! structural parent: another node, or [`ParentId::Root`] for nodes in the
//! root sequence. Node records never carry a parent pointer themselves; the
//! index is derived from the forest and can be rebuilt from it at any time.
//!
//! Entries are never handed out as owners of anything. When a node is removed,
//! its own entry is dropped, but the entries of its descendants linger until
//! the next full [`TreeIndex::initialize`], which starts from an empty map.
//! Those lingering entries only ever describe unreachable nodes.

use ahash::AHashMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forest::{Forest, ParentId, TreeNodeId};
use crate::iterato::AncestorsIter;
use crate::prop::TreeNodeProp;

#[cfg(test)]
mod test;

/// Errors that can occur when removing a node through the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TreeIndexError {
    #[error("No parent recorded for node {0}")]
    MissingParent(TreeNodeId),
    #[error("Node {0} not found in the sequence its parent entry points to")]
    NotFound(TreeNodeId),
}

/// Parent lookup for one forest, with the field accessors that forest's records use.
pub struct TreeIndex<T, V, L> {
    prop: TreeNodeProp<T, V, L>,
    parents: AHashMap<TreeNodeId, ParentId>,
}

impl<T, V, L> Clone for TreeIndex<T, V, L> {
    fn clone(&self) -> Self {
        TreeIndex {
            prop: self.prop,
            parents: self.parents.clone(),
        }
    }
}

impl<T, V, L> std::fmt::Debug for TreeIndex<T, V, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeIndex")
            .field("parents", &self.parents)
            .finish_non_exhaustive()
    }
}

impl<T, V, L> TreeIndex<T, V, L> {
    /// An empty index. Call [`TreeIndex::initialize`] to populate it.
    pub fn new(prop: TreeNodeProp<T, V, L>) -> Self {
        TreeIndex {
            prop,
            parents: AHashMap::new(),
        }
    }

    pub fn prop(&self) -> &TreeNodeProp<T, V, L> {
        &self.prop
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn contains(&self, node: TreeNodeId) -> bool {
        self.parents.contains_key(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TreeNodeId, ParentId)> + '_ {
        self.parents.iter().map(|(n, p)| (*n, *p))
    }

    /// Records the parent of every node reachable from a starting sequence.
    ///
    /// With `start == None` the starting sequence is the forest's root
    /// sequence, its nodes get [`ParentId::Root`], and the map is cleared
    /// first so that nothing stale survives a full rebuild.
    /// With `start == Some(p)` only `p`'s descendants are (re)indexed and
    /// every other entry is left alone; an unknown `p` indexes nothing.
    ///
    /// Safe to call repeatedly: re-indexing an unchanged forest produces the
    /// same entries.
    pub fn initialize(&mut self, forest: &Forest<T>, start: Option<TreeNodeId>) {
        let first: (ParentId, &[TreeNodeId]) = match start {
            None => {
                self.parents.clear();
                (ParentId::Root, forest.roots())
            }
            Some(p) => (ParentId::Node(p), forest.children(&self.prop, p)),
        };

        let mut stack = vec![first];
        let mut visited = 0usize;
        while let Some((parent, seq)) = stack.pop() {
            for &item in seq {
                self.parents.insert(item, parent);
                visited += 1;
                if let Some(data) = forest.get(item) {
                    let children = self.prop.children(data);
                    if !children.is_empty() {
                        stack.push((ParentId::Node(item), children));
                    }
                }
            }
        }
        debug!("indexed {visited} nodes below {start:?}");
    }

    /// The recorded parent of `node`, or `None` if it was never indexed.
    pub fn get_parent(&self, node: TreeNodeId) -> Option<ParentId> {
        self.parents.get(&node).copied()
    }

    /// Records `parent` as the parent of `node`, without touching the forest.
    ///
    /// This is the incremental step [`TreeIndex::add_child`] uses. Callers that
    /// splice the forest by hand can use it to keep the index in step instead
    /// of re-indexing.
    pub fn set_parent(&mut self, node: TreeNodeId, parent: ParentId) {
        trace!("parent of {node} <- {parent:?}");
        self.parents.insert(node, parent);
    }

    /// Ancestors of `node`, nearest first, root sequence excluded.
    pub fn iter_ancestors(&self, node: TreeNodeId) -> AncestorsIter<'_> {
        AncestorsIter::new(&self.parents, node)
    }

    /// Ancestors of `node`, nearest first. Empty for a root or an unindexed node.
    pub fn ancestors(&self, node: TreeNodeId) -> Vec<TreeNodeId> {
        self.iter_ancestors(node).collect()
    }

    /// Ancestors of `node`, nearest first, each passed through `project`.
    ///
    /// Ancestors missing from `forest` are skipped.
    pub fn ancestors_by<'f, U>(
        &self,
        forest: &'f Forest<T>,
        node: TreeNodeId,
        mut project: impl FnMut(&'f T) -> U,
    ) -> Vec<U> {
        self.iter_ancestors(node)
            .filter_map(|a| forest.get(a))
            .map(&mut project)
            .collect()
    }

    /// Labels of the ancestors of `node`, nearest first.
    pub fn ancestor_labels<'f>(&self, forest: &'f Forest<T>, node: TreeNodeId) -> Vec<&'f L> {
        let label = self.prop.label;
        self.ancestors_by(forest, node, label)
    }

    /// Identifiers of the ancestors of `node`, nearest first.
    pub fn ancestor_values<'f>(&self, forest: &'f Forest<T>, node: TreeNodeId) -> Vec<&'f V> {
        let value = self.prop.value;
        self.ancestors_by(forest, node, value)
    }

    /// Appends `child` to `target`'s sequence and records `target` as its parent.
    ///
    /// `target` is either [`ParentId::Root`] (a new root) or an existing node,
    /// whose children field is created if absent. Only `child`'s entry is
    /// touched. `child` must not already hang somewhere else in the forest.
    ///
    /// Returns the position of `child` in its new sequence, or `None` if the
    /// target node does not exist, in which case nothing changes.
    pub fn add_child(
        &mut self,
        forest: &mut Forest<T>,
        target: ParentId,
        child: TreeNodeId,
    ) -> Option<usize> {
        let pos = forest.append(&self.prop, target, child)?;
        self.set_parent(child, target);
        debug!("added {child} under {target:?} at {pos}");
        Some(pos)
    }

    /// Detaches `node` from whichever sequence holds it, by identity.
    ///
    /// Sibling order is preserved. `node`'s own entry is dropped; entries for
    /// its descendants are not, and must not be relied on afterwards.
    /// Both errors are detected before the forest is modified.
    pub fn remove_child(
        &mut self,
        forest: &mut Forest<T>,
        node: TreeNodeId,
    ) -> Result<(), TreeIndexError> {
        let parent = self
            .get_parent(node)
            .ok_or(TreeIndexError::MissingParent(node))?;

        match parent {
            ParentId::Root => {
                let pos = forest
                    .roots
                    .iter()
                    .position(|&r| r == node)
                    .ok_or(TreeIndexError::NotFound(node))?;
                forest.roots.remove(pos);
            }
            ParentId::Node(p) => {
                let parent_data = forest
                    .get_mut(p)
                    .ok_or(TreeIndexError::NotFound(node))?;
                if let Some(children) = (self.prop.children_mut)(parent_data) {
                    children.retain(|&c| c != node);
                }
            }
        }

        self.parents.remove(&node);
        debug!("removed {node} from {parent:?}");
        Ok(())
    }
}
