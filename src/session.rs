//! One forest and its index, kept in step.
//!
//! [`IndexedForest`] is what a front-end holds: it owns exactly one
//! [`Forest`] and one [`TreeIndex`] built for it, and exposes the requests a
//! user can make (add a root, add a child, rename, delete, show a node's
//! path). Every structural request is followed by a full re-index, the same
//! way a front-end re-derives its view after each edit, so no stale entry
//! survives a request.

use log::{debug, warn};

use crate::forest::{Forest, ParentId, TreeNodeId};
use crate::index::{TreeIndex, TreeIndexError};
use crate::prop::TreeNodeProp;

pub struct IndexedForest<T, V, L> {
    forest: Forest<T>,
    index: TreeIndex<T, V, L>,
}

impl<T, V, L> IndexedForest<T, V, L> {
    /// Takes ownership of `forest` and indexes it.
    pub fn new(forest: Forest<T>, prop: TreeNodeProp<T, V, L>) -> Self {
        let mut index = TreeIndex::new(prop);
        index.initialize(&forest, None);
        IndexedForest { forest, index }
    }

    pub fn forest(&self) -> &Forest<T> {
        &self.forest
    }

    pub fn index(&self) -> &TreeIndex<T, V, L> {
        &self.index
    }

    pub fn prop(&self) -> &TreeNodeProp<T, V, L> {
        self.index.prop()
    }

    pub fn into_forest(self) -> Forest<T> {
        self.forest
    }

    pub fn node(&self, id: TreeNodeId) -> Option<&T> {
        self.forest.get(id)
    }

    pub fn reindex(&mut self) {
        self.index.initialize(&self.forest, None);
    }

    pub fn is_reachable(&self, id: TreeNodeId) -> bool {
        self.forest.is_reachable(self.index.prop(), id)
    }

    /// First reachable node, in pre-order, satisfying `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<TreeNodeId> {
        self.forest
            .iter_reachable(self.index.prop())
            .find(|&n| predicate(&self.forest[n]))
    }

    /// Appends a new root holding `data`.
    pub fn add_root(&mut self, data: T) -> TreeNodeId {
        let id = self.forest.insert(data);
        // The root sequence always accepts an append.
        let _ = self.index.add_child(&mut self.forest, ParentId::Root, id);
        self.reindex();
        debug!("new root {id}");
        id
    }

    /// Appends a new child holding `data` under `parent`.
    ///
    /// Returns `None`, leaving the forest's structure unchanged, if `parent`
    /// is not a reachable node.
    pub fn add_child(&mut self, parent: TreeNodeId, data: T) -> Option<TreeNodeId> {
        if !self.is_reachable(parent) {
            warn!("cannot add under {parent}: not in the forest");
            return None;
        }
        let id = self.forest.insert(data);
        self.index.add_child(&mut self.forest, parent.into(), id)?;
        self.reindex();
        debug!("new child {id} under {parent}");
        Some(id)
    }

    /// Replaces the label of `node`. Returns `false` if `node` is not reachable.
    pub fn rename(&mut self, node: TreeNodeId, label: L) -> bool {
        if !self.is_reachable(node) {
            warn!("cannot rename {node}: not in the forest");
            return false;
        }
        let prop = *self.index.prop();
        prop.set_label(&mut self.forest[node], label);
        debug!("renamed {node}");
        true
    }

    /// Deletes `node` together with its subtree.
    pub fn remove(&mut self, node: TreeNodeId) -> Result<(), TreeIndexError> {
        self.index
            .remove_child(&mut self.forest, node)
            .inspect_err(|e| warn!("remove failed: {e}"))?;
        self.reindex();
        Ok(())
    }

    pub fn parent(&self, node: TreeNodeId) -> Option<ParentId> {
        self.index.get_parent(node)
    }

    pub fn ancestors(&self, node: TreeNodeId) -> Vec<TreeNodeId> {
        self.index.ancestors(node)
    }

    pub fn ancestor_labels(&self, node: TreeNodeId) -> Vec<&L> {
        self.index.ancestor_labels(&self.forest, node)
    }

    pub fn ancestor_values(&self, node: TreeNodeId) -> Vec<&V> {
        self.index.ancestor_values(&self.forest, node)
    }

    /// `node` followed by its ancestors, nearest first.
    pub fn path(&self, node: TreeNodeId) -> Vec<TreeNodeId> {
        std::iter::once(node)
            .chain(self.index.iter_ancestors(node))
            .collect()
    }

    pub fn path_labels(&self, node: TreeNodeId) -> Vec<&L> {
        let prop = self.index.prop();
        self.path(node)
            .into_iter()
            .filter_map(|n| self.forest.get(n))
            .map(|n| prop.label(n))
            .collect()
    }

    pub fn path_values(&self, node: TreeNodeId) -> Vec<&V> {
        let prop = self.index.prop();
        self.path(node)
            .into_iter()
            .filter_map(|n| self.forest.get(n))
            .map(|n| prop.value(n))
            .collect()
    }

    pub fn debug_draw(&self, node_display: impl FnMut(&T) -> String) -> String {
        self.forest.debug_draw(self.index.prop(), node_display)
    }
}
