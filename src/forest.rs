//! The node arena and its ordered root sequence.
//!
//! A [`Forest<T>`] owns every node record it has ever been given. Records are
//! addressed by [`TreeNodeId`], which is stable for the lifetime of the forest:
//! the arena is append-only and ids are never reused. Structure lives in the
//! records themselves (their children field, reached through a
//! [`TreeNodeProp`]) and in the root sequence. A node that is neither a root
//! nor listed in a reachable node's children is garbage: it stays in the
//! arena but is never visited by traversal.

use std::fmt::Write;
use std::ops::{Index, IndexMut};

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};

use crate::iterato::PreorderIter;
use crate::prop::TreeNodeProp;

/// A type-safe identifier for a node within a [`Forest`].
/// Wraps a `usize` index into the node arena.
#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, From, Into,
)]
pub struct TreeNodeId(pub(crate) usize);

impl std::fmt::Display for TreeNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a node hangs: in the forest's root sequence, or under another node.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParentId {
    Root,
    Node(TreeNodeId),
}

impl ParentId {
    /// True when this is the root sequence itself; ancestor walks stop here.
    pub fn is_root(&self) -> bool {
        match self {
            ParentId::Root => true,
            ParentId::Node(_) => false,
        }
    }

    pub fn is_node(&self) -> bool {
        !self.is_root()
    }

    pub fn node(&self) -> Option<TreeNodeId> {
        match self {
            ParentId::Root => None,
            ParentId::Node(n) => Some(*n),
        }
    }
}

impl From<TreeNodeId> for ParentId {
    fn from(n: TreeNodeId) -> Self {
        ParentId::Node(n)
    }
}

/// An ordered sequence of root nodes plus the arena holding every node record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest<T> {
    pub(crate) nodes: Vec<T>,
    pub(crate) roots: Vec<TreeNodeId>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<TreeNodeId> for Forest<T> {
    type Output = T;
    fn index(&self, index: TreeNodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl<T> IndexMut<TreeNodeId> for Forest<T> {
    fn index_mut(&mut self, index: TreeNodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Forest {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Moves `data` into the arena as a detached node and returns its id.
    ///
    /// The node is not part of the forest's structure until it is appended
    /// somewhere, see [`Forest::append`] and [`crate::TreeIndex::add_child`].
    pub fn insert(&mut self, data: T) -> TreeNodeId {
        let id = TreeNodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    pub fn get(&self, id: TreeNodeId) -> Option<&T> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: TreeNodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0)
    }

    pub fn contains(&self, id: TreeNodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn roots(&self) -> &[TreeNodeId] {
        &self.roots
    }

    /// Direct access to the root sequence, for callers splicing it themselves.
    ///
    /// Any structural edit made here must be followed by re-indexing.
    pub fn roots_mut(&mut self) -> &mut Vec<TreeNodeId> {
        &mut self.roots
    }

    /// Number of records in the arena, reachable or not.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (TreeNodeId, &T)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (TreeNodeId(i), n))
    }

    /// Children of `node`, empty for leaves and unknown ids.
    pub fn children<V, L>(&self, prop: &TreeNodeProp<T, V, L>, node: TreeNodeId) -> &[TreeNodeId] {
        self.get(node).map(|n| prop.children(n)).unwrap_or(&[])
    }

    /// Appends `child` to the end of the sequence designated by `target`,
    /// creating the children field of a node target if it is absent.
    ///
    /// Returns the position of the new element, or `None` if `target` names a
    /// node that is not in the arena, in which case nothing changes.
    /// This is a purely structural edit and touches no index.
    pub fn append<V, L>(
        &mut self,
        prop: &TreeNodeProp<T, V, L>,
        target: ParentId,
        child: TreeNodeId,
    ) -> Option<usize> {
        let seq = match target {
            ParentId::Root => &mut self.roots,
            ParentId::Node(n) => prop.children_or_insert(self.get_mut(n)?),
        };
        seq.push(child);
        Some(seq.len() - 1)
    }

    /// Pre-order traversal of every node reachable from the roots, in sequence order.
    pub fn iter_reachable<'a, V, L>(
        &'a self,
        prop: &'a TreeNodeProp<T, V, L>,
    ) -> PreorderIter<'a, T, V, L> {
        PreorderIter::new(self, prop, self.roots.iter().copied())
    }

    /// Pre-order traversal of the subtree rooted at `start`, `start` included.
    pub fn iter_subtree<'a, V, L>(
        &'a self,
        prop: &'a TreeNodeProp<T, V, L>,
        start: TreeNodeId,
    ) -> PreorderIter<'a, T, V, L> {
        PreorderIter::new(self, prop, std::iter::once(start))
    }

    pub fn is_reachable<V, L>(&self, prop: &TreeNodeProp<T, V, L>, node: TreeNodeId) -> bool {
        self.iter_reachable(prop).any(|n| n == node)
    }

    /// Renders the reachable forest as an indented ASCII tree, one node per line.
    pub fn debug_draw<V, L>(
        &self,
        prop: &TreeNodeProp<T, V, L>,
        mut node_display: impl FnMut(&T) -> String,
    ) -> String {
        fn draw_subtree_recursive<W: Write, T, V, L>(
            f: &mut W,
            forest: &Forest<T>,
            prop: &TreeNodeProp<T, V, L>,
            node_id: TreeNodeId,
            prefix: &str,
            is_last_child: bool,
            format_node: &mut impl FnMut(&T) -> String,
        ) -> Result<(), std::fmt::Error> {
            let connector = if is_last_child {
                "└── "
            } else {
                "├── "
            };
            let Some(node) = forest.get(node_id) else {
                return Ok(());
            };
            write!(f, "\n{prefix}{connector}{}", format_node(node))?;

            let child_prefix = format!("{}{}", prefix, if is_last_child { "    " } else { "│   " });
            let children = prop.children(node);
            for (i, &child_id) in children.iter().enumerate() {
                draw_subtree_recursive(
                    f,
                    forest,
                    prop,
                    child_id,
                    &child_prefix,
                    i == children.len() - 1,
                    format_node,
                )?;
            }
            Ok(())
        }

        let mut output = String::new();
        for (r, &root_id) in self.roots.iter().enumerate() {
            let Some(root) = self.get(root_id) else {
                continue;
            };
            if r > 0 {
                output.push('\n');
            }
            output.push_str(&node_display(root));

            let children = prop.children(root);
            for (i, &child_id) in children.iter().enumerate() {
                let _ = draw_subtree_recursive(
                    &mut output,
                    self,
                    prop,
                    child_id,
                    "",
                    i == children.len() - 1,
                    &mut node_display,
                );
            }
        }
        output
    }
}
