//! Accessors that tell the index where a node keeps its identifier, its
//! display name and its children.
//!
//! The index never looks inside a node record on its own. Everything it needs
//! goes through a [`TreeNodeProp`], built once alongside the index, so any
//! record shape can be indexed as long as it can hand out these three fields.

use crate::forest::TreeNodeId;

/// Field accessors for a node record `T` with identifier type `V` and label type `L`.
///
/// `children` returning `None` means the record has no children field at all
/// (a leaf). `children_mut` is used to lazily create that field when a child
/// is appended.
///
/// ```
/// use forest_index::{prop::TreeNodeProp, TreeNodeId};
///
/// struct Item {
///     id: String,
///     name: String,
///     children: Option<Vec<TreeNodeId>>,
/// }
///
/// let prop: TreeNodeProp<Item, String, String> = TreeNodeProp {
///     value: |n| &n.id,
///     label: |n| &n.name,
///     label_mut: |n| &mut n.name,
///     children: |n| n.children.as_ref(),
///     children_mut: |n| &mut n.children,
/// };
/// # let _ = prop;
/// ```
pub struct TreeNodeProp<T, V, L> {
    pub value: fn(&T) -> &V,
    pub label: fn(&T) -> &L,
    pub label_mut: fn(&mut T) -> &mut L,
    pub children: fn(&T) -> Option<&Vec<TreeNodeId>>,
    pub children_mut: fn(&mut T) -> &mut Option<Vec<TreeNodeId>>,
}

// Manual impls: deriving would put bounds on T, V and L.
impl<T, V, L> Clone for TreeNodeProp<T, V, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V, L> Copy for TreeNodeProp<T, V, L> {}

impl<T, V, L> std::fmt::Debug for TreeNodeProp<T, V, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeNodeProp").finish_non_exhaustive()
    }
}

impl<T, V, L> TreeNodeProp<T, V, L> {
    pub fn value<'a>(&self, node: &'a T) -> &'a V {
        (self.value)(node)
    }

    pub fn label<'a>(&self, node: &'a T) -> &'a L {
        (self.label)(node)
    }

    pub fn set_label(&self, node: &mut T, label: L) {
        *(self.label_mut)(node) = label;
    }

    /// The children of `node`, empty when the field is absent.
    pub fn children<'a>(&self, node: &'a T) -> &'a [TreeNodeId] {
        (self.children)(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children_field(&self, node: &T) -> bool {
        (self.children)(node).is_some()
    }

    /// Mutable access to the children of `node`, creating an empty sequence if absent.
    pub fn children_or_insert<'a>(&self, node: &'a mut T) -> &'a mut Vec<TreeNodeId> {
        (self.children_mut)(node).get_or_insert_with(Vec::new)
    }
}
