//! # forest-index
//!
//! A parent-lookup index over a mutable forest of records.
//!
//! Tree data handed over by a front-end is a forest of nested records, each
//! with an identifier, a label and an ordered list of children, but no
//! pointer to its parent. This crate keeps that parent relation in a side
//! table, which makes it cheap to answer "what is the path from this node up
//! to its root" and to detach a node from whichever sequence holds it.
//!
//! *   [`Forest<T>`]: an append-only arena of node records plus the ordered
//!     root sequence. Nodes are addressed by [`TreeNodeId`].
//! *   [`TreeNodeProp`]: accessors telling the index where a record keeps its
//!     identifier, label and children.
//! *   [`TreeIndex`]: the node → parent table, with ancestor queries and
//!     `add_child` / `remove_child`.
//! *   [`IndexedForest`]: one forest and its index, re-indexed after every edit.
//! *   [`record`]: a JSON-backed record type with configurable field names.
//!
//! ```
//! use forest_index::record::{from_json, FieldNames, Record};
//! use forest_index::IndexedForest;
//! use serde_json::json;
//!
//! let data = json!([
//!     { "id": "1", "name": "1", "children": [
//!         { "id": "1-1", "name": "1-1", "children": [
//!             { "id": "1-1-1", "name": "1-1-1" }
//!         ]}
//!     ]}
//! ]);
//! let forest = from_json(&data, &FieldNames::new("id", "name", "children")).unwrap();
//! let tree = IndexedForest::new(forest, Record::prop());
//!
//! let leaf = tree.find(|n| n.value_matches("1-1-1")).unwrap();
//! assert_eq!(tree.ancestor_labels(leaf), ["1-1", "1"]);
//! ```

pub mod forest;
pub mod index;
pub mod iterato;
pub mod prop;
pub mod record;
pub mod session;

pub use forest::{Forest, ParentId, TreeNodeId};
pub use index::{TreeIndex, TreeIndexError};
pub use prop::TreeNodeProp;
pub use session::IndexedForest;
