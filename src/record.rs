//! A schema-agnostic node record for JSON trees.
//!
//! Front-end tree data usually arrives as nested JSON objects whose
//! identifier, display name and children live under configurable keys
//! (`{ "id": "1", "name": "1", "children": [...] }`). [`from_json`] flattens
//! such a tree into a [`Forest<Record>`], and [`to_json`] nests it back.
//! Keys other than the three configured ones are carried along untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::forest::{Forest, ParentId, TreeNodeId};
use crate::prop::TreeNodeProp;

/// The keys under which a JSON node stores its identifier, label and children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub value: String,
    pub label: String,
    pub children: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames::new("value", "label", "children")
    }
}

impl FieldNames {
    pub fn new(value: &str, label: &str, children: &str) -> Self {
        FieldNames {
            value: value.to_string(),
            label: label.to_string(),
            children: children.to_string(),
        }
    }
}

/// One JSON node, with its children replaced by arena ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub value: Value,
    pub label: String,
    pub children: Option<Vec<TreeNodeId>>,
    /// Every other key of the original object.
    pub extra: Map<String, Value>,
}

impl Record {
    /// A fresh node with an empty children sequence, as the demos create them.
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Record {
            value: value.into(),
            label: label.into(),
            children: Some(vec![]),
            extra: Map::new(),
        }
    }

    pub fn prop() -> TreeNodeProp<Record, Value, String> {
        TreeNodeProp {
            value: |n| &n.value,
            label: |n| &n.label,
            label_mut: |n| &mut n.label,
            children: |n| n.children.as_ref(),
            children_mut: |n| &mut n.children,
        }
    }

    /// Whether this record's identifier is `key`, comparing strings by content
    /// and other JSON values by their rendered form.
    pub fn value_matches(&self, key: &str) -> bool {
        match &self.value {
            Value::String(s) => s == key,
            other => other.to_string() == key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Expected an array of nodes at {0}")]
    NotAnArray(String),
    #[error("Expected a node object at {0}")]
    NotAnObject(String),
    #[error("Node at {path} has no \"{field}\" field")]
    MissingField { path: String, field: String },
    #[error("Label of node at {0} is not a string")]
    InvalidLabel(String),
}

/// Builds a forest from a JSON array of nested node objects.
///
/// A missing or `null` children key yields a leaf with no children field; any
/// other non-array value there is an error. Nodes are inserted into the arena
/// in pre-order.
pub fn from_json(json: &Value, names: &FieldNames) -> Result<Forest<Record>, RecordError> {
    let prop = Record::prop();
    let mut forest = Forest::new();

    let roots = json
        .as_array()
        .ok_or_else(|| RecordError::NotAnArray("$".to_string()))?;

    // (parent, json node, path), reversed so the first root is inserted first
    let mut stack: Vec<(ParentId, &Value, String)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(i, v)| (ParentId::Root, v, format!("$[{i}]")))
        .collect();

    while let Some((parent, node, path)) = stack.pop() {
        let obj = node
            .as_object()
            .ok_or_else(|| RecordError::NotAnObject(path.clone()))?;

        let value = obj
            .get(&names.value)
            .cloned()
            .ok_or_else(|| RecordError::MissingField {
                path: path.clone(),
                field: names.value.clone(),
            })?;
        let label = match obj.get(&names.label) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(RecordError::InvalidLabel(path)),
            None => {
                return Err(RecordError::MissingField {
                    path,
                    field: names.label.clone(),
                })
            }
        };
        let children = match obj.get(&names.children) {
            None | Some(Value::Null) => None,
            Some(Value::Array(c)) => Some(c),
            Some(_) => {
                return Err(RecordError::NotAnArray(format!(
                    "{path}.{}",
                    names.children
                )))
            }
        };
        let extra: Map<String, Value> = obj
            .iter()
            .filter(|(k, _)| {
                **k != names.value && **k != names.label && **k != names.children
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let id = forest.insert(Record {
            value,
            label,
            children: children.map(|_| Vec::new()),
            extra,
        });
        forest.append(&prop, parent, id);

        if let Some(children) = children {
            stack.extend(
                children
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, c)| (ParentId::Node(id), c, format!("{path}.{}[{i}]", names.children))),
            );
        }
    }
    Ok(forest)
}

/// Writes the reachable part of `forest` back out as nested JSON.
pub fn to_json(forest: &Forest<Record>, names: &FieldNames) -> Value {
    fn node_json(forest: &Forest<Record>, names: &FieldNames, id: TreeNodeId) -> Option<Value> {
        let record = forest.get(id)?;
        let mut obj = record.extra.clone();
        obj.insert(names.value.clone(), record.value.clone());
        obj.insert(names.label.clone(), Value::String(record.label.clone()));
        if let Some(children) = &record.children {
            let children = children
                .iter()
                .filter_map(|&c| node_json(forest, names, c))
                .collect();
            obj.insert(names.children.clone(), Value::Array(children));
        }
        Some(Value::Object(obj))
    }

    Value::Array(
        forest
            .roots()
            .iter()
            .filter_map(|&r| node_json(forest, names, r))
            .collect(),
    )
}
