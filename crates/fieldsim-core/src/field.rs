//! Neighbor-indexed fields.
//!
//! A [`Field`] is the value shape aggregate computation produces: one entry
//! per device in the node's neighborhood, keyed by [`NodeId`], in insertion
//! order. Fields are transient -- a node's store never retains one. At the
//! `put_field` write boundary the field is collapsed once, via
//! [`Field::into_map`], into a plain [`Value::Map`] keyed by the rendered
//! device id.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::value::Value;

/// A neighbor-indexed collection of values, one per device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    entries: IndexMap<NodeId, Value>,
}

impl Field {
    /// Creates an empty field.
    pub fn new() -> Self {
        Field::default()
    }

    /// Inserts or overwrites the entry for `device`.
    pub fn insert(&mut self, device: NodeId, value: Value) {
        self.entries.insert(device, value);
    }

    /// Returns the value aligned to `device`, if present.
    pub fn get(&self, device: NodeId) -> Option<&Value> {
        self.entries.get(&device)
    }

    /// Number of devices in the field.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the field has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Value)> {
        self.entries.iter().map(|(id, v)| (*id, v))
    }

    /// Collapses the field into a plain map value, keyed by the rendered
    /// device id, preserving entry order. This is the one-shot conversion
    /// performed at the store's `put_field` boundary.
    pub fn into_map(self) -> Value {
        Value::Map(
            self.entries
                .into_iter()
                .map(|(device, value)| (device.to_string(), value))
                .collect(),
        )
    }
}

impl FromIterator<(NodeId, Value)> for Field {
    fn from_iter<I: IntoIterator<Item = (NodeId, Value)>>(iter: I) -> Self {
        Field {
            entries: iter.into_iter().collect(),
        }
    }
}
