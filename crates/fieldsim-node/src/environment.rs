//! The boundary to the externally owned spatial environment.
//!
//! The environment owns everything spatial: the node-to-position mapping,
//! the named data layers, and the set of key names whose changes must be
//! observed. A node never mutates the environment -- it only queries it, and
//! only on store misses (the resolver performs no caching, since positions
//! and layer values may change between calls).
//!
//! [`InMemoryEnvironment`] is a first-class backend for tests and simple
//! simulations; real engines supply their own [`Environment`] implementation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use fieldsim_core::{Key, NodeId, Position, Value};

/// An environment-owned spatial data source, queryable by position.
pub trait Layer {
    /// Evaluates the layer at the given position.
    fn value_at(&self, position: &Position) -> Value;
}

/// The environment contract consumed by nodes.
///
/// The trait is synchronous (not async): the enclosing simulation runs one
/// reaction to completion before the next, so queries never contend.
pub trait Environment {
    /// Current position of `node`, or `None` if the node has not been
    /// placed yet. An unplaced node resolves every layer lookup to absent.
    fn position_of(&self, node: NodeId) -> Option<Position>;

    /// The data layer registered under the given key's name, if any.
    fn layer(&self, key: &Key) -> Option<Rc<dyn Layer>>;

    /// Whether changes to this key must be reported to node observers.
    /// Membership in the environment's observed-key-name set.
    fn is_observed(&self, key: &Key) -> bool;
}

/// Shared, non-owning handle to the environment. The environment is the
/// long-lived owner; nodes only hold this reference.
pub type SharedEnvironment = Rc<dyn Environment>;

/// A layer that yields the same value everywhere. Useful as an ambient
/// constant (temperature, a broadcast source flag) and in tests.
pub struct UniformLayer {
    value: Value,
}

impl UniformLayer {
    /// Creates a layer yielding `value` at every position.
    pub fn new(value: impl Into<Value>) -> Self {
        UniformLayer {
            value: value.into(),
        }
    }
}

impl Layer for UniformLayer {
    fn value_at(&self, _position: &Position) -> Value {
        self.value.clone()
    }
}

/// In-memory implementation of [`Environment`].
///
/// Positions, layers, and the observed-key set live behind `RefCell`s so the
/// environment can be mutated through the shared `Rc` handle nodes hold,
/// matching the single-threaded simulation model.
#[derive(Default)]
pub struct InMemoryEnvironment {
    positions: RefCell<HashMap<NodeId, Position>>,
    layers: RefCell<IndexMap<String, Rc<dyn Layer>>>,
    observed: RefCell<IndexSet<String>>,
}

impl InMemoryEnvironment {
    /// Creates an empty environment with no placements, layers, or
    /// observed keys.
    pub fn new() -> Self {
        InMemoryEnvironment::default()
    }

    /// Places (or moves) a node at the given position.
    pub fn place(&self, node: NodeId, position: impl Into<Position>) {
        self.positions.borrow_mut().insert(node, position.into());
    }

    /// Registers (or replaces) the data layer for a key name.
    pub fn add_layer(&self, name: impl Into<String>, layer: Rc<dyn Layer>) {
        self.layers.borrow_mut().insert(name.into(), layer);
    }

    /// Marks a key name as observed: value changes under it are dispatched
    /// to node observers.
    pub fn observe(&self, name: impl Into<String>) {
        self.observed.borrow_mut().insert(name.into());
    }
}

impl Environment for InMemoryEnvironment {
    fn position_of(&self, node: NodeId) -> Option<Position> {
        self.positions.borrow().get(&node).cloned()
    }

    fn layer(&self, key: &Key) -> Option<Rc<dyn Layer>> {
        self.layers.borrow().get(key.name()).cloned()
    }

    fn is_observed(&self, key: &Key) -> bool {
        self.observed.borrow().contains(key.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplaced_node_has_no_position() {
        let env = InMemoryEnvironment::new();
        assert_eq!(env.position_of(NodeId(1)), None);
    }

    #[test]
    fn place_then_move_updates_position() {
        let env = InMemoryEnvironment::new();
        env.place(NodeId(1), (0.0, 0.0));
        env.place(NodeId(1), (3.0, 4.0));
        assert_eq!(env.position_of(NodeId(1)), Some((3.0, 4.0).into()));
    }

    #[test]
    fn layer_lookup_by_key_name() {
        let env = InMemoryEnvironment::new();
        env.add_layer("temperature", Rc::new(UniformLayer::new(21.5)));

        let layer = env.layer(&Key::new("temperature")).expect("layer present");
        assert_eq!(layer.value_at(&(0.0, 0.0).into()), Value::Real(21.5));
        assert!(env.layer(&Key::new("pressure")).is_none());
    }

    #[test]
    fn observed_membership() {
        let env = InMemoryEnvironment::new();
        env.observe("leader");
        assert!(env.is_observed(&Key::new("leader")));
        assert!(!env.is_observed(&Key::new("temperature")));
    }
}
