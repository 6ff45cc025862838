//! The node: a single simulation participant and its local state container.
//!
//! [`Node`] is the single entry point for everything node-local. All state
//! maps are private; mutations go through `Node` methods so the change
//! detection and notification rules hold:
//!
//! - The **store** (`has`/`get`/`put`/`put_field`/`remove`/`commit`/
//!   `key_set`) is the uniform key-value execution environment the aggregate
//!   VM reads and writes node variables through.
//! - A **store miss** falls back to the environment: if a data layer is
//!   registered under the key's name and the node has a position, the layer
//!   is evaluated there. No caching -- both may change between calls.
//! - Every local write runs **change detection**: when the key is observed
//!   by the environment and the new value is unequal to the previous one,
//!   subscribers are notified synchronously, in subscription order, with
//!   per-observer failure isolation.
//! - The **network-manager registry** associates one externally owned
//!   handle per program instance; looking up an unregistered instance is a
//!   caller contract violation, not a miss.
//! - [`Node::clone_at`] replicates contents and scheduled behaviors onto a
//!   fresh identity; observers and managers are per-identity and start
//!   empty on the clone.

use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};

use fieldsim_core::{Field, Key, NodeId, ProgramId, Time, Value};

use crate::behavior::ScheduledBehavior;
use crate::environment::SharedEnvironment;
use crate::error::NodeError;
use crate::netmgr::NetworkManager;
use crate::observer::{NodeEvent, NodeObserver};

/// Process-wide id counter. Monotonic, so a clone can never reuse the
/// identity of any existing node.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

fn fresh_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

/// A single addressable participant in the spatial simulation.
///
/// The node participates in a larger, externally owned spatial graph: it
/// holds a non-owning [`SharedEnvironment`] reference and only ever queries
/// it. Single-threaded by construction (`Rc`/`Weak`, no locking), per the
/// enclosing simulation's deterministic event model.
pub struct Node {
    id: NodeId,
    environment: SharedEnvironment,
    /// Local key-value contents, in insertion order.
    contents: IndexMap<Key, Value>,
    /// Reaction/program bindings attached to this node, in attach order.
    behaviors: Vec<Box<dyn ScheduledBehavior>>,
    /// One communication handle per registered program instance.
    managers: IndexMap<ProgramId, Rc<dyn NetworkManager>>,
    /// Subscribers, in subscription order. Weak: the node notifies but
    /// never controls subscriber destruction.
    observers: Vec<Weak<dyn NodeObserver>>,
}

impl Node {
    /// Builds a new node bound to `environment`, with a fresh identity and
    /// empty contents, behaviors, and registries.
    pub fn new(environment: SharedEnvironment) -> Self {
        Node {
            id: fresh_node_id(),
            environment,
            contents: IndexMap::new(),
            behaviors: Vec::new(),
            managers: IndexMap::new(),
            observers: Vec::new(),
        }
    }

    /// The node's stable, process-unique identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The shared environment this node queries.
    pub fn environment(&self) -> &SharedEnvironment {
        &self.environment
    }

    // -------------------------------------------------------------------
    // Key-level contents access
    // -------------------------------------------------------------------

    /// Returns `true` iff `key` is present in the local contents.
    pub fn contains(&self, key: &Key) -> bool {
        self.contents.contains_key(key)
    }

    /// The locally stored value under `key`, without resolver fallback.
    pub fn concentration(&self, key: &Key) -> Option<&Value> {
        self.contents.get(key)
    }

    /// Writes `value` under `key` and runs change detection: when the
    /// environment observes this key and the value actually changed
    /// (previous absent or unequal), subscribers are notified.
    pub fn set_concentration(&mut self, key: Key, value: Value) {
        let previous = self.contents.get(&key).cloned();
        let changed = previous.as_ref() != Some(&value);
        if changed && self.environment.is_observed(&key) {
            self.contents.insert(key.clone(), value.clone());
            self.notify_observers(&NodeEvent::ValueChanged {
                node: self.id,
                key,
                previous,
                current: value,
            });
        } else {
            self.contents.insert(key, value);
        }
    }

    /// Deletes the local entry under `key`, returning it. Does not consult
    /// the resolver.
    pub fn remove_concentration(&mut self, key: &Key) -> Option<Value> {
        self.contents.shift_remove(key)
    }

    /// Read-only view of the local contents, in insertion order.
    pub fn contents(&self) -> &IndexMap<Key, Value> {
        &self.contents
    }

    /// Number of locally stored entries.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns `true` if the node has no local contents.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    // -------------------------------------------------------------------
    // VM-facing execution environment (string-addressed store)
    // -------------------------------------------------------------------

    /// Returns `true` iff the identifier names a locally stored value.
    /// Resolver-only keys are not local and report `false`.
    pub fn has(&self, id: &str) -> bool {
        self.contains(&Key::new(id))
    }

    /// The value under `id`: local contents first, then the environmental
    /// resolver, then `None`.
    pub fn get(&self, id: &str) -> Option<Value> {
        let key = Key::new(id);
        self.concentration(&key)
            .cloned()
            .or_else(|| self.resolve(&key))
    }

    /// [`Node::get`], falling back to `default` when absent everywhere.
    pub fn get_or(&self, id: &str, default: impl Into<Value>) -> Value {
        self.get(id).unwrap_or_else(|| default.into())
    }

    /// Writes `value` under `id`. Always succeeds; the `bool` return exists
    /// for protocol uniformity with the VM contract. Triggers change
    /// detection as a side effect.
    pub fn put(&mut self, id: &str, value: impl Into<Value>) -> bool {
        self.set_concentration(Key::new(id), value.into());
        true
    }

    /// Writes a neighbor-indexed field under `id`, collapsing it to a plain
    /// map at the boundary. The store never retains field-shaped values.
    pub fn put_field(&mut self, id: &str, field: Field) -> bool {
        self.set_concentration(Key::new(id), field.into_map());
        true
    }

    /// Returns what [`Node::get`] would (local or resolved), then deletes
    /// only the local entry. Resolver-sourced data is read-only to the node
    /// and is never deleted here.
    pub fn remove(&mut self, id: &str) -> Option<Value> {
        let result = self.get(id);
        self.remove_concentration(&Key::new(id));
        result
    }

    /// Transactional hook. This node buffers nothing, so this is a no-op,
    /// but the contract point must exist for the VM protocol.
    pub fn commit(&mut self) {}

    /// Snapshot of the locally stored key names, in insertion order.
    /// Resolver-only keys are excluded.
    pub fn key_set(&self) -> IndexSet<String> {
        self.contents
            .keys()
            .map(|key| key.name().to_string())
            .collect()
    }

    /// Environmental fallback: evaluate the layer named by `key` at this
    /// node's current position. Absent when no such layer exists or the
    /// node has not been placed yet.
    fn resolve(&self, key: &Key) -> Option<Value> {
        let layer = self.environment.layer(key)?;
        let position = self.environment.position_of(self.id)?;
        Some(layer.value_at(&position))
    }

    // -------------------------------------------------------------------
    // Observer registry
    // -------------------------------------------------------------------

    /// Subscribes an observer. Append-only: insertion order is preserved,
    /// duplicates are permitted, and entries are never removed for the
    /// node's lifetime (dropped subscribers are skipped at delivery).
    pub fn subscribe<O: NodeObserver + 'static>(&mut self, observer: &Rc<O>) {
        let weak = Rc::downgrade(observer);
        let handle: Weak<dyn NodeObserver> = weak;
        self.observers.push(handle);
    }

    /// Delivers `event` synchronously to every live subscriber, in
    /// subscription order. A failing handler is logged and skipped; it
    /// never prevents delivery to subsequent observers nor reaches the
    /// caller of the triggering write.
    pub fn notify_observers(&self, event: &NodeEvent) {
        for handle in &self.observers {
            let Some(observer) = handle.upgrade() else {
                continue;
            };
            if let Err(err) = observer.notify_event(event) {
                tracing::warn!(node = %self.id, error = %err, "observer notification failed");
            }
        }
    }

    // -------------------------------------------------------------------
    // Network-manager registry
    // -------------------------------------------------------------------

    /// Associates `manager` with the given program instance, overwriting
    /// any prior association. Entries live for the node's lifetime.
    pub fn register_network_manager(&mut self, program: ProgramId, manager: Rc<dyn NetworkManager>) {
        self.managers.insert(program, manager);
    }

    /// The manager registered for `program`. Failing here is a contract
    /// violation in the caller (the VM must register before first use),
    /// not a recoverable miss.
    pub fn network_manager(&self, program: ProgramId) -> Result<Rc<dyn NetworkManager>, NodeError> {
        self.managers
            .get(&program)
            .cloned()
            .ok_or(NodeError::ManagerNotRegistered { program })
    }

    // -------------------------------------------------------------------
    // Scheduled behaviors and the clone protocol
    // -------------------------------------------------------------------

    /// Attaches a behavior to this node.
    pub fn add_behavior(&mut self, behavior: Box<dyn ScheduledBehavior>) {
        self.behaviors.push(behavior);
    }

    /// The behaviors attached to this node, in attach order. Enumerated by
    /// the external scheduler.
    pub fn behaviors(&self) -> &[Box<dyn ScheduledBehavior>] {
        &self.behaviors
    }

    /// Replicates this node onto a fresh identity at logical time `time`.
    ///
    /// The clone is bound to the same environment, receives a value-copy of
    /// the contents written through the standard change-detecting path, and
    /// carries a re-targeted copy of every scheduled behavior with `time`
    /// as its new scheduling origin. Observer and network-manager
    /// registries are per-identity and start empty. The result is
    /// state-equivalent, identity-distinct, and independently mutable.
    pub fn clone_at(&self, time: Time) -> Node {
        let mut result = Node::new(Rc::clone(&self.environment));
        tracing::debug!(source = %self.id, clone = %result.id, "cloning node");
        for (key, value) in &self.contents {
            result.set_concentration(key.clone(), value.clone());
        }
        let new_id = result.id;
        result.behaviors = self
            .behaviors
            .iter()
            .map(|behavior| behavior.clone_on_new_node(new_id, time))
            .collect();
        result
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
