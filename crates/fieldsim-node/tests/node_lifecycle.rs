//! End-to-end tests for the node lifecycle: the store/resolver interplay,
//! observation, and the clone protocol.
//!
//! Each test builds an `InMemoryEnvironment`, constructs nodes against it,
//! and drives them through the same call sequences an aggregate VM and the
//! simulation scheduler would.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use fieldsim_core::{Field, NodeId, ProgramId, Time, Value};
use fieldsim_node::{
    InMemoryEnvironment, NetworkManager, Node, NodeEvent, NodeObserver, ObserverError,
    ScheduledBehavior, SharedEnvironment, UniformLayer,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn shared_env() -> (Rc<InMemoryEnvironment>, SharedEnvironment) {
    let env = Rc::new(InMemoryEnvironment::new());
    let shared: SharedEnvironment = env.clone();
    (env, shared)
}

/// Behavior that logs every re-targeting call to a shared journal.
struct ProbeBehavior {
    origin: Time,
    journal: Rc<RefCell<Vec<(NodeId, Time)>>>,
}

impl ScheduledBehavior for ProbeBehavior {
    fn scheduled_at(&self) -> Time {
        self.origin
    }

    fn clone_on_new_node(&self, new_node: NodeId, time: Time) -> Box<dyn ScheduledBehavior> {
        self.journal.borrow_mut().push((new_node, time));
        Box::new(ProbeBehavior {
            origin: time,
            journal: self.journal.clone(),
        })
    }
}

/// Manager that remembers what was sent through it.
#[derive(Debug, Default)]
struct LoopbackManager {
    outbox: RefCell<Vec<Value>>,
}

impl NetworkManager for LoopbackManager {
    fn send(&self, payload: Value) {
        self.outbox.borrow_mut().push(payload);
    }

    fn receive(&self) -> Field {
        Field::new()
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: RefCell<Vec<NodeEvent>>,
}

impl NodeObserver for RecordingObserver {
    fn notify_event(&self, event: &NodeEvent) -> Result<(), ObserverError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Clone protocol
// ---------------------------------------------------------------------------

#[test]
fn clone_duplicates_contents_and_retargets_behaviors() {
    let (_, shared) = shared_env();
    let mut source = Node::new(shared);
    source.put("a", 1i64);
    source.put("b", 2i64);

    let journal = Rc::new(RefCell::new(Vec::new()));
    for _ in 0..2 {
        source.add_behavior(Box::new(ProbeBehavior {
            origin: Time::ZERO,
            journal: journal.clone(),
        }));
    }

    let t = Time(12.5);
    let clone = source.clone_at(t);

    assert_ne!(clone.id(), source.id());
    assert_eq!(clone.get("a"), Some(Value::Int(1)));
    assert_eq!(clone.get("b"), Some(Value::Int(2)));
    assert_eq!(clone.len(), 2);

    // Both behaviors were re-targeted to the clone's identity at time t.
    assert_eq!(clone.behaviors().len(), 2);
    assert_eq!(&*journal.borrow(), &vec![(clone.id(), t), (clone.id(), t)]);
    assert_eq!(clone.behaviors()[0].scheduled_at(), t);
    // The source keeps its own behaviors and scheduling.
    assert_eq!(source.behaviors().len(), 2);
    assert_eq!(source.behaviors()[0].scheduled_at(), Time::ZERO);
}

#[test]
fn clone_starts_with_empty_registries() {
    let (env, shared) = shared_env();
    env.observe("a");
    let mut source = Node::new(shared);

    let observer = Rc::new(RecordingObserver::default());
    source.subscribe(&observer);
    source.register_network_manager(ProgramId(1), Rc::new(LoopbackManager::default()));
    source.put("a", 1i64);

    let clone = source.clone_at(Time(1.0));

    // Managers are per-identity: the clone's registry is empty.
    assert!(clone.network_manager(ProgramId(1)).is_err());
    // Observers are per-identity too: copying "a" onto the clone went
    // through the notifying write path, but nobody was subscribed there.
    assert_eq!(observer.events.borrow().len(), 1);
}

#[test]
fn clone_and_source_are_independently_mutable() {
    let (_, shared) = shared_env();
    let mut source = Node::new(shared);
    source.put("a", 1i64);

    let mut clone = source.clone_at(Time(1.0));
    clone.put("a", 100i64);
    clone.put("c", 3i64);
    source.put("b", 2i64);

    assert_eq!(source.get("a"), Some(Value::Int(1)));
    assert_eq!(source.get("c"), None);
    assert_eq!(clone.get("a"), Some(Value::Int(100)));
    assert_eq!(clone.get("b"), None);
    assert_eq!(clone.get("c"), Some(Value::Int(3)));
}

#[test]
fn clone_shares_the_environment() {
    let (env, shared) = shared_env();
    env.add_layer("temperature", Rc::new(UniformLayer::new(21.5)));
    let source = Node::new(shared);

    let clone = source.clone_at(Time(0.5));
    env.place(clone.id(), (0.0, 0.0));

    assert_eq!(clone.get("temperature"), Some(Value::Real(21.5)));
    // The source was never placed, so its resolution stays absent.
    assert_eq!(source.get("temperature"), None);
}

// ---------------------------------------------------------------------------
// Store + resolver + manager interplay, VM-style
// ---------------------------------------------------------------------------

#[test]
fn vm_round_uses_manager_after_registration() {
    let (_, shared) = shared_env();
    let mut node = Node::new(shared);
    let manager = Rc::new(LoopbackManager::default());
    let program = ProgramId(7);
    node.register_network_manager(program, manager.clone());

    // A program step: compute, share through the manager, store the result.
    let state = Value::Int(41);
    node.network_manager(program).unwrap().send(state.clone());
    let mut field = node.network_manager(program).unwrap().receive();
    field.insert(node.id(), state);
    node.put_field("exchange", field);
    node.commit();

    assert_eq!(manager.outbox.borrow().len(), 1);
    match node.get("exchange") {
        Some(Value::Map(entries)) => {
            assert_eq!(entries[&node.id().to_string()], Value::Int(41));
        }
        other => panic!("expected Map, got {:?}", other),
    }
}

#[test]
fn resolver_reflects_environment_changes_between_calls() {
    let (env, shared) = shared_env();
    env.add_layer("temperature", Rc::new(UniformLayer::new(10.0)));
    let node = Node::new(shared);
    env.place(node.id(), (0.0, 0.0));

    assert_eq!(node.get("temperature"), Some(Value::Real(10.0)));

    // No caching: replacing the layer changes the next resolution.
    env.add_layer("temperature", Rc::new(UniformLayer::new(20.0)));
    assert_eq!(node.get("temperature"), Some(Value::Real(20.0)));
}

// ---------------------------------------------------------------------------
// Store properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn put_then_get_returns_the_written_value(
        writes in proptest::collection::vec(("[a-z]{1,6}", -1000i64..1000), 1..30)
    ) {
        let (_, shared) = shared_env();
        let mut node = Node::new(shared);
        for (id, v) in &writes {
            node.put(id, *v);
            prop_assert_eq!(node.get(id), Some(Value::Int(*v)));
        }
        // Every key reports the value of its last write.
        for (id, _) in &writes {
            let last = writes.iter().rev().find(|(i, _)| i == id).unwrap().1;
            prop_assert_eq!(node.get(id), Some(Value::Int(last)));
            prop_assert!(node.has(id));
        }
    }

    #[test]
    fn remove_then_get_no_longer_returns_the_value(
        id in "[a-z]{1,6}", v in -1000i64..1000
    ) {
        let (_, shared) = shared_env();
        let mut node = Node::new(shared);
        node.put(&id, v);
        prop_assert_eq!(node.remove(&id), Some(Value::Int(v)));
        prop_assert!(!node.has(&id));
        prop_assert_eq!(node.get(&id), None);
    }
}
