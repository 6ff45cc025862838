//! Node runtime for a spatial aggregate-computing simulation.
//!
//! Models a single addressable participant ("node") executing
//!aggregate/field-based programs. The node is a uniform key-value execution
//! environment for the programs scheduled on it:
//!
//! - [`Node`] owns the local state store with change detection, the observer
//!   list, the per-program network-manager registry, and the attached
//!   scheduled behaviors.
//! - [`Environment`] and [`Layer`] are the boundary to the externally owned
//!   spatial environment: a store miss falls back to evaluating a matching
//!   data layer at the node's current position.
//! - [`NodeObserver`] receives synchronous change events for keys the
//!   environment designates as observed.
//! - [`NetworkManager`] is the per-program handle the aggregate VM uses for
//!   neighbor-state exchange.
//! - [`ScheduledBehavior`] is the scheduler-facing contract; behaviors can
//!   replicate themselves onto a cloned node via `clone_on_new_node`.
//!
//! The whole crate assumes the enclosing simulation's single-threaded,
//! deterministic event model: no operation blocks or suspends, and shared
//! references use `Rc`/`Weak`, not atomics.

pub mod behavior;
pub mod environment;
pub mod error;
pub mod netmgr;
pub mod node;
pub mod observer;

pub use behavior::ScheduledBehavior;
pub use environment::{Environment, InMemoryEnvironment, Layer, SharedEnvironment, UniformLayer};
pub use error::NodeError;
pub use netmgr::NetworkManager;
pub use node::Node;
pub use observer::{NodeEvent, NodeObserver, ObserverError};
