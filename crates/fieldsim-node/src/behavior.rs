//! Scheduled behaviors: the contract between a node and the external
//! scheduler.
//!
//! A behavior is a reaction/program binding attached to one node. The node
//! owns its behavior collection and exposes it for the scheduler to
//! enumerate; execution itself is out of scope here. What matters to this
//! crate is replication: when a node is cloned, each behavior must produce a
//! copy re-targeted to the clone's identity and re-parameterized with the
//! clone's logical time.

use fieldsim_core::{NodeId, Time};

/// A reaction/program binding attached to a node.
pub trait ScheduledBehavior {
    /// The behavior's current scheduling origin on the logical timeline.
    fn scheduled_at(&self) -> Time;

    /// Produces a copy of this behavior bound to `new_node`, with `time` as
    /// its new scheduling origin. Deliberate factory operation, not an
    /// implicit copy: the behavior must rewire its device identity.
    fn clone_on_new_node(&self, new_node: NodeId, time: Time) -> Box<dyn ScheduledBehavior>;
}
