//! Stable ID newtypes for simulation entities.
//!
//! All IDs are distinct newtype wrappers over `u64`, providing type safety
//! so that a `NodeId` cannot be accidentally used where a `ProgramId` is
//! expected. Both are allocated by the node runtime from process-wide
//! monotonic counters and are immutable for the lifetime of the entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier. Process-unique and immutable after creation;
/// a cloned node always receives a fresh id, never the source's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identity of one scheduled aggregate-program instance on a node. Used as
/// the key of the per-node network-manager registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramId(pub u64);

// Display implementations -- just print the inner value.

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
