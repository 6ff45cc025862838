//! Network-manager handles for neighbor-state exchange.
//!
//! During aggregate execution, the VM's networking primitives need a
//! communication channel scoped to one program instance on one node. The
//! node only associates program instances with externally constructed
//! handles; it never owns the handle's lifecycle or the transport behind it.

use fieldsim_core::{Field, Value};

/// A per-program-instance communication handle.
///
/// Implementations live outside this crate (the simulation engine or a real
/// transport). Handles are expected to use interior mutability: the node
/// shares them as `Rc<dyn NetworkManager>`.
pub trait NetworkManager: std::fmt::Debug {
    /// Shares this node's state contribution with its current neighborhood.
    fn send(&self, payload: Value);

    /// Collects the most recent neighbor contributions as a field.
    fn receive(&self) -> Field;
}
