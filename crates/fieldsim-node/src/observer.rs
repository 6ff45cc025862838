//! Change observation.
//!
//! Observers are external subscribers notified synchronously whenever an
//! observed key's value actually changes. The node invokes them but never
//! owns them: the registry holds weak handles, so a subscriber dropped
//! elsewhere is simply skipped at delivery time.
//!
//! Delivery is reentrant-unsafe by design: an observer must not mutate the
//! notifying node's contents from inside its handler, since that would
//! recursively trigger notification. The simulation's deterministic
//! single-threaded model treats this as disallowed rather than guarding
//! against it.

use fieldsim_core::{Key, NodeId, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A state-change event dispatched to node observers.
///
/// Serializable, so external tooling can journal change streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeEvent {
    /// The value under `key` changed on node `node`. `previous` is `None`
    /// when the key had no prior local value.
    ValueChanged {
        node: NodeId,
        key: Key,
        previous: Option<Value>,
        current: Value,
    },
}

/// Failure raised by an observer's handler.
///
/// Isolated per observer: a failing handler is logged and skipped, and never
/// prevents delivery to subsequent observers nor reaches the writer.
#[derive(Debug, Clone, Error)]
#[error("observer failed: {message}")]
pub struct ObserverError {
    message: String,
}

impl ObserverError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        ObserverError {
            message: message.into(),
        }
    }
}

/// The subscriber contract.
pub trait NodeObserver {
    /// Delivers one event. Returning `Err` marks this delivery as failed;
    /// the failure is isolated to this observer.
    fn notify_event(&self, event: &NodeEvent) -> Result<(), ObserverError>;
}
