//! Logical simulation time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical-time instant on the simulation's event timeline.
///
/// Time is only produced and advanced by the external scheduler; this core
/// carries it through as the re-scheduling origin handed to cloned behaviors.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Time(pub f64);

impl Time {
    /// The simulation origin.
    pub const ZERO: Time = Time(0.0);
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Time {
    fn from(t: f64) -> Self {
        Time(t)
    }
}
