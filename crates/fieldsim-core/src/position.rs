//! Spatial positions.
//!
//! The environment owns the node-to-position mapping; this core only carries
//! positions around as opaque coordinates when evaluating layers. Most
//! simulations are 2D, so coordinates use a two-slot small vector that only
//! spills for higher-dimensional spaces.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A point in the simulation space, of arbitrary dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    coords: SmallVec<[f64; 2]>,
}

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(coords: impl IntoIterator<Item = f64>) -> Self {
        Position {
            coords: coords.into_iter().collect(),
        }
    }

    /// Number of spatial dimensions.
    pub fn dimensions(&self) -> usize {
        self.coords.len()
    }

    /// The raw coordinates.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::new([x, y])
    }
}
