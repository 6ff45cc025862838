//! Named state keys ("molecules").
//!
//! A [`Key`] is the opaque, hashable identifier under which a node stores one
//! piece of local state. Keys are value objects: construction is a pure
//! function of the name, so two keys built from equal strings compare equal
//! and hash identically, which is what makes string-addressed store lookups
//! deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque named identifier for a piece of node state.
///
/// Construction never fails: the identifier is any UTF-8 string, including
/// the empty string. (The null-identifier failure mode of dynamically typed
/// hosts is unrepresentable here -- `&str` is never null.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key {
    name: String,
}

impl Key {
    /// Builds a key from a string identifier. Deterministic: equal inputs
    /// yield equal keys.
    pub fn new(name: impl Into<String>) -> Self {
        Key { name: name.into() }
    }

    /// The key's name, as supplied at construction.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::new(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key { name }
    }
}
