#![deny(missing_docs)]

//! # Resolution Path
//!
//! The pointers currently being dereferenced on one call chain.

/// An append-only chain of pointers.
///
/// Extending a path produces a new value; the caller's path is never modified, so
/// sibling resolutions never observe each other's pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPath {
    pointers: Vec<String>,
}

impl ResolutionPath {
    /// An empty path, used at every top-level resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `pointer` is already being resolved on this chain.
    pub fn contains(&self, pointer: &str) -> bool {
        self.pointers.iter().any(|p| p == pointer)
    }

    /// Returns a new path with `pointer` appended.
    pub fn with(&self, pointer: &str) -> Self {
        let mut pointers = Vec::with_capacity(self.pointers.len() + 1);
        pointers.extend(self.pointers.iter().cloned());
        pointers.push(pointer.to_string());
        Self { pointers }
    }

    /// The chain reported when `pointer` closes a cycle: the whole path followed
    /// by the repeated pointer.
    pub fn closing(&self, pointer: &str) -> Vec<String> {
        self.with(pointer).pointers
    }

    /// Pointers in resolution order.
    pub fn as_slice(&self) -> &[String] {
        &self.pointers
    }

    /// Number of pointers on the chain.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// True for a top-level resolution.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}
