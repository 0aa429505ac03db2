#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helpers for deriving identifier-safe export names from component names.

use std::collections::HashSet;

/// Turns an arbitrary string into a bare identifier.
///
/// - An empty string becomes `_`.
/// - Any character outside `[A-Za-z0-9_$]` becomes `_`.
/// - A leading digit gets a `_` prefix.
pub fn format_to_identifier_string(s: &str) -> String {
    if s.is_empty() {
        return "_".to_string();
    }

    let mut result: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Hands out unique names, suffixing `_2`, `_3`, ... on collision.
///
/// Allocation order decides who keeps the bare name, so callers must allocate in
/// a deterministic order.
#[derive(Debug, Default, Clone)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves and returns the first free name derived from `candidate`.
    pub fn allocate(&mut self, candidate: &str) -> String {
        if self.taken.insert(candidate.to_string()) {
            return candidate.to_string();
        }

        let mut suffix = 2usize;
        loop {
            let name = format!("{}_{}", candidate, suffix);
            if self.taken.insert(name.clone()) {
                return name;
            }
            suffix += 1;
        }
    }
}
