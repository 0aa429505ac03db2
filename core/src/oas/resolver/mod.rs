#![deny(missing_docs)]

//! # Resolver Module
//!
//! Resolves `$ref` pointers against a single [`Document`].
//!
//! Handles:
//! - Parsing and lookup of a single pointer (`resolve_ref`).
//! - Following chains of pointers to a concrete node (`resolve_object`).
//! - Cycle detection over the active [`ResolutionPath`].
//! - A [`ResolutionCache`] filled while the context is built and read-only afterwards.
//!
//! Every node handed out is a borrow into the document, so resolving the same
//! pointer twice always yields the identical node.

pub mod path;

pub use path::ResolutionPath;

use crate::error::{AppError, AppResult};
use crate::oas::document::Document;
use crate::oas::pointer::{ref_of, Pointer};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Pointer string -> concrete node it finally resolves to.
#[derive(Debug, Default, Clone)]
pub struct ResolutionCache<'doc> {
    entries: HashMap<String, &'doc JsonValue>,
}

impl<'doc> ResolutionCache<'doc> {
    /// Returns the cached target of `pointer`.
    pub fn get(&self, pointer: &str) -> Option<&'doc JsonValue> {
        self.entries.get(pointer).copied()
    }

    /// Number of cached pointers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extend(&mut self, fresh: Vec<(String, &'doc JsonValue)>) {
        self.entries.extend(fresh);
    }
}

/// Pointer resolver bound to one document.
#[derive(Debug, Clone)]
pub struct RefResolver<'doc> {
    document: &'doc Document,
    cache: ResolutionCache<'doc>,
}

impl<'doc> RefResolver<'doc> {
    /// Creates a resolver with an empty cache.
    pub fn new(document: &'doc Document) -> Self {
        Self {
            document,
            cache: ResolutionCache::default(),
        }
    }

    /// The document pointers are resolved against.
    pub fn document(&self) -> &'doc Document {
        self.document
    }

    /// The memoized resolutions so far.
    pub fn cache(&self) -> &ResolutionCache<'doc> {
        &self.cache
    }

    /// Returns the raw node at `pointer`.
    ///
    /// The node may itself be a pointer wrapper; use [`Self::resolve_object`] to
    /// follow the chain to a concrete node.
    pub fn resolve_ref(&self, pointer: &str) -> AppResult<&'doc JsonValue> {
        let parsed = Pointer::parse(pointer)?;
        self.document
            .get(&parsed)
            .ok_or_else(|| AppError::resolve_ref(pointer))
    }

    /// Follows `value` to a concrete node. Concrete values come back unchanged.
    ///
    /// Reads the cache but never writes it.
    pub fn resolve_object(
        &self,
        value: &'doc JsonValue,
        path: &ResolutionPath,
    ) -> AppResult<&'doc JsonValue> {
        self.follow(value, path, &mut Vec::new())
    }

    /// Like [`Self::resolve_object`], starting from a pointer string.
    pub fn resolve_pointer(
        &self,
        pointer: &str,
        path: &ResolutionPath,
    ) -> AppResult<&'doc JsonValue> {
        self.follow_pointer(pointer, path, &mut Vec::new())
    }

    /// Memoizing variant of [`Self::resolve_object`].
    ///
    /// Every pointer on a successful chain is cached against the final node. A
    /// failed chain leaves the cache untouched.
    pub fn resolve_object_cached(
        &mut self,
        value: &'doc JsonValue,
        path: &ResolutionPath,
    ) -> AppResult<&'doc JsonValue> {
        let mut fresh = Vec::new();
        let resolved = self.follow(value, path, &mut fresh)?;
        self.cache.extend(fresh);
        Ok(resolved)
    }

    /// Memoizing variant of [`Self::resolve_pointer`].
    pub fn resolve_pointer_cached(
        &mut self,
        pointer: &str,
        path: &ResolutionPath,
    ) -> AppResult<&'doc JsonValue> {
        let mut fresh = Vec::new();
        let resolved = self.follow_pointer(pointer, path, &mut fresh)?;
        self.cache.extend(fresh);
        Ok(resolved)
    }

    fn follow(
        &self,
        value: &'doc JsonValue,
        path: &ResolutionPath,
        fresh: &mut Vec<(String, &'doc JsonValue)>,
    ) -> AppResult<&'doc JsonValue> {
        match ref_of(value)? {
            Some(pointer) => self.follow_pointer(pointer, path, fresh),
            None => Ok(value),
        }
    }

    fn follow_pointer(
        &self,
        pointer: &str,
        path: &ResolutionPath,
        fresh: &mut Vec<(String, &'doc JsonValue)>,
    ) -> AppResult<&'doc JsonValue> {
        if path.contains(pointer) {
            return Err(AppError::CircularRefDependency {
                chain: path.closing(pointer),
            });
        }

        if let Some(hit) = self.cache.get(pointer) {
            tracing::trace!(pointer, "resolution cache hit");
            return Ok(hit);
        }

        let target = self.resolve_ref(pointer)?;
        let resolved = self.follow(target, &path.with(pointer), fresh)?;
        tracing::trace!(pointer, depth = path.len(), "resolved pointer");
        fresh.push((pointer.to_string(), resolved));
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Document {
        Document::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    const CHAINED: &str = r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        name: {type: string}
    PetAlias:
      $ref: '#/components/schemas/Pet'
    PetAliasAlias:
      $ref: '#/components/schemas/PetAlias'
  parameters:
    Limit:
      name: limit
      in: query
      schema: {type: integer}
"#;

    #[test]
    fn test_resolve_ref_returns_raw_node() {
        let document = doc(CHAINED);
        let resolver = RefResolver::new(&document);

        let raw = resolver
            .resolve_ref("#/components/schemas/PetAliasAlias")
            .unwrap();
        assert_eq!(
            ref_of(raw).unwrap(),
            Some("#/components/schemas/PetAlias")
        );

        let param = resolver
            .resolve_ref("#/components/parameters/Limit")
            .unwrap();
        assert_eq!(param["in"], "query");
    }

    #[test]
    fn test_resolve_ref_errors() {
        let document = doc(CHAINED);
        let resolver = RefResolver::new(&document);

        assert_eq!(
            resolver.resolve_ref("components/schemas/Foo").unwrap_err(),
            AppError::InvalidRef {
                reference: "components/schemas/Foo".into()
            }
        );
        assert_eq!(
            resolver
                .resolve_ref("#/components/schemas/Missing")
                .unwrap_err(),
            AppError::ResolveRef {
                reference: "#/components/schemas/Missing".into()
            }
        );
    }

    #[test]
    fn test_resolve_object_follows_chain() {
        let document = doc(CHAINED);
        let resolver = RefResolver::new(&document);
        let pet = resolver.resolve_ref("#/components/schemas/Pet").unwrap();

        let alias = resolver
            .resolve_ref("#/components/schemas/PetAlias")
            .unwrap();
        let via_alias = resolver
            .resolve_object(alias, &ResolutionPath::new())
            .unwrap();
        assert!(std::ptr::eq(pet, via_alias));

        let via_pointer = resolver
            .resolve_pointer(
                "#/components/schemas/PetAliasAlias",
                &ResolutionPath::new(),
            )
            .unwrap();
        assert!(std::ptr::eq(pet, via_pointer));
    }

    #[test]
    fn test_resolve_object_passes_concrete_values_through() {
        let document = doc(CHAINED);
        let resolver = RefResolver::new(&document);
        let pet = resolver.resolve_ref("#/components/schemas/Pet").unwrap();
        let same = resolver.resolve_object(pet, &ResolutionPath::new()).unwrap();
        assert!(std::ptr::eq(pet, same));
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_cached_resolution_memoizes_whole_chain() {
        let document = doc(CHAINED);
        let mut resolver = RefResolver::new(&document);

        let first = resolver
            .resolve_pointer_cached(
                "#/components/schemas/PetAliasAlias",
                &ResolutionPath::new(),
            )
            .unwrap();
        assert_eq!(resolver.cache().len(), 3);

        let cached = resolver
            .cache()
            .get("#/components/schemas/PetAlias")
            .unwrap();
        assert!(std::ptr::eq(first, cached));

        let again = resolver
            .resolve_pointer(
                "#/components/schemas/PetAliasAlias",
                &ResolutionPath::new(),
            )
            .unwrap();
        assert!(std::ptr::eq(first, again));
    }

    #[test]
    fn test_cycle_reports_full_chain() {
        let document = doc(
            r#"
openapi: 3.0.0
info: {title: T, version: "1"}
paths: {}
components:
  schemas:
    A: {$ref: '#/components/schemas/B'}
    B: {$ref: '#/components/schemas/A'}
"#,
        );
        let mut resolver = RefResolver::new(&document);

        let err = resolver
            .resolve_pointer_cached("#/components/schemas/A", &ResolutionPath::new())
            .unwrap_err();
        assert_eq!(
            err,
            AppError::CircularRefDependency {
                chain: vec![
                    "#/components/schemas/A".into(),
                    "#/components/schemas/B".into(),
                    "#/components/schemas/A".into(),
                ]
            }
        );
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_cycle_respects_caller_path() {
        let document = doc(CHAINED);
        let resolver = RefResolver::new(&document);
        let path = ResolutionPath::new().with("#/components/schemas/Pet");

        let err = resolver
            .resolve_pointer("#/components/schemas/Pet", &path)
            .unwrap_err();
        assert!(matches!(err, AppError::CircularRefDependency { ref chain } if chain.len() == 2));
    }
}
