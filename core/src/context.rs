//! # Generation Context
//!
//! Binds one document, its resolver and its export plan into the read-only handle
//! passed to every code generation stage.

use crate::error::AppResult;
use crate::oas::document::Document;
use crate::oas::operations::{collect_operations, OperationEntry};
use crate::oas::resolver::{RefResolver, ResolutionPath};
use crate::oas::schemas::planner::{process_object_schemas, ExportedComponentSchemas};
use serde_json::Value as JsonValue;

/// Frozen state of one generation run.
///
/// All accessors take `&self`; the handle can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Context<'doc> {
    document: &'doc Document,
    resolver: RefResolver<'doc>,
    exported_component_schemas_map: ExportedComponentSchemas<'doc>,
}

/// Builds the context for `document`.
///
/// The resolution cache is filled while planning exports and frozen afterwards.
pub fn generate_context(document: &Document) -> AppResult<Context<'_>> {
    let mut resolver = RefResolver::new(document);
    let exported_component_schemas_map = process_object_schemas(document, &mut resolver)?;

    tracing::debug!(
        exports = exported_component_schemas_map.len(),
        cached_refs = resolver.cache().len(),
        "generation context ready"
    );

    Ok(Context {
        document,
        resolver,
        exported_component_schemas_map,
    })
}

impl<'doc> Context<'doc> {
    /// The document of this run.
    pub fn document(&self) -> &'doc Document {
        self.document
    }

    /// The frozen resolver.
    pub fn resolver(&self) -> &RefResolver<'doc> {
        &self.resolver
    }

    /// See [`RefResolver::resolve_ref`].
    pub fn resolve_ref(&self, pointer: &str) -> AppResult<&'doc JsonValue> {
        self.resolver.resolve_ref(pointer)
    }

    /// See [`RefResolver::resolve_object`].
    pub fn resolve_object(
        &self,
        value: &'doc JsonValue,
        path: &ResolutionPath,
    ) -> AppResult<&'doc JsonValue> {
        self.resolver.resolve_object(value, path)
    }

    /// Component name -> export decision.
    pub fn exported_component_schemas_map(&self) -> &ExportedComponentSchemas<'doc> {
        &self.exported_component_schemas_map
    }

    /// Identifier to reference at a use site of `pointer`, if the target is exported.
    pub fn export_name_for_ref(&self, pointer: &str) -> Option<&str> {
        self.exported_component_schemas_map
            .export_name_for_ref(pointer)
    }

    /// Validated operations under `paths`.
    pub fn operations(&self) -> AppResult<Vec<OperationEntry<'doc>>> {
        collect_operations(self.document, &self.resolver)
    }
}
