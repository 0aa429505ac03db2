#![deny(missing_docs)]

//! # oaslink Core
//!
//! Resolves `$ref` pointers inside an OpenAPI 3.x document and plans the export
//! name of every component schema that becomes a standalone declaration.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) document model, resolution and planning.
pub mod oas;

/// Composition root handed to code generators.
pub mod context;

pub use context::{generate_context, Context};
pub use error::{AppError, AppResult, ErrorCode};
pub use oas::{
    collect_operations, format_to_identifier_string, process_object_schemas, Document,
    ExportedComponentSchemas, ExportedSchema, NameAllocator, OperationEntry, ParameterEntry,
    PlanEntry, Pointer, RefResolver, ResolutionCache, ResolutionPath, ResponseEntry,
};
