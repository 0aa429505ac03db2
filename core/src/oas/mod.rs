#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **document**: Read-only wrapper around the parsed document tree.
//! - **pointer**: Parsing of local `$ref` pointers.
//! - **resolver**: Pointer resolution with cycle detection and memoization.
//! - **schemas**: Classification of component schemas and export planning.
//! - **naming**: Identifier sanitizing and collision-free name allocation.
//! - **validation**: Stateless checks for methods, status codes and parameters.
//! - **operations**: Validated views over `paths`.

pub mod document;
pub mod naming;
pub mod operations;
pub mod pointer;
pub mod resolver;
pub mod schemas;
pub mod validation;

pub use document::Document;
pub use naming::{format_to_identifier_string, NameAllocator};
pub use operations::{collect_operations, OperationEntry, ParameterEntry, ResponseEntry};
pub use pointer::Pointer;
pub use resolver::{RefResolver, ResolutionCache, ResolutionPath};
pub use schemas::{process_object_schemas, ExportedComponentSchemas, ExportedSchema, PlanEntry};
