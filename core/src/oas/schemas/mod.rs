#![deny(missing_docs)]

//! # Component Schemas
//!
//! Handles `components/schemas`:
//! - Classifies each definition into a closed [`kind::SchemaKind`].
//! - Plans which definitions become standalone exports and under which name.

pub mod kind;
pub mod planner;

pub use kind::{classify, Combinator, SchemaKind};
pub use planner::{process_object_schemas, ExportedComponentSchemas, ExportedSchema, PlanEntry};
