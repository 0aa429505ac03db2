#![deny(missing_docs)]

//! # OpenAPI Document
//!
//! Read-only wrapper around the raw JSON tree of an API description. The tree is
//! kept untyped so that any location addressed by a pointer can be handed out as a
//! borrowed `&Value`; typed views are derived on demand by the resolver and planner.

use crate::error::{AppError, AppResult};
use crate::oas::pointer::Pointer;
use serde_json::{Map, Value as JsonValue};

/// An API description document, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    raw: JsonValue,
}

impl Document {
    /// Wraps an already parsed document tree.
    ///
    /// Only the `3.x` family is accepted; Swagger 2.0 documents are rejected as
    /// unsupported rather than half-processed.
    pub fn from_value(raw: JsonValue) -> AppResult<Self> {
        let root = raw.as_object().ok_or_else(|| {
            AppError::Unexpected("OpenAPI document root must be a mapping".into())
        })?;

        if let Some(version) = root.get("swagger") {
            return Err(AppError::NotImplemented(format!(
                "Swagger {} documents are not supported; convert to OpenAPI 3.x first",
                version_label(version)
            )));
        }

        match root.get("openapi") {
            Some(JsonValue::String(version)) if version.starts_with("3.") => {}
            Some(other) => {
                return Err(AppError::NotImplemented(format!(
                    "Unsupported OpenAPI version: {}. Only 3.x is supported.",
                    version_label(other)
                )))
            }
            None => {
                return Err(AppError::NotImplemented(
                    "OpenAPI document without an 'openapi' version field is not supported".into(),
                ))
            }
        }

        Ok(Self { raw })
    }

    /// The raw document tree.
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    /// The declared `openapi` version string.
    pub fn version(&self) -> Option<&str> {
        self.raw.get("openapi").and_then(JsonValue::as_str)
    }

    /// The `paths` mapping, in document order.
    pub fn paths(&self) -> Option<&Map<String, JsonValue>> {
        self.raw.get("paths").and_then(JsonValue::as_object)
    }

    /// A section of `components` (e.g. `schemas`, `parameters`).
    pub fn component_section(&self, section: &str) -> Option<&Map<String, JsonValue>> {
        self.raw
            .get("components")
            .and_then(|c| c.get(section))
            .and_then(JsonValue::as_object)
    }

    /// The `components.schemas` mapping, in document order.
    pub fn component_schemas(&self) -> Option<&Map<String, JsonValue>> {
        self.component_section("schemas")
    }

    /// A single entry of `components.schemas`, returning the stored key with it.
    pub fn component_schema(&self, name: &str) -> Option<(&String, &JsonValue)> {
        self.component_schemas()?.get_key_value(name)
    }

    /// Follows a parsed pointer through the document tree.
    ///
    /// Mapping segments are looked up by key; sequence segments must be decimal
    /// indices.
    pub fn get(&self, pointer: &Pointer) -> Option<&JsonValue> {
        pointer
            .segments()
            .try_fold(&self.raw, |node, segment| match node {
                JsonValue::Object(map) => map.get(segment),
                JsonValue::Array(items) => array_index(segment).and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

/// Canonical decimal index only: no sign, no leading zeros.
fn array_index(segment: &str) -> Option<usize> {
    let index = segment.parse::<usize>().ok()?;
    (index.to_string() == segment).then_some(index)
}

fn version_label(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
