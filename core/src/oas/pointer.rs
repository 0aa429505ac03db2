#![deny(missing_docs)]

//! # Pointers
//!
//! Parsing of local `$ref` strings of the form `#/components/{section}/{name}`,
//! optionally followed by further segments into the named definition.
//!
//! External (cross-document) references are rejected outright.

use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use serde_json::Value as JsonValue;

/// Key marking a pointer wrapper object.
pub const REF_KEY: &str = "$ref";

const ROOT_PREFIX: &str = "#/components/";

/// Sections of the `components` object a pointer may address.
pub const COMPONENT_SECTIONS: [&str; 11] = [
    "schemas",
    "responses",
    "parameters",
    "examples",
    "requestBodies",
    "headers",
    "securitySchemes",
    "links",
    "callbacks",
    "pathItems",
    "mediaTypes",
];

/// A parsed, decoded pointer into the `components` section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    raw: String,
    section: String,
    name: String,
    rest: Vec<String>,
}

impl Pointer {
    /// Parses a pointer string, failing with `InvalidRefError` on any unsupported shape.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let tail = raw
            .strip_prefix(ROOT_PREFIX)
            .ok_or_else(|| AppError::invalid_ref(raw))?;

        let mut segments = tail.split('/');
        let section = segments.next().unwrap_or_default();
        if !COMPONENT_SECTIONS.contains(&section) {
            return Err(AppError::invalid_ref(raw));
        }

        let mut decoded = Vec::new();
        for segment in segments {
            if segment.is_empty() {
                return Err(AppError::invalid_ref(raw));
            }
            decoded.push(decode_pointer_segment(segment));
        }
        if decoded.is_empty() {
            return Err(AppError::invalid_ref(raw));
        }
        let name = decoded.remove(0);

        Ok(Self {
            raw: raw.to_string(),
            section: section.to_string(),
            name,
            rest: decoded,
        })
    }

    /// Builds the pointer addressing `components.{section}.{name}`.
    pub fn component(section: &str, name: &str) -> String {
        format!("{}{}/{}", ROOT_PREFIX, section, encode_pointer_segment(name))
    }

    /// The pointer as written in the document.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Component section (e.g. `schemas`).
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Decoded component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the pointer addresses a whole component rather than a location inside one.
    pub fn is_component(&self) -> bool {
        self.rest.is_empty()
    }

    /// The component name if this pointer addresses a whole `components.schemas` entry.
    pub fn component_schema_name(&self) -> Option<&str> {
        (self.section == "schemas" && self.is_component()).then_some(self.name.as_str())
    }

    /// Decoded traversal path from the document root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        ["components", self.section.as_str(), self.name.as_str()]
            .into_iter()
            .chain(self.rest.iter().map(String::as_str))
    }
}

/// Returns the pointer string if `value` is a pointer wrapper (`{ "$ref": ... }`).
///
/// Sibling keys next to `$ref` are ignored, as in OAS 3.0. A non-string `$ref`
/// is an `InvalidRefError`.
pub fn ref_of(value: &JsonValue) -> AppResult<Option<&str>> {
    match value.as_object().and_then(|map| map.get(REF_KEY)) {
        None => Ok(None),
        Some(JsonValue::String(pointer)) => Ok(Some(pointer.as_str())),
        Some(other) => Err(AppError::invalid_ref(other.to_string())),
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`, then percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn encode_pointer_segment(name: &str) -> String {
    name.replace('%', "%25")
        .replace('~', "~0")
        .replace('/', "~1")
}
