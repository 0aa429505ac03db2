#![deny(missing_docs)]

//! # Schema Kinds
//!
//! Classifies a raw schema node once into a closed set of structural kinds so that
//! later stages match on [`SchemaKind`] instead of probing fields again.

use crate::error::{AppError, AppResult};
use crate::oas::pointer::ref_of;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::slice;
use utoipa::openapi::schema::Type;

/// Composition keyword of a [`SchemaKind::Composition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `allOf`
    AllOf,
    /// `oneOf`
    OneOf,
    /// `anyOf`
    AnyOf,
    /// `not`
    Not,
}

impl Combinator {
    const KEYS: [(&'static str, Combinator); 4] = [
        ("allOf", Combinator::AllOf),
        ("oneOf", Combinator::OneOf),
        ("anyOf", Combinator::AnyOf),
        ("not", Combinator::Not),
    ];
}

/// Structural kind of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind<'doc> {
    /// `{ "$ref": ... }`
    Pointer(&'doc str),
    /// `type: object`, or a node with `properties` / `additionalProperties`.
    Object(&'doc Map<String, JsonValue>),
    /// `type: array`, or a node with `items`.
    Array {
        /// Item schema, when declared.
        items: Option<&'doc JsonValue>,
    },
    /// A node with an `enum` list.
    Enum {
        /// Allowed values.
        values: &'doc [JsonValue],
        /// Declared base type of the values.
        base: Option<Type>,
    },
    /// `allOf` / `oneOf` / `anyOf` / `not`.
    Composition {
        /// Which keyword.
        combinator: Combinator,
        /// Subschemas (a single entry for `not`).
        branches: &'doc [JsonValue],
    },
    /// Scalar schema; `None` when no type is declared.
    Primitive(Option<Type>),
}

impl SchemaKind<'_> {
    /// True for kinds that become a standalone declaration when defined as a component.
    pub fn is_exportable(&self) -> bool {
        match self {
            SchemaKind::Object(_)
            | SchemaKind::Array { .. }
            | SchemaKind::Enum { .. }
            | SchemaKind::Composition { .. } => true,
            SchemaKind::Pointer(_) | SchemaKind::Primitive(_) => false,
        }
    }

    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            SchemaKind::Pointer(_) => "pointer",
            SchemaKind::Object(_) => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Enum { .. } => "enum",
            SchemaKind::Composition { .. } => "composition",
            SchemaKind::Primitive(_) => "primitive",
        }
    }
}

/// Classifies a schema node.
///
/// Checks run in a fixed order: `$ref`, `enum`, composition keywords, array,
/// object, then primitive.
pub fn classify(value: &JsonValue) -> AppResult<SchemaKind<'_>> {
    let map = match value {
        JsonValue::Object(map) => map,
        JsonValue::Bool(_) => {
            return Err(AppError::NotImplemented(
                "Boolean schemas are not supported".into(),
            ))
        }
        other => {
            return Err(AppError::Unexpected(format!(
                "Schema must be a mapping, found: {}",
                other
            )))
        }
    };

    if let Some(pointer) = ref_of(value)? {
        return Ok(SchemaKind::Pointer(pointer));
    }

    let declared = declared_type(map)?;

    if let Some(values) = map.get("enum") {
        let values = values.as_array().ok_or_else(|| {
            AppError::Unexpected(format!("'enum' must be a list, found: {}", values))
        })?;
        return Ok(SchemaKind::Enum {
            values,
            base: declared,
        });
    }

    for (key, combinator) in Combinator::KEYS {
        let Some(branches) = map.get(key) else {
            continue;
        };
        let branches = match (combinator, branches) {
            (Combinator::Not, node) => slice::from_ref(node),
            (_, JsonValue::Array(items)) => items.as_slice(),
            (_, other) => {
                return Err(AppError::Unexpected(format!(
                    "'{}' must be a list, found: {}",
                    key, other
                )))
            }
        };
        return Ok(SchemaKind::Composition {
            combinator,
            branches,
        });
    }

    match declared {
        Some(Type::Array) => {
            return Ok(SchemaKind::Array {
                items: map.get("items"),
            })
        }
        Some(Type::Object) => return Ok(SchemaKind::Object(map)),
        None if map.contains_key("items") => {
            return Ok(SchemaKind::Array {
                items: map.get("items"),
            })
        }
        None if map.contains_key("properties") || map.contains_key("additionalProperties") => {
            return Ok(SchemaKind::Object(map))
        }
        _ => {}
    }

    Ok(SchemaKind::Primitive(declared))
}

/// Reads `type`, accepting the 3.1 list form when it names a single non-null type.
fn declared_type(map: &Map<String, JsonValue>) -> AppResult<Option<Type>> {
    let Some(raw) = map.get("type") else {
        return Ok(None);
    };

    match raw {
        JsonValue::Array(entries) => {
            let mut types = Vec::new();
            for entry in entries {
                let ty = parse_type(entry)?;
                if ty != Type::Null {
                    types.push(ty);
                }
            }
            match types.len() {
                0 => Ok(Some(Type::Null)),
                1 => Ok(types.pop()),
                _ => Err(AppError::NotImplemented(format!(
                    "Schemas with multiple types are not supported: {}",
                    raw
                ))),
            }
        }
        single => parse_type(single).map(Some),
    }
}

fn parse_type(raw: &JsonValue) -> AppResult<Type> {
    Type::deserialize(raw)
        .map_err(|_| AppError::NotImplemented(format!("Unsupported schema type: {}", raw)))
}
