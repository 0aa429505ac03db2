#![deny(missing_docs)]

//! # Export Planning
//!
//! Decides which `components.schemas` entries become standalone declarations and
//! under which identifier.
//!
//! - Concrete object / array / enum / composition bodies are exported under their
//!   sanitized component name, suffixed on collision.
//! - Pure aliases (`$ref` to another component) collapse onto the export of the
//!   component at the end of the alias chain.
//! - Primitive bodies are inlined at each use site and get no export.

use crate::error::{AppError, AppResult};
use crate::oas::document::Document;
use crate::oas::naming::{format_to_identifier_string, NameAllocator};
use crate::oas::pointer::{ref_of, Pointer};
use crate::oas::resolver::{RefResolver, ResolutionPath};
use crate::oas::schemas::kind::{classify, SchemaKind};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Keys whose values are instance data rather than schemas.
const PAYLOAD_KEYS: [&str; 5] = ["example", "examples", "default", "enum", "const"];

/// Export decision for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSchema<'doc> {
    /// Identifier of the generated declaration.
    pub export_name: String,
    /// Canonical component when this entry is an alias.
    pub alias_of: Option<String>,
    /// Concrete schema emitted for the declaration.
    pub schema: &'doc JsonValue,
}

impl ExportedSchema<'_> {
    /// True if this component reuses another component's declaration.
    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }
}

/// Serializable row of an export plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    /// Component name as written in the document.
    pub component: String,
    /// Identifier referenced at use sites.
    pub export_name: String,
    /// Canonical component, for aliases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

/// Component name -> export decision, in component order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedComponentSchemas<'doc> {
    entries: IndexMap<String, ExportedSchema<'doc>>,
}

impl<'doc> ExportedComponentSchemas<'doc> {
    /// Export decision for a component, if it is exported or aliased.
    pub fn get(&self, component: &str) -> Option<&ExportedSchema<'doc>> {
        self.entries.get(component)
    }

    /// Identifier to reference for a component.
    pub fn export_name(&self, component: &str) -> Option<&str> {
        self.get(component).map(|e| e.export_name.as_str())
    }

    /// Identifier to reference for a `#/components/schemas/{name}` pointer.
    pub fn export_name_for_ref(&self, pointer: &str) -> Option<&str> {
        let parsed = Pointer::parse(pointer).ok()?;
        self.export_name(parsed.component_schema_name()?)
    }

    /// True if the component has an entry.
    pub fn contains(&self, component: &str) -> bool {
        self.entries.contains_key(component)
    }

    /// All entries, aliases included, in component order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportedSchema<'doc>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that own a declaration (no aliases), in component order.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &ExportedSchema<'doc>)> {
        self.iter().filter(|(_, e)| !e.is_alias())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no component is exported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The plan as serializable rows.
    pub fn entries(&self) -> Vec<PlanEntry> {
        self.iter()
            .map(|(component, e)| PlanEntry {
                component: component.to_string(),
                export_name: e.export_name.clone(),
                alias_of: e.alias_of.clone(),
            })
            .collect()
    }
}

enum Decision<'doc> {
    Export(&'doc JsonValue),
    Alias(&'doc str),
    Inline(&'static str),
}

/// Walks `components.schemas` and builds the export plan.
///
/// Fails on the first unresolvable, malformed or circular pointer; a broken
/// document never yields a partial plan.
pub fn process_object_schemas<'doc>(
    document: &'doc Document,
    resolver: &mut RefResolver<'doc>,
) -> AppResult<ExportedComponentSchemas<'doc>> {
    let Some(schemas) = document.component_schemas() else {
        if document
            .raw()
            .get("components")
            .and_then(|c| c.get("schemas"))
            .is_some()
        {
            return Err(AppError::Unexpected(
                "'components.schemas' must be a mapping".into(),
            ));
        }
        return Ok(ExportedComponentSchemas::default());
    };

    let mut decisions = Vec::with_capacity(schemas.len());
    for (name, body) in schemas {
        let decision = plan_component(document, resolver, name, body)?;
        decisions.push((name.as_str(), decision));
    }

    let mut names = NameAllocator::new();
    let mut exported: HashMap<&str, ExportedSchema<'doc>> = HashMap::new();
    for (name, decision) in &decisions {
        let Decision::Export(schema) = decision else {
            continue;
        };
        let candidate = format_to_identifier_string(name);
        let export_name = names.allocate(&candidate);
        if export_name != candidate {
            tracing::debug!(component = *name, %candidate, %export_name, "export name collision");
        } else {
            tracing::debug!(component = *name, %export_name, "assigned export name");
        }
        exported.insert(
            *name,
            ExportedSchema {
                export_name,
                alias_of: None,
                schema: *schema,
            },
        );
    }

    let mut entries = IndexMap::with_capacity(decisions.len());
    for (name, decision) in decisions {
        let entry = match decision {
            Decision::Export(_) => exported.get(name).cloned(),
            Decision::Alias(canonical) => exported.get(canonical).map(|target| {
                tracing::debug!(component = name, canonical, "collapsed alias");
                ExportedSchema {
                    export_name: target.export_name.clone(),
                    alias_of: Some(canonical.to_string()),
                    schema: target.schema,
                }
            }),
            Decision::Inline(kind) => {
                tracing::trace!(component = name, kind, "inlined");
                None
            }
        };
        if let Some(entry) = entry {
            entries.insert(name.to_string(), entry);
        }
    }

    Ok(ExportedComponentSchemas { entries })
}

fn plan_component<'doc>(
    document: &'doc Document,
    resolver: &mut RefResolver<'doc>,
    name: &'doc str,
    body: &'doc JsonValue,
) -> AppResult<Decision<'doc>> {
    let kind = classify(body)?;
    if !matches!(kind, SchemaKind::Pointer(_)) {
        return plan_concrete(resolver, kind, body);
    }

    let own = Pointer::component("schemas", name);
    let target = resolver.resolve_pointer_cached(&own, &ResolutionPath::new())?;

    let canonical = canonical_component(document, name, body)?;
    if canonical != name {
        return Ok(Decision::Alias(canonical));
    }

    // The first hop already leaves the top level of `components.schemas`, so this
    // component owns the declaration of whatever it points at.
    plan_concrete(resolver, classify(target)?, target)
}

fn plan_concrete<'doc>(
    resolver: &mut RefResolver<'doc>,
    kind: SchemaKind<'doc>,
    schema: &'doc JsonValue,
) -> AppResult<Decision<'doc>> {
    if !kind.is_exportable() {
        return Ok(Decision::Inline(kind.label()));
    }
    resolve_nested(resolver, schema, false)?;
    Ok(Decision::Export(schema))
}

/// Follows whole-component aliases to the last component on the chain.
///
/// Only called after the chain resolved without a cycle.
fn canonical_component<'doc>(
    document: &'doc Document,
    start: &'doc str,
    body: &'doc JsonValue,
) -> AppResult<&'doc str> {
    let limit = document.component_schemas().map_or(0, |s| s.len());
    let mut current = start;
    let mut node = body;

    for _ in 0..=limit {
        let Some(pointer) = ref_of(node)? else {
            return Ok(current);
        };
        let parsed = Pointer::parse(pointer)?;
        let Some(target) = parsed.component_schema_name() else {
            return Ok(current);
        };
        let (key, next) = document
            .component_schema(target)
            .ok_or_else(|| AppError::resolve_ref(pointer))?;
        current = key.as_str();
        node = next;
    }

    Err(AppError::Unexpected(format!(
        "Alias chain starting at '{}' did not terminate",
        start
    )))
}

/// Resolves every nested pointer of an exported schema so broken references fail
/// the run and land in the cache.
fn resolve_nested<'doc>(
    resolver: &mut RefResolver<'doc>,
    node: &'doc JsonValue,
    keyed_by_name: bool,
) -> AppResult<()> {
    match node {
        JsonValue::Object(map) => {
            if !keyed_by_name && ref_of(node)?.is_some() {
                resolver.resolve_object_cached(node, &ResolutionPath::new())?;
                return Ok(());
            }
            for (key, value) in map {
                if !keyed_by_name
                    && (PAYLOAD_KEYS.contains(&key.as_str()) || key.starts_with("x-"))
                {
                    continue;
                }
                let names_follow = !keyed_by_name
                    && matches!(
                        key.as_str(),
                        "properties" | "patternProperties" | "$defs" | "definitions" | "dependentSchemas"
                    );
                resolve_nested(resolver, value, names_follow)?;
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                resolve_nested(resolver, item, false)?;
            }
        }
        _ => {}
    }
    Ok(())
}
