#![deny(missing_docs)]

//! # Document Loader
//!
//! Reads an OpenAPI document from disk. `.json` files go through `serde_json`;
//! everything else is parsed as YAML.

use crate::error::{CliError, CliResult};
use oaslink_core::Document;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

/// Loads and wraps the document at `path`.
pub fn load_document(path: &Path) -> CliResult<Document> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parse_error = |message: String| CliError::Parse {
        path: path.display().to_string(),
        message,
    };

    let raw: JsonValue = if is_json {
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    };

    tracing::debug!(path = %path.display(), "loaded document");
    Ok(Document::from_value(raw)?)
}
