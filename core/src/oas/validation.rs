#![deny(missing_docs)]

//! # OpenAPI Validation
//!
//! Small stateless checks applied while walking path and operation entries.
//! Each returns the typed value it validated, or the one error kind it owns.

use crate::error::{AppError, AppResult};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;
use utoipa::openapi::path::{HttpMethod, ParameterIn};

const STATUS_CODE_PATTERN: &str = r"^(default|[1-5][Xx]{2}|[1-5][0-9]{2})$";

fn status_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STATUS_CODE_PATTERN).expect("Invalid regex constant"))
}

/// Validates an operation key under a path item.
///
/// Keys are the lowercase OpenAPI verbs (`get`, `put`, `post`, `delete`,
/// `options`, `head`, `patch`, `trace`).
pub fn validate_http_method(path: &str, method: &str) -> AppResult<HttpMethod> {
    serde_json::from_value(JsonValue::from(method)).map_err(|_| AppError::InvalidHttpMethod {
        method: method.to_string(),
        path: path.to_string(),
    })
}

/// Validates a response key: `default`, a `1XX`-`5XX` range, or a code in 100-599.
pub fn validate_status_code(method: &str, path: &str, status_code: &str) -> AppResult<()> {
    if status_code_regex().is_match(status_code) {
        Ok(())
    } else {
        Err(AppError::InvalidStatusCode {
            method: method.to_string(),
            path: path.to_string(),
            status_code: status_code.to_string(),
        })
    }
}

/// Validates a concrete (already dereferenced) parameter object and returns its location.
pub fn validate_parameter(method: &str, path: &str, parameter: &JsonValue) -> AppResult<ParameterIn> {
    let name = parameter
        .get("name")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();
    let raw_location = parameter
        .get("in")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();

    let location: ParameterIn = serde_json::from_value(JsonValue::from(raw_location)).map_err(|_| {
        AppError::NotImplemented(format!(
            "Parameter '{}' at path {} {} uses unsupported location '{}'",
            name, method, path, raw_location
        ))
    })?;

    if parameter.get("schema").is_some() {
        return Ok(location);
    }

    if parameter.get("content").is_some() {
        return Err(AppError::NotImplemented(format!(
            "Parameter '{}' at path {} {} uses 'content' serialization, which is not supported",
            name, method, path
        )));
    }

    Err(AppError::MissingSchemaInParameter {
        method: method.to_string(),
        path: path.to_string(),
        param_type: raw_location.to_string(),
        name: name.to_string(),
    })
}
