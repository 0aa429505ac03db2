#![deny(missing_docs)]

//! # Operations
//!
//! Walks `paths` into validated operation views for code generation.
//!
//! Path-level parameters are merged into every operation; operation-level
//! parameters win on the same `(name, in)` pair. Parameter, response and path item
//! pointers are dereferenced through the frozen resolver.

use crate::error::{AppError, AppResult};
use crate::oas::document::Document;
use crate::oas::resolver::{RefResolver, ResolutionPath};
use crate::oas::validation::{validate_http_method, validate_parameter, validate_status_code};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use utoipa::openapi::path::{HttpMethod, ParameterIn};

/// Path item keys that are not operations.
const PATH_ITEM_FIELDS: [&str; 5] = ["$ref", "summary", "description", "servers", "parameters"];

/// Method label reported for path-level parameter errors.
const PATH_LEVEL_METHOD: &str = "*";

/// A validated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry<'doc> {
    /// Parameter name.
    pub name: &'doc str,
    /// Parameter location.
    pub location: ParameterIn,
    /// `required` flag; always true for path parameters.
    pub required: bool,
    /// The parameter's schema, pointers left in place.
    pub schema: &'doc JsonValue,
}

/// A validated response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEntry<'doc> {
    /// Status code token (`200`, `4XX`, `default`).
    pub status_code: &'doc str,
    /// Dereferenced response object.
    pub response: &'doc JsonValue,
}

/// A validated operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationEntry<'doc> {
    /// Path template.
    pub path: &'doc str,
    /// HTTP method.
    pub method: HttpMethod,
    /// `operationId`, when declared.
    pub operation_id: Option<&'doc str>,
    /// Merged parameters, operation-level first.
    pub parameters: Vec<ParameterEntry<'doc>>,
    /// Responses in document order.
    pub responses: Vec<ResponseEntry<'doc>>,
}

/// Collects and validates every operation under `paths`, in document order.
pub fn collect_operations<'doc>(
    document: &'doc Document,
    resolver: &RefResolver<'doc>,
) -> AppResult<Vec<OperationEntry<'doc>>> {
    let mut operations = Vec::new();
    let Some(paths) = document.paths() else {
        return Ok(operations);
    };

    for (path, item) in paths {
        let item = as_mapping(resolver.resolve_object(item, &ResolutionPath::new())?, path)?;
        let common = item
            .get("parameters")
            .map(|p| as_list(p, path))
            .transpose()?
            .unwrap_or_default();

        // Path-level parameters are validated once, even without operations.
        for raw in common {
            let param = resolver.resolve_object(raw, &ResolutionPath::new())?;
            validate_parameter(PATH_LEVEL_METHOD, path, param)?;
        }

        for (key, operation) in item {
            if PATH_ITEM_FIELDS.contains(&key.as_str()) || key.starts_with("x-") {
                continue;
            }
            let method = validate_http_method(path, key)?;
            let operation = as_mapping(operation, path)?;
            operations.push(build_operation(
                resolver, path, key, method, operation, common,
            )?);
        }
    }

    Ok(operations)
}

fn build_operation<'doc>(
    resolver: &RefResolver<'doc>,
    path: &'doc str,
    method_key: &str,
    method: HttpMethod,
    operation: &'doc Map<String, JsonValue>,
    common: &'doc [JsonValue],
) -> AppResult<OperationEntry<'doc>> {
    let own = operation
        .get("parameters")
        .map(|p| as_list(p, path))
        .transpose()?
        .unwrap_or_default();

    let mut parameters = Vec::new();
    let mut seen = HashSet::new();

    // Priority to operation params
    for raw in own.iter().chain(common) {
        let param = resolver.resolve_object(raw, &ResolutionPath::new())?;
        let location = validate_parameter(method_key, path, param)?;
        let name = param
            .get("name")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        if !seen.insert((name, location_label(&location))) {
            continue;
        }
        let required = matches!(location, ParameterIn::Path)
            || param
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false);
        // validate_parameter guarantees the schema is present.
        let schema = param.get("schema").ok_or_else(|| {
            AppError::Unexpected(format!("Parameter '{}' lost its schema", name))
        })?;
        parameters.push(ParameterEntry {
            name,
            location,
            required,
            schema,
        });
    }

    let mut responses = Vec::new();
    if let Some(raw) = operation.get("responses") {
        for (status_code, response) in as_mapping(raw, path)? {
            if status_code.starts_with("x-") {
                continue;
            }
            validate_status_code(method_key, path, status_code)?;
            responses.push(ResponseEntry {
                status_code,
                response: resolver.resolve_object(response, &ResolutionPath::new())?,
            });
        }
    }

    Ok(OperationEntry {
        path,
        method,
        operation_id: operation.get("operationId").and_then(JsonValue::as_str),
        parameters,
        responses,
    })
}

fn location_label(location: &ParameterIn) -> &'static str {
    match location {
        ParameterIn::Path => "path",
        ParameterIn::Query => "query",
        ParameterIn::Header => "header",
        ParameterIn::Cookie => "cookie",
    }
}

fn as_mapping<'doc>(value: &'doc JsonValue, path: &str) -> AppResult<&'doc Map<String, JsonValue>> {
    value.as_object().ok_or_else(|| {
        AppError::Unexpected(format!("Expected a mapping under path {}, found: {}", path, value))
    })
}

fn as_list<'doc>(value: &'doc JsonValue, path: &str) -> AppResult<&'doc [JsonValue]> {
    value.as_array().map(Vec::as_slice).ok_or_else(|| {
        AppError::Unexpected(format!("Expected a list under path {}, found: {}", path, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Document {
        Document::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    fn operations(document: &Document) -> AppResult<Vec<OperationEntry<'_>>> {
        collect_operations(document, &RefResolver::new(document))
    }

    #[test]
    fn test_collects_operations_with_merged_params() {
        let document = doc(r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths:
  /pets/{id}:
    summary: Pet by id
    parameters:
      - name: id
        in: path
        schema: {type: string}
      - $ref: '#/components/parameters/Trace'
    get:
      operationId: getPet
      parameters:
        - name: X-Trace
          in: header
          required: true
          schema: {type: string, format: uuid}
      responses:
        '200': {$ref: '#/components/responses/PetOk'}
        default: {description: Error}
        x-internal: true
    delete:
      responses:
        '204': {description: Gone}
    x-owner: pets-team
components:
  parameters:
    Trace:
      name: X-Trace
      in: header
      schema: {type: string}
  responses:
    PetOk:
      description: OK
"#);
        let ops = operations(&document).unwrap();
        assert_eq!(ops.len(), 2);

        let get = &ops[0];
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.operation_id, Some("getPet"));
        assert_eq!(get.parameters.len(), 2);
        assert_eq!(get.parameters[0].name, "X-Trace");
        assert!(get.parameters[0].required);
        assert_eq!(get.parameters[0].schema["format"], "uuid");
        assert_eq!(get.parameters[1].name, "id");
        assert!(get.parameters[1].required);

        let codes: Vec<_> = get.responses.iter().map(|r| r.status_code).collect();
        assert_eq!(codes, vec!["200", "default"]);
        assert_eq!(get.responses[0].response["description"], "OK");

        let delete = &ops[1];
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.parameters.len(), 2);
        assert_eq!(delete.parameters[1].location, ParameterIn::Header);
    }

    #[test]
    fn test_invalid_method_key() {
        let document = doc(r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths:
  /pets:
    FETCH:
      responses: {'200': {description: OK}}
"#);
        assert_eq!(
            operations(&document).unwrap_err(),
            AppError::InvalidHttpMethod {
                method: "FETCH".into(),
                path: "/pets".into()
            }
        );
    }

    #[test]
    fn test_invalid_status_code() {
        let document = doc(r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths:
  /pets:
    get:
      responses: {'999': {description: Nope}}
"#);
        assert!(matches!(
            operations(&document).unwrap_err(),
            AppError::InvalidStatusCode { ref status_code, .. } if status_code == "999"
        ));
    }

    #[test]
    fn test_path_parameter_without_schema() {
        let document = doc(r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths:
  /pets/{id}:
    get:
      parameters:
        - {name: id, in: path, required: true}
      responses: {'200': {description: OK}}
"#);
        assert_eq!(
            operations(&document).unwrap_err(),
            AppError::MissingSchemaInParameter {
                method: "get".into(),
                path: "/pets/{id}".into(),
                param_type: "path".into(),
                name: "id".into(),
            }
        );
    }

    #[test]
    fn test_path_level_parameter_without_schema() {
        let document = doc(r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths:
  /pets/{id}:
    parameters:
      - {name: id, in: path, required: true}
"#);
        let err = operations(&document).unwrap_err();
        assert_eq!(
            err,
            AppError::MissingSchemaInParameter {
                method: "*".into(),
                path: "/pets/{id}".into(),
                param_type: "path".into(),
                name: "id".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Missing schema in parameter path 'id' at path * /pets/{id}"
        );
    }

    #[test]
    fn test_path_item_ref_and_missing_response_ref() {
        let document = doc(r#"
openapi: 3.0.3
info: {title: T, version: "1"}
paths:
  /shared:
    $ref: '#/components/pathItems/Shared'
components:
  pathItems:
    Shared:
      get:
        responses:
          '200': {$ref: '#/components/responses/Missing'}
"#);
        assert_eq!(
            operations(&document).unwrap_err(),
            AppError::ResolveRef {
                reference: "#/components/responses/Missing".into()
            }
        );
    }

    #[test]
    fn test_no_paths() {
        let document = doc("openapi: 3.0.0\ninfo: {title: T, version: '1'}\n");
        assert!(operations(&document).unwrap().is_empty());
    }
}
