//! # Error Handling
//!
//! Provides the unified `AppError` enum returned by every resolver, planner and
//! validator entry point. Each variant maps to one stable [`ErrorCode`] and renders
//! a human-readable detail string through `Display`.

use derive_more::Display;
use std::fmt;

/// Machine-checkable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A pointer is already being resolved further up the call chain.
    CircularRefDependencyError,
    /// An operation key is not a recognized HTTP verb.
    InvalidHttpMethodError,
    /// A pointer string does not have the supported shape.
    InvalidRefError,
    /// A response key is not a valid status-code token.
    InvalidStatusCodeError,
    /// A parameter entry carries no schema.
    MissingSchemaInParameterError,
    /// A recognized construct that is intentionally unsupported.
    NotImplementedError,
    /// A well-formed pointer with no matching location in the document.
    ResolveRefError,
    /// An invariant violation.
    UnexpectedError,
}

impl ErrorCode {
    /// Returns the code as it appears in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CircularRefDependencyError => "CircularRefDependencyError",
            ErrorCode::InvalidHttpMethodError => "InvalidHttpMethodError",
            ErrorCode::InvalidRefError => "InvalidRefError",
            ErrorCode::InvalidStatusCodeError => "InvalidStatusCodeError",
            ErrorCode::MissingSchemaInParameterError => "MissingSchemaInParameterError",
            ErrorCode::NotImplementedError => "NotImplementedError",
            ErrorCode::ResolveRefError => "ResolveRefError",
            ErrorCode::UnexpectedError => "UnexpectedError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The Global Error Enum.
///
/// We use `derive_more` for the `Display` boilerplate; the rendered string is the
/// error detail.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AppError {
    /// Pointer string does not match `#/components/<section>/<name>`.
    #[display("Invalid reference found: {reference}")]
    InvalidRef {
        /// The offending pointer, verbatim.
        reference: String,
    },

    /// Well-formed pointer that names no location in the document.
    #[display("Could not resolve reference: {reference}")]
    ResolveRef {
        /// The pointer that failed to resolve.
        reference: String,
    },

    /// A pointer chain loops back on itself.
    #[display("Circular reference detected: {}", chain.join(" -> "))]
    CircularRefDependency {
        /// Ordered pointers forming the cycle; the last entry repeats an earlier one.
        chain: Vec<String>,
    },

    /// Operation key under a path item that is not an HTTP verb.
    #[display("Invalid HTTP method at path {path}: {method}")]
    InvalidHttpMethod {
        /// The rejected key.
        method: String,
        /// The path template owning the key.
        path: String,
    },

    /// Response key that is not a status-code token.
    #[display("Invalid status code at path {method} {path}: {status_code}")]
    InvalidStatusCode {
        /// Operation method.
        method: String,
        /// Path template.
        path: String,
        /// The rejected key.
        status_code: String,
    },

    /// Parameter without a `schema` field.
    #[display("Missing schema in parameter {param_type} '{name}' at path {method} {path}")]
    MissingSchemaInParameter {
        /// Operation method (or `*` for path-level parameters).
        method: String,
        /// Path template.
        path: String,
        /// Parameter location (`path`, `query`, `header`, `cookie`).
        param_type: String,
        /// Parameter name.
        name: String,
    },

    /// Construct recognized but deliberately unsupported.
    #[display("{_0}")]
    NotImplemented(String),

    /// Catch-all for invariant violations.
    #[display("{_0}")]
    Unexpected(String),
}

impl AppError {
    /// Returns the stable code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidRef { .. } => ErrorCode::InvalidRefError,
            AppError::ResolveRef { .. } => ErrorCode::ResolveRefError,
            AppError::CircularRefDependency { .. } => ErrorCode::CircularRefDependencyError,
            AppError::InvalidHttpMethod { .. } => ErrorCode::InvalidHttpMethodError,
            AppError::InvalidStatusCode { .. } => ErrorCode::InvalidStatusCodeError,
            AppError::MissingSchemaInParameter { .. } => ErrorCode::MissingSchemaInParameterError,
            AppError::NotImplemented(_) => ErrorCode::NotImplementedError,
            AppError::Unexpected(_) => ErrorCode::UnexpectedError,
        }
    }

    /// Returns the human-readable detail.
    pub fn detail(&self) -> String {
        self.to_string()
    }

    pub(crate) fn invalid_ref(reference: impl Into<String>) -> Self {
        AppError::InvalidRef {
            reference: reference.into(),
        }
    }

    pub(crate) fn resolve_ref(reference: impl Into<String>) -> Self {
        AppError::ResolveRef {
            reference: reference.into(),
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_detail_joins_chain() {
        let err = AppError::CircularRefDependency {
            chain: vec![
                "#/components/schemas/A".into(),
                "#/components/schemas/B".into(),
                "#/components/schemas/A".into(),
            ],
        };
        assert_eq!(err.code(), ErrorCode::CircularRefDependencyError);
        assert_eq!(
            err.detail(),
            "Circular reference detected: #/components/schemas/A -> #/components/schemas/B -> #/components/schemas/A"
        );
    }

    #[test]
    fn test_status_code_detail() {
        let err = AppError::InvalidStatusCode {
            method: "get".into(),
            path: "/users".into(),
            status_code: "999".into(),
        };
        assert_eq!(err.code().as_str(), "InvalidStatusCodeError");
        assert_eq!(err.detail(), "Invalid status code at path get /users: 999");
    }

    #[test]
    fn test_free_text_variants() {
        let err = AppError::NotImplemented("boolean schemas".into());
        assert_eq!(err.to_string(), "boolean schemas");
        assert_eq!(err.code(), ErrorCode::NotImplementedError);
        assert_eq!(
            AppError::Unexpected("boom".into()).code().to_string(),
            "UnexpectedError"
        );
    }

    #[test]
    fn test_missing_schema_detail() {
        let err = AppError::MissingSchemaInParameter {
            method: "get".into(),
            path: "/users/{id}".into(),
            param_type: "path".into(),
            name: "id".into(),
        };
        assert_eq!(
            err.detail(),
            "Missing schema in parameter path 'id' at path get /users/{id}"
        );
    }
}
