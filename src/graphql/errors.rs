use async_graphql::{Error, ErrorExtensions};
use tracing::error;

use crate::errors::{CoreError, CoreErrorKind};

/// Structured error builder for consistent error handling
pub struct StructuredError;

impl StructuredError {
    /// Create a "validation failed" error
    pub fn validation(field: &str, message: impl Into<String>) -> Error {
        Error::new(format!(
            "Validation failed for '{}': {}",
            field,
            message.into()
        ))
        .extend_with(|_, e| {
            e.set("code", "VALIDATION_FAILED");
            e.set("field", field);
        })
    }

    /// Create a "bad request" error
    pub fn bad_request(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "BAD_REQUEST");
        })
    }

    /// Converts a service error, copying its structured fields into extensions.
    pub fn from_core_error(err: CoreError) -> Error {
        let code = error_code(err.kind());
        if err.kind() == CoreErrorKind::Internal {
            error!("Internal error: {}", err);
        }

        let fields = err.fields().cloned().unwrap_or_default();
        Error::new(err.message().to_string()).extend_with(|_, e| {
            e.set("code", code);
            for (key, value) in &fields {
                e.set(key.as_str(), value.as_str());
            }
        })
    }
}

pub fn error_code(kind: CoreErrorKind) -> &'static str {
    match kind {
        CoreErrorKind::NotFound => "NOT_FOUND",
        CoreErrorKind::Validation => "VALIDATION_FAILED",
        CoreErrorKind::Conflict => "CONFLICT",
        CoreErrorKind::Forbidden => "FORBIDDEN",
        CoreErrorKind::Unauthorized => "UNAUTHORIZED",
        CoreErrorKind::BadRequest => "BAD_REQUEST",
        CoreErrorKind::Unavailable => "SERVICE_ERROR",
        CoreErrorKind::Internal => "INTERNAL_ERROR",
    }
}

pub fn core_error_to_graphql_error(err: CoreError) -> Error {
    StructuredError::from_core_error(err)
}
