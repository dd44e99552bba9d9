//! Request validation entry point.
//!
//! [`RequestValidator`] runs a handler binding against one request and
//! shapes any failure into the unprocessable-entity response: status
//! 422 with the issue list under a configurable field name.

use crate::binding::HandlerBinding;
use crate::values::BoundValues;
use http::StatusCode;
use serde_json::Value;
use talaria_core::{issues_body, ValidationIssue};
use talaria_extract::RequestParts;

/// Default name of the response field carrying the issue list.
pub const DEFAULT_ERRORS_FIELD: &str = "errors";

/// A request rejected by parameter validation.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    issues: Vec<ValidationIssue>,
    errors_field: String,
}

impl ValidationFailure {
    /// The response status: 422 Unprocessable Entity.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    /// The individual issues, in declaration order of the parameters.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Renders the JSON response body.
    #[must_use]
    pub fn to_body(&self) -> Value {
        issues_body(&self.errors_field, &self.issues)
    }
}

/// Validates requests and shapes failures for the wire.
///
/// # Example
///
/// ```rust
/// use talaria_binding::RequestValidator;
///
/// let validator = RequestValidator::new().errors_field("detail");
/// ```
#[derive(Debug, Clone)]
pub struct RequestValidator {
    errors_field: String,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Creates a validator using the default errors field name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            errors_field: DEFAULT_ERRORS_FIELD.to_string(),
        }
    }

    /// Overrides the response field carrying the issue list.
    #[must_use]
    pub fn errors_field(mut self, name: impl Into<String>) -> Self {
        self.errors_field = name.into();
        self
    }

    /// Runs a binding against one request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFailure`] carrying every issue when any
    /// parameter fails extraction or validation.
    pub async fn run(
        &self,
        binding: &HandlerBinding,
        parts: &RequestParts,
    ) -> Result<BoundValues, ValidationFailure> {
        binding
            .validate(parts)
            .await
            .map_err(|issues| ValidationFailure {
                issues,
                errors_field: self.errors_field.clone(),
            })
    }
}
