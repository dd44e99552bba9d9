//! Request-time validation issues and the error-list response body.
//!
//! A [`ValidationIssue`] is one entry of the error list returned to the
//! client. Its location path is fully qualified before it is merged into
//! the response: kind-level failures carry `[<kind>]`, per-field failures
//! `[<kind>, <alias>]`.

use crate::kind::KindSlot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Issue type tag for a required field that was absent.
pub const ISSUE_MISSING: &str = "missing";

/// Issue type tag for a value that failed typed validation.
pub const ISSUE_VALIDATION: &str = "validation_error";

/// One structured error reported to the client.
///
/// Wire shape: `{"loc": ["body", "age"], "msg": "...", "type": "..."}`.
///
/// # Example
///
/// ```
/// use talaria_core::{KindSlot, ValidationIssue};
///
/// let issue = ValidationIssue::missing(vec!["header".into(), "x-api-key".into()]);
/// assert_eq!(issue.loc, vec!["header", "x-api-key"]);
/// assert_eq!(issue.issue_type, "missing");
///
/// let issue = ValidationIssue::extraction(KindSlot::Body, "malformed JSON");
/// assert_eq!(issue.loc, vec!["body"]);
/// assert_eq!(issue.issue_type, "body_extraction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Fully qualified location of the failure.
    pub loc: Vec<String>,
    /// Human-readable message.
    pub msg: String,
    /// Machine-readable type tag.
    #[serde(rename = "type")]
    pub issue_type: String,
}

impl ValidationIssue {
    /// Creates an issue with an explicit type tag.
    #[must_use]
    pub fn new(
        loc: Vec<String>,
        msg: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Self {
        Self {
            loc,
            msg: msg.into(),
            issue_type: issue_type.into(),
        }
    }

    /// Issue for a required field that was not supplied.
    #[must_use]
    pub fn missing(loc: Vec<String>) -> Self {
        Self::new(loc, "Field required", ISSUE_MISSING)
    }

    /// Issue for a raw payload that could not be decoded at all.
    ///
    /// Reported at the kind-level location since no individual field could
    /// be assessed.
    #[must_use]
    pub fn extraction(slot: KindSlot, msg: impl Into<String>) -> Self {
        Self::new(
            vec![slot.location().to_string()],
            msg,
            format!("{}_extraction", slot.location()),
        )
    }

    /// Issue for a value that failed validation against its declared type.
    #[must_use]
    pub fn invalid(loc: Vec<String>, msg: impl Into<String>) -> Self {
        Self::new(loc, msg, ISSUE_VALIDATION)
    }
}

/// Builds the unprocessable-entity response body.
///
/// The error list lands under `errors_field`, which the embedding
/// application configures (default `"errors"`).
#[must_use]
pub fn issues_body(errors_field: &str, issues: &[ValidationIssue]) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(
        errors_field.to_string(),
        serde_json::to_value(issues).unwrap_or(Value::Null),
    );
    Value::Object(body)
}
