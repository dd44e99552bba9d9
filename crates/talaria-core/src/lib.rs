//! # Talaria Core
//!
//! Shared vocabulary for the Talaria request binding layer: the closed set
//! of parameter kinds with their capability table, registration-time
//! definition errors, and the request-time validation issue type together
//! with the 422 error-list body shape.
//!
//! Higher layers build on these types: `talaria-extract` implements one
//! payload extractor per kind, `talaria-binding` groups declared
//! parameters into validation units and drives them per request.

#![forbid(unsafe_code)]

mod error;
mod issue;
mod kind;

pub use error::{DefinitionError, DefinitionResult};
pub use issue::{issues_body, ValidationIssue, ISSUE_MISSING, ISSUE_VALIDATION};
pub use kind::{BodyKind, KindSlot, ParamKind, DEFAULT_MAX_BODY_SIZE};
