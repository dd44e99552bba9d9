//! Registration-time definition errors.
//!
//! Every variant of [`DefinitionError`] is raised while a handler binding
//! is being built, before any request is served. They are always fatal:
//! a handler with a definition error must never become reachable, so the
//! embedding application should propagate them out of startup.
//!
//! Each variant names the offending handler, and the attribute where one
//! applies, so that the failure can be located without a debugger.

use thiserror::Error;

/// Result type alias for registration-time operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// An error in how a handler declares its parameters.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// A default value was supplied for a kind that can never default.
    #[error("handler `{handler}`, attribute `{param}`: a `{marker}` parameter cannot have a default value")]
    CannotUseDefault {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// A default factory was supplied for a kind that can never default.
    #[error("handler `{handler}`, attribute `{param}`: a `{marker}` parameter cannot have a default_factory")]
    CannotUseDefaultFactory {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// Both a default value and a default factory were supplied.
    #[error("handler `{handler}`, attribute `{param}`: cannot specify both default and default_factory in `{marker}`")]
    SpecifyBothDefaultAndDefaultFactory {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// An optional annotation was combined with a non-null default.
    ///
    /// Optional already means "absent is acceptable"; an explicit non-null
    /// default on top of it is flagged as a likely programming error.
    #[error("handler `{handler}`, attribute `{param}`: a parameter cannot be optional if it contains a default value in `{marker}`")]
    SpecifyBothDefaultAndOptional {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// An optional annotation was combined with a default factory.
    #[error("handler `{handler}`, attribute `{param}`: a parameter cannot be optional if it contains a default_factory in `{marker}`")]
    SpecifyBothDefaultFactoryAndOptional {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// An optional annotation was used with a kind that must always be
    /// present (path segments, stream body).
    #[error("handler `{handler}`, attribute `{param}`: a `{marker}` parameter cannot be optional")]
    ParameterCannotBeOptional {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// A default was given both at the parameter level and inside the
    /// marker.
    #[error("handler `{handler}`, attribute `{param}`: default value set twice in `{marker}`; use either the parameter-level default or the marker default, not both")]
    IncorrectDefaultDefinition {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// `validate(true)` was requested for a raw-only kind.
    #[error("handler `{handler}`, attribute `{param}`: a `{marker}` parameter cannot have `validate` set to true")]
    ValidateNotSupported {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// `extract_all(false)` was requested for a raw-only kind, which has
    /// no addressable named sub-fields.
    #[error("handler `{handler}`, attribute `{param}`: a `{marker}` parameter cannot have `extract_all` set to false")]
    ExtractAllRequired {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Marker type name.
        marker: &'static str,
    },

    /// `extract_all` was used with a scalar annotation; whole-payload
    /// extraction needs a structured schema type.
    #[error("handler `{handler}`, attribute `{param}`: extract_all requires a structured schema type, but `{type_name}` is a scalar")]
    ScalarSchema {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
        /// Declared type name.
        type_name: &'static str,
    },

    /// Two parameters resolve to the same wire name within one kind.
    #[error("handler `{handler}`, attribute `{param}`: attribute is already defined")]
    AttributeAlreadyDefined {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
    },

    /// A whole-payload parameter and individual-field parameters were
    /// mixed within one kind.
    #[error(
        "handler `{handler}`, attribute `{param}`: parameter definition styles conflict; \
         within one kind use either multiple individual parameters, or exactly one \
         extract_all parameter, never both"
    )]
    IncompatibleExtractionStyles {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
    },

    /// Two different body sub-formats were declared on one handler.
    #[error("handler `{handler}`, attribute `{param}`: handler cannot retrieve the body in more than one way")]
    BodyExtractionConflict {
        /// Handler being registered.
        handler: String,
        /// Offending attribute name.
        param: String,
    },

    /// The request-object parameter was claimed twice.
    #[error("handler `{handler}`: request parameter defined twice (`{first}`, then `{param}`)")]
    RequestParamAlreadyDefined {
        /// Handler being registered.
        handler: String,
        /// First claim.
        first: String,
        /// Second, rejected claim.
        param: String,
    },
}

impl DefinitionError {
    /// The handler the error was raised for.
    #[must_use]
    pub fn handler(&self) -> &str {
        match self {
            Self::CannotUseDefault { handler, .. }
            | Self::CannotUseDefaultFactory { handler, .. }
            | Self::SpecifyBothDefaultAndDefaultFactory { handler, .. }
            | Self::SpecifyBothDefaultAndOptional { handler, .. }
            | Self::SpecifyBothDefaultFactoryAndOptional { handler, .. }
            | Self::ParameterCannotBeOptional { handler, .. }
            | Self::IncorrectDefaultDefinition { handler, .. }
            | Self::ValidateNotSupported { handler, .. }
            | Self::ExtractAllRequired { handler, .. }
            | Self::ScalarSchema { handler, .. }
            | Self::AttributeAlreadyDefined { handler, .. }
            | Self::IncompatibleExtractionStyles { handler, .. }
            | Self::BodyExtractionConflict { handler, .. }
            | Self::RequestParamAlreadyDefined { handler, .. } => handler,
        }
    }
}
