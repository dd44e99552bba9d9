//! Field descriptors.
//!
//! A [`FieldSpec`] is the fully resolved description of one handler
//! parameter: wire alias, extraction kind, requiredness, default, and
//! the annotation used to validate raw values. Construction enforces
//! every definition rule, so a descriptor that exists is a descriptor
//! that is legal.

use crate::annotation::{Annotation, Shape};
use crate::markers::{DefaultFactory, ParamMarker};
use serde_json::Value;
use std::fmt;
use talaria_core::{DefinitionError, DefinitionResult, ParamKind};

/// A validated handler parameter description.
#[derive(Clone)]
pub struct FieldSpec {
    name: String,
    alias: String,
    kind: ParamKind,
    extract_all: bool,
    validate: bool,
    required: bool,
    default: Option<Value>,
    default_factory: Option<DefaultFactory>,
    annotation: Annotation,
}

impl FieldSpec {
    /// Resolves a parameter declaration into a field descriptor.
    ///
    /// `param_default` is the default attached at the parameter level,
    /// as opposed to one set inside the marker; supplying both is a
    /// definition error.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the declaration combines
    /// options the parameter's kind does not support, or combines
    /// defaults, factories and optionality inconsistently.
    pub fn new(
        handler: &str,
        name: &str,
        annotation: Annotation,
        marker: &ParamMarker,
        param_default: Option<Value>,
    ) -> DefinitionResult<Self> {
        let kind = marker.kind();
        let opts = marker.opts();
        let err = |make: fn(String, String, &'static str) -> DefinitionError| {
            make(handler.to_string(), name.to_string(), kind.marker_name())
        };

        if kind.only_raw() {
            if opts.validate == Some(true) {
                return Err(err(|handler, param, marker| {
                    DefinitionError::ValidateNotSupported {
                        handler,
                        param,
                        marker,
                    }
                }));
            }
            if opts.extract_all == Some(false) {
                return Err(err(|handler, param, marker| {
                    DefinitionError::ExtractAllRequired {
                        handler,
                        param,
                        marker,
                    }
                }));
            }
        }

        let optional = annotation.is_optional();
        let has_default = param_default.is_some() || opts.default.is_some();
        // A null default is the same thing optionality already grants,
        // so only a non-null default conflicts with it.
        let has_nonnull_default = param_default
            .as_ref()
            .or(opts.default.as_ref())
            .is_some_and(|value| !value.is_null());
        let has_factory = opts.default_factory.is_some();

        if !kind.can_default() {
            if optional {
                return Err(err(|handler, param, marker| {
                    DefinitionError::ParameterCannotBeOptional {
                        handler,
                        param,
                        marker,
                    }
                }));
            }
            if has_default {
                return Err(err(|handler, param, marker| {
                    DefinitionError::CannotUseDefault {
                        handler,
                        param,
                        marker,
                    }
                }));
            }
            if has_factory {
                return Err(err(|handler, param, marker| {
                    DefinitionError::CannotUseDefaultFactory {
                        handler,
                        param,
                        marker,
                    }
                }));
            }
        }
        if has_default && has_factory {
            return Err(err(|handler, param, marker| {
                DefinitionError::SpecifyBothDefaultAndDefaultFactory {
                    handler,
                    param,
                    marker,
                }
            }));
        }
        if has_nonnull_default && optional {
            return Err(err(|handler, param, marker| {
                DefinitionError::SpecifyBothDefaultAndOptional {
                    handler,
                    param,
                    marker,
                }
            }));
        }
        if has_factory && optional {
            return Err(err(|handler, param, marker| {
                DefinitionError::SpecifyBothDefaultFactoryAndOptional {
                    handler,
                    param,
                    marker,
                }
            }));
        }
        if param_default.is_some() && opts.default.is_some() {
            return Err(err(|handler, param, marker| {
                DefinitionError::IncorrectDefaultDefinition {
                    handler,
                    param,
                    marker,
                }
            }));
        }

        let extract_all = opts
            .extract_all
            .unwrap_or(kind.only_raw() || annotation.shape() == Shape::Model);
        let validate = opts.validate.unwrap_or(!kind.only_raw());
        if extract_all && validate && annotation.shape() == Shape::Scalar {
            return Err(DefinitionError::ScalarSchema {
                handler: handler.to_string(),
                param: name.to_string(),
                type_name: annotation.type_name(),
            });
        }

        let default = param_default
            .or_else(|| opts.default.clone())
            .or_else(|| optional.then_some(Value::Null));
        let default_factory = opts.default_factory.clone();
        let required = default.is_none() && default_factory.is_none();

        Ok(Self {
            name: name.to_string(),
            alias: opts.alias.clone().unwrap_or_else(|| name.to_string()),
            kind,
            extract_all,
            validate,
            required,
            default,
            default_factory,
            annotation,
        })
    }

    /// The handler parameter name values are bound under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire attribute name looked up during extraction.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The request location this field reads from.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Whether the field consumes the whole payload instead of one
    /// named attribute.
    #[must_use]
    pub fn extract_all(&self) -> bool {
        self.extract_all
    }

    /// Whether the extracted value is checked against the annotation.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.validate
    }

    /// Whether an absent value is reported as a missing field.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// The declared annotation.
    #[must_use]
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Produces the substitute value for an absent field, if any.
    #[must_use]
    pub fn resolve_default(&self) -> Option<Value> {
        self.default
            .clone()
            .or_else(|| self.default_factory.as_ref().map(|factory| factory()))
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("kind", &self.kind)
            .field("extract_all", &self.extract_all)
            .field("validate", &self.validate)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("has_default_factory", &self.default_factory.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{BytesBody, JsonBody, Path, Query, StreamBody};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct UserModel {
        #[allow(dead_code)]
        name: String,
    }

    fn spec(
        annotation: Annotation,
        marker: impl Into<ParamMarker>,
        param_default: Option<Value>,
    ) -> DefinitionResult<FieldSpec> {
        FieldSpec::new("handler", "param", annotation, &marker.into(), param_default)
    }

    #[test]
    fn test_plain_query_param() {
        let field = spec(Annotation::of::<u32>(), Query::new(), None).unwrap();
        assert!(field.required());
        assert!(field.validate());
        assert!(!field.extract_all());
        assert_eq!(field.alias(), "param");
        assert_eq!(field.resolve_default(), None);
    }

    #[test]
    fn test_alias_overrides_name() {
        let field = spec(Annotation::of::<u32>(), Query::new().alias("p"), None).unwrap();
        assert_eq!(field.name(), "param");
        assert_eq!(field.alias(), "p");
    }

    #[test]
    fn test_marker_default_makes_field_non_required() {
        let field = spec(Annotation::of::<u32>(), Query::new().default(json!(1)), None).unwrap();
        assert!(!field.required());
        assert_eq!(field.resolve_default(), Some(json!(1)));
    }

    #[test]
    fn test_param_level_default() {
        let field = spec(Annotation::of::<u32>(), Query::new(), Some(json!(9))).unwrap();
        assert!(!field.required());
        assert_eq!(field.resolve_default(), Some(json!(9)));
    }

    #[test]
    fn test_default_factory() {
        let field = spec(
            Annotation::of::<u32>(),
            Query::new().default_factory(|| json!(7)),
            None,
        )
        .unwrap();
        assert!(!field.required());
        assert_eq!(field.resolve_default(), Some(json!(7)));
    }

    #[test]
    fn test_optional_defaults_to_null() {
        let field = spec(Annotation::of::<u32>().optional(), Query::new(), None).unwrap();
        assert!(!field.required());
        assert_eq!(field.resolve_default(), Some(Value::Null));
    }

    #[test]
    fn test_path_cannot_default() {
        let err = spec(Annotation::of::<u32>(), Path::new().default(json!(1)), None).unwrap_err();
        assert!(matches!(err, DefinitionError::CannotUseDefault { .. }));

        let err = spec(
            Annotation::of::<u32>(),
            Path::new().default_factory(|| json!(1)),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::CannotUseDefaultFactory { .. }));
    }

    #[test]
    fn test_path_cannot_be_optional() {
        let err = spec(Annotation::of::<u32>().optional(), Path::new(), None).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::ParameterCannotBeOptional { .. }
        ));
    }

    #[test]
    fn test_optional_beats_default_in_check_order() {
        // Path with both an optional annotation and a default reports
        // the optionality problem first.
        let err = spec(
            Annotation::of::<u32>().optional(),
            Path::new().default(json!(1)),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::ParameterCannotBeOptional { .. }
        ));
    }

    #[test]
    fn test_default_and_factory_conflict() {
        let err = spec(
            Annotation::of::<u32>(),
            Query::new().default(json!(1)).default_factory(|| json!(2)),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::SpecifyBothDefaultAndDefaultFactory { .. }
        ));
    }

    #[test]
    fn test_default_and_optional_conflict() {
        let err = spec(
            Annotation::of::<u32>().optional(),
            Query::new().default(json!(1)),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::SpecifyBothDefaultAndOptional { .. }
        ));
    }

    #[test]
    fn test_null_default_with_optional_allowed() {
        // An explicit null default says nothing optionality does not
        // already say, so it is accepted rather than flagged.
        let field = spec(
            Annotation::of::<u32>().optional(),
            Query::new().default(Value::Null),
            None,
        )
        .unwrap();
        assert!(!field.required());
        assert_eq!(field.resolve_default(), Some(Value::Null));

        let field = spec(Annotation::of::<u32>().optional(), Query::new(), Some(Value::Null))
            .unwrap();
        assert_eq!(field.resolve_default(), Some(Value::Null));
    }

    #[test]
    fn test_factory_and_optional_conflict() {
        let err = spec(
            Annotation::of::<u32>().optional(),
            Query::new().default_factory(|| json!(1)),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::SpecifyBothDefaultFactoryAndOptional { .. }
        ));
    }

    #[test]
    fn test_double_default_conflict() {
        let err = spec(
            Annotation::of::<u32>(),
            Query::new().default(json!(1)),
            Some(json!(2)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::IncorrectDefaultDefinition { .. }
        ));
    }

    #[test]
    fn test_model_annotation_extracts_all() {
        let field = spec(Annotation::model::<UserModel>(), JsonBody::new(), None).unwrap();
        assert!(field.extract_all());
        assert!(field.validate());
    }

    #[test]
    fn test_scalar_cannot_be_schema() {
        let err = spec(
            Annotation::of::<u32>(),
            JsonBody::new().extract_all(true),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::ScalarSchema { .. }));
    }

    #[test]
    fn test_raw_body_defaults() {
        let field = spec(Annotation::raw(), BytesBody::new(), None).unwrap();
        assert!(field.extract_all());
        assert!(!field.validate());
        assert!(field.required());
    }

    #[test]
    fn test_raw_body_rejects_validate() {
        let err = spec(Annotation::raw(), BytesBody::new().validate(true), None).unwrap_err();
        assert!(matches!(err, DefinitionError::ValidateNotSupported { .. }));
    }

    #[test]
    fn test_raw_body_rejects_partial_extraction() {
        let err = spec(Annotation::raw(), BytesBody::new().extract_all(false), None).unwrap_err();
        assert!(matches!(err, DefinitionError::ExtractAllRequired { .. }));
    }

    #[test]
    fn test_stream_cannot_default() {
        let err = spec(Annotation::raw(), StreamBody::new().default(json!(null)), None)
            .unwrap_err();
        assert!(matches!(err, DefinitionError::CannotUseDefault { .. }));
    }
}
