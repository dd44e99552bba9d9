//! Handler bindings.
//!
//! A [`HandlerBinding`] is the compiled parameter plan for one
//! handler: its validation units keyed by extraction slot, plus the
//! optional claim on the raw request object. It is built once at
//! registration time through [`HandlerBindingBuilder`], which rejects
//! every ill-formed declaration up front, and then drives validation
//! for each request.

use crate::annotation::Annotation;
use crate::field::FieldSpec;
use crate::markers::ParamMarker;
use crate::unit::{UnitConflict, ValidationUnit};
use crate::values::{BoundValue, BoundValues};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use talaria_core::{DefinitionError, DefinitionResult, KindSlot, ValidationIssue};
use talaria_extract::{ExtractCache, RequestParts};

/// Builder for a [`HandlerBinding`].
///
/// # Example
///
/// ```rust
/// use talaria_binding::{Annotation, HandlerBindingBuilder, Path, Query};
///
/// let binding = HandlerBindingBuilder::new("get_user")
///     .param("user_id", Annotation::of::<u64>(), Path::new())?
///     .param("verbose", Annotation::of::<bool>().optional(), Query::new())?
///     .build();
/// # Ok::<(), talaria_core::DefinitionError>(())
/// ```
pub struct HandlerBindingBuilder {
    handler: String,
    units: IndexMap<KindSlot, ValidationUnit>,
    request_param: Option<String>,
}

impl fmt::Debug for HandlerBindingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBindingBuilder")
            .field("handler", &self.handler)
            .field("units", &self.units)
            .field("request_param", &self.request_param)
            .finish()
    }
}

impl HandlerBindingBuilder {
    /// Starts a binding for the named handler.
    #[must_use]
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            units: IndexMap::new(),
            request_param: None,
        }
    }

    /// Declares one handler parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the declaration is
    /// ill-formed on its own or conflicts with a previous parameter.
    pub fn param(
        self,
        name: &str,
        annotation: Annotation,
        marker: impl Into<ParamMarker>,
    ) -> DefinitionResult<Self> {
        self.add_param(name, annotation, &marker.into(), None)
    }

    /// Declares a parameter with a parameter-level default.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::param`], plus the double-default
    /// conflict when the marker also carries one.
    pub fn param_with_default(
        self,
        name: &str,
        annotation: Annotation,
        marker: impl Into<ParamMarker>,
        default: impl Into<Value>,
    ) -> DefinitionResult<Self> {
        self.add_param(name, annotation, &marker.into(), Some(default.into()))
    }

    /// Claims the raw request object for the named parameter.
    ///
    /// # Errors
    ///
    /// Fails when a previous parameter already claimed it.
    pub fn request_param(mut self, name: &str) -> DefinitionResult<Self> {
        if let Some(first) = &self.request_param {
            return Err(DefinitionError::RequestParamAlreadyDefined {
                handler: self.handler,
                first: first.clone(),
                param: name.to_string(),
            });
        }
        self.request_param = Some(name.to_string());
        Ok(self)
    }

    /// Finishes the binding.
    #[must_use]
    pub fn build(self) -> HandlerBinding {
        HandlerBinding {
            handler: self.handler,
            units: self.units,
            request_param: self.request_param,
        }
    }

    fn add_param(
        mut self,
        name: &str,
        annotation: Annotation,
        marker: &ParamMarker,
        param_default: Option<Value>,
    ) -> DefinitionResult<Self> {
        let field = FieldSpec::new(&self.handler, name, annotation, marker, param_default)?;
        let slot = marker.kind().slot();
        tracing::debug!(
            handler = %self.handler,
            param = name,
            kind = marker.kind().marker_name(),
            "registering parameter"
        );
        match self.units.get_mut(&slot) {
            None => {
                tracing::debug!(handler = %self.handler, slot = %slot, "creating validation unit");
                self.units
                    .insert(slot, ValidationUnit::new(field, marker.build_extractor()));
            }
            Some(unit) => {
                unit.add_field(field).map_err(|conflict| match conflict {
                    UnitConflict::IncompatibleStyles => {
                        DefinitionError::IncompatibleExtractionStyles {
                            handler: self.handler.clone(),
                            param: name.to_string(),
                        }
                    }
                    UnitConflict::DuplicateAlias => DefinitionError::AttributeAlreadyDefined {
                        handler: self.handler.clone(),
                        param: name.to_string(),
                    },
                    UnitConflict::BodyKindMismatch => DefinitionError::BodyExtractionConflict {
                        handler: self.handler.clone(),
                        param: name.to_string(),
                    },
                })?;
            }
        }
        Ok(self)
    }
}

/// The compiled parameter plan for one handler.
pub struct HandlerBinding {
    handler: String,
    units: IndexMap<KindSlot, ValidationUnit>,
    request_param: Option<String>,
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("handler", &self.handler)
            .field("units", &self.units)
            .field("request_param", &self.request_param)
            .finish()
    }
}

impl HandlerBinding {
    /// The handler this binding was built for.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The parameter that receives the raw request object, if any.
    #[must_use]
    pub fn request_param(&self) -> Option<&str> {
        self.request_param.as_deref()
    }

    /// Returns `true` if the handler declares no extracted parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Validates one request against every declared parameter.
    ///
    /// Units run in declaration order over a fresh per-request cache,
    /// so each slot is extracted at most once. Validation does not
    /// short-circuit: the error list covers every failing parameter.
    /// Values bound by a unit that also produced issues are dropped.
    ///
    /// # Errors
    ///
    /// Returns the accumulated issue list when any parameter fails.
    pub async fn validate(&self, parts: &RequestParts) -> Result<BoundValues, Vec<ValidationIssue>> {
        let mut cache = ExtractCache::new();
        let mut bound = BoundValues::new();
        let mut all_issues = Vec::new();

        for unit in self.units.values() {
            let (values, issues) = unit.bind(parts, &mut cache).await;
            if issues.is_empty() {
                bound.extend(values);
            } else {
                all_issues.extend(issues);
            }
        }

        if all_issues.is_empty() {
            if let Some(name) = &self.request_param {
                bound.insert(name.clone(), BoundValue::Request(parts.clone()));
            }
            Ok(bound)
        } else {
            tracing::debug!(
                handler = %self.handler,
                issues = all_issues.len(),
                "request failed parameter validation"
            );
            Err(all_issues)
        }
    }
}
