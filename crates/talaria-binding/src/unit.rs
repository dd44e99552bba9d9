//! Validation units.
//!
//! A [`ValidationUnit`] groups every declared parameter that reads
//! from one extraction slot, and owns the extractor for that slot. It
//! runs in two modes: schema mode validates the whole payload against
//! a single field, fields mode pulls individual named attributes out
//! of the shared payload.

use crate::annotation::Shape;
use crate::field::FieldSpec;
use crate::values::BoundValue;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use talaria_core::{KindSlot, ParamKind, ValidationIssue};
use talaria_extract::{ExtractCache, PayloadExtractor, RawPayload, RequestParts};

/// A conflict between two parameter declarations on the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitConflict {
    /// Whole-payload and per-attribute parameters were mixed, or two
    /// whole-payload parameters were declared.
    IncompatibleStyles,
    /// Two parameters resolve to the same wire alias.
    DuplicateAlias,
    /// Two different body sub-formats were declared.
    BodyKindMismatch,
}

enum UnitMode {
    /// One field consumes the whole payload.
    Schema(Box<FieldSpec>),
    /// Named fields read individual attributes, keyed by alias.
    Fields(IndexMap<String, FieldSpec>),
}

/// All parameters of one handler that share an extraction slot.
pub struct ValidationUnit {
    kind: ParamKind,
    extractor: Arc<dyn PayloadExtractor>,
    mode: UnitMode,
}

impl fmt::Debug for ValidationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ValidationUnit");
        debug.field("kind", &self.kind);
        match &self.mode {
            UnitMode::Schema(field) => debug.field("schema", field),
            UnitMode::Fields(fields) => debug.field("fields", &fields.keys().collect::<Vec<_>>()),
        };
        debug.finish_non_exhaustive()
    }
}

impl ValidationUnit {
    /// Creates a unit from its first declared field.
    #[must_use]
    pub fn new(field: FieldSpec, extractor: Arc<dyn PayloadExtractor>) -> Self {
        let kind = field.kind();
        let mode = if field.extract_all() {
            UnitMode::Schema(Box::new(field))
        } else {
            let mut fields = IndexMap::new();
            fields.insert(field.alias().to_string(), field);
            UnitMode::Fields(fields)
        };
        Self {
            kind,
            extractor,
            mode,
        }
    }

    /// The parameter kind this unit extracts.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The extraction slot this unit is keyed under.
    #[must_use]
    pub fn slot(&self) -> KindSlot {
        self.kind.slot()
    }

    /// Adds another field to the unit.
    ///
    /// # Errors
    ///
    /// Returns a [`UnitConflict`] when the new field clashes with the
    /// fields already present.
    pub fn add_field(&mut self, field: FieldSpec) -> Result<(), UnitConflict> {
        if field.kind() != self.kind {
            return Err(UnitConflict::BodyKindMismatch);
        }
        match &mut self.mode {
            UnitMode::Schema(_) => Err(UnitConflict::IncompatibleStyles),
            UnitMode::Fields(fields) => {
                if field.extract_all() {
                    return Err(UnitConflict::IncompatibleStyles);
                }
                let alias = field.alias().to_string();
                if fields.contains_key(&alias) {
                    return Err(UnitConflict::DuplicateAlias);
                }
                fields.insert(alias, field);
                Ok(())
            }
        }
    }

    /// Extracts and validates this unit's parameters for one request.
    ///
    /// The raw payload is taken from `cache` when a prior unit already
    /// extracted this slot; a fresh successful extraction is cached
    /// for the units that follow. Failed extractions are not cached
    /// and surface as a single slot-level issue.
    ///
    /// All fields are checked even after the first failure, so one
    /// response reports every problem at once.
    pub async fn bind(
        &self,
        parts: &RequestParts,
        cache: &mut ExtractCache,
    ) -> (IndexMap<String, BoundValue>, Vec<ValidationIssue>) {
        let slot = self.slot();
        let payload = if let Some(cached) = cache.get(slot) {
            tracing::trace!(slot = %slot, "extraction cache hit");
            cached.clone()
        } else {
            match self.extractor.extract(parts).await {
                Ok(payload) => {
                    cache.insert(slot, payload.clone());
                    payload
                }
                Err(err) => return (IndexMap::new(), vec![err.into_issue()]),
            }
        };

        match &self.mode {
            UnitMode::Schema(field) => self.bind_schema(field, &payload),
            UnitMode::Fields(fields) => Self::bind_fields(slot, fields, &payload),
        }
    }

    fn bind_schema(
        &self,
        field: &FieldSpec,
        payload: &RawPayload,
    ) -> (IndexMap<String, BoundValue>, Vec<ValidationIssue>) {
        let slot = self.slot();
        let loc = vec![slot.location().to_string()];
        let mut values = IndexMap::new();
        let mut issues = Vec::new();

        // A stream is the reader itself and exists even for an empty
        // body, so it always binds.
        if let RawPayload::Stream(stream) = payload {
            values.insert(field.name().to_string(), BoundValue::Stream(stream.clone()));
            return (values, issues);
        }

        if payload.is_empty() {
            if field.validate() {
                // A schema may legitimately accept an empty payload
                // (a model whose attributes all have defaults), so
                // validation gets the first word. An absent body maps
                // to the empty object for model targets.
                let mut candidates = vec![payload.as_value().unwrap_or(Value::Null)];
                if field.annotation().shape() == Shape::Model {
                    candidates.push(Value::Object(serde_json::Map::new()));
                }
                for candidate in candidates {
                    if let Ok(normalized) = field.annotation().check(&candidate) {
                        if !normalized.is_null() {
                            values.insert(field.name().to_string(), BoundValue::Json(normalized));
                            return (values, issues);
                        }
                    }
                }
            }
            if field.required() {
                issues.push(ValidationIssue::missing(loc));
            } else if let Some(default) = field.resolve_default() {
                values.insert(field.name().to_string(), BoundValue::Json(default));
            }
            return (values, issues);
        }

        if field.validate() {
            let raw = payload.as_value().unwrap_or(Value::Null);
            match field.annotation().check(&raw) {
                Ok(normalized) => {
                    values.insert(field.name().to_string(), BoundValue::Json(normalized));
                }
                Err(msg) => issues.push(ValidationIssue::invalid(loc, msg)),
            }
        } else {
            values.insert(field.name().to_string(), Self::passthrough(payload));
        }
        (values, issues)
    }

    fn bind_fields(
        slot: KindSlot,
        fields: &IndexMap<String, FieldSpec>,
        payload: &RawPayload,
    ) -> (IndexMap<String, BoundValue>, Vec<ValidationIssue>) {
        let mut values = IndexMap::new();
        let mut issues = Vec::new();

        for field in fields.values() {
            let loc = vec![slot.location().to_string(), field.alias().to_string()];
            match payload.field(field.alias()) {
                None => {
                    if field.required() {
                        issues.push(ValidationIssue::missing(loc));
                    } else if let Some(default) = field.resolve_default() {
                        values.insert(field.name().to_string(), BoundValue::Json(default));
                    }
                }
                Some(raw) => {
                    if field.validate() {
                        match field.annotation().check(&raw) {
                            Ok(normalized) => {
                                values.insert(
                                    field.name().to_string(),
                                    BoundValue::Json(normalized),
                                );
                            }
                            Err(msg) => issues.push(ValidationIssue::invalid(loc, msg)),
                        }
                    } else {
                        values.insert(field.name().to_string(), BoundValue::Json(raw));
                    }
                }
            }
        }
        (values, issues)
    }

    fn passthrough(payload: &RawPayload) -> BoundValue {
        match payload {
            RawPayload::Bytes(bytes) => BoundValue::Bytes(bytes.clone()),
            RawPayload::Text(text) => BoundValue::Text(text.clone()),
            RawPayload::Stream(stream) => BoundValue::Stream(stream.clone()),
            other => BoundValue::Json(other.as_value().unwrap_or(Value::Null)),
        }
    }
}
