//! URL-encoded form body extraction.

use crate::extractor::{check_body_size, check_media_type, PayloadExtractor};
use crate::{ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use talaria_core::{BodyKind, KindSlot, ParamKind, DEFAULT_MAX_BODY_SIZE};

/// Extracts an `application/x-www-form-urlencoded` body as named fields.
///
/// Attribute names can optionally be folded to lowercase, and repeated
/// attributes can optionally be collected into an array instead of
/// keeping the last occurrence.
#[derive(Debug, Clone)]
pub struct FormBodyExtractor {
    max_size: usize,
    attrs_case_sensitive: bool,
    duplicated_attrs_as_array: bool,
}

impl Default for FormBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBodyExtractor {
    /// Creates an extractor with the default size limit.
    ///
    /// Attributes are case-sensitive and duplicates keep the last
    /// value unless configured otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_BODY_SIZE,
            attrs_case_sensitive: true,
            duplicated_attrs_as_array: false,
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Controls whether attribute names keep their case.
    ///
    /// When `false`, names are folded to lowercase before insertion.
    #[must_use]
    pub fn attrs_case_sensitive(mut self, sensitive: bool) -> Self {
        self.attrs_case_sensitive = sensitive;
        self
    }

    /// Controls whether repeated attributes become a JSON array.
    #[must_use]
    pub fn duplicated_attrs_as_array(mut self, as_array: bool) -> Self {
        self.duplicated_attrs_as_array = as_array;
        self
    }

    pub(crate) fn fold_name(&self, name: &str) -> String {
        if self.attrs_case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    pub(crate) fn insert_attr(
        &self,
        fields: &mut IndexMap<String, Value>,
        name: String,
        value: String,
    ) {
        let value = Value::String(value);
        if !self.duplicated_attrs_as_array {
            fields.insert(name, value);
            return;
        }
        match fields.entry(name) {
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value);
            }
            indexmap::map::Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }
}

#[async_trait]
impl PayloadExtractor for FormBodyExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Body(BodyKind::Form)
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        check_media_type(parts, &mime::APPLICATION_WWW_FORM_URLENCODED)?;
        check_body_size(parts, self.max_size)?;

        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(parts.body()).map_err(|e| ExtractError::Malformed {
                slot: KindSlot::Body,
                detail: e.to_string(),
            })?;

        let mut fields = IndexMap::new();
        for (name, value) in pairs {
            self.insert_attr(&mut fields, self.fold_name(&name), value);
        }
        Ok(RawPayload::Fields(fields))
    }
}
