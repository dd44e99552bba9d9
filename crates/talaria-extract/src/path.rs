//! Path parameter extraction.

use crate::extractor::PayloadExtractor;
use crate::{ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use talaria_core::ParamKind;

/// Extracts route-captured path parameters as named string fields.
///
/// Path values are always strings as captured by the router; numeric
/// coercion happens later during validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathExtractor;

impl PathExtractor {
    /// Creates a new path extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadExtractor for PathExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Path
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        let fields: IndexMap<String, Value> = parts
            .path_params()
            .iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();
        Ok(RawPayload::Fields(fields))
    }
}
