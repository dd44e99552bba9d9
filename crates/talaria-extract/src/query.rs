//! Query string extraction.

use crate::extractor::PayloadExtractor;
use crate::{ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use talaria_core::{KindSlot, ParamKind};

/// Extracts URL query parameters as named string fields.
///
/// Repeated keys keep the last occurrence. An absent query string
/// yields an empty field map rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExtractor;

impl QueryExtractor {
    /// Creates a new query extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadExtractor for QueryExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Query
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        let Some(raw) = parts.query_string() else {
            return Ok(RawPayload::Fields(IndexMap::new()));
        };
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(raw).map_err(|e| ExtractError::Malformed {
                slot: KindSlot::Query,
                detail: e.to_string(),
            })?;
        let mut fields = IndexMap::new();
        for (name, value) in pairs {
            fields.insert(name, Value::String(value));
        }
        Ok(RawPayload::Fields(fields))
    }
}
