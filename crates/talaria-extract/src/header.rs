//! Header extraction.

use crate::extractor::PayloadExtractor;
use crate::{ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use talaria_core::{KindSlot, ParamKind};

/// Extracts HTTP headers as named string fields.
///
/// Header names are exposed lowercase, matching the wire normalization
/// applied by the HTTP layer. A header repeated on the wire keeps its
/// first value.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderExtractor;

impl HeaderExtractor {
    /// Creates a new header extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadExtractor for HeaderExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Header
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        let mut fields = IndexMap::new();
        for (name, value) in parts.headers() {
            let text = value.to_str().map_err(|_| ExtractError::Malformed {
                slot: KindSlot::Header,
                detail: format!("header {name} contains non-UTF-8 bytes"),
            })?;
            fields
                .entry(name.as_str().to_string())
                .or_insert_with(|| Value::String(text.to_string()));
        }
        Ok(RawPayload::Fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestPartsBuilder;
    use http::{HeaderMap, HeaderValue, Method, Uri};
    use serde_json::json;

    #[tokio::test]
    async fn test_names_are_lowercase() {
        let parts = RequestPartsBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/"))
            .header("x-request-id", "abc")
            .header("host", "example.com")
            .build();

        let payload = HeaderExtractor::new().extract(&parts).await.unwrap();
        assert_eq!(payload.field("x-request-id"), Some(json!("abc")));
        assert_eq!(payload.field("host"), Some(json!("example.com")));
        assert_eq!(payload.field("X-Request-Id"), None);
    }

    #[tokio::test]
    async fn test_repeated_header_keeps_first() {
        let mut headers = HeaderMap::new();
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        let parts = RequestPartsBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/"))
            .headers(headers)
            .build();

        let payload = HeaderExtractor::new().extract(&parts).await.unwrap();
        assert_eq!(payload.field("accept"), Some(json!("text/html")));
    }

    #[tokio::test]
    async fn test_non_utf8_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-binary",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );

        let parts = RequestPartsBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/"))
            .headers(headers)
            .build();

        let err = HeaderExtractor::new().extract(&parts).await.unwrap_err();
        assert_eq!(err.slot(), KindSlot::Header);
    }
}
