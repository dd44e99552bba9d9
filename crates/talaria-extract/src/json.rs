//! JSON body extraction.

use crate::extractor::{check_body_size, check_media_type, PayloadExtractor};
use crate::{ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use serde_json::Value;
use talaria_core::{BodyKind, KindSlot, ParamKind, DEFAULT_MAX_BODY_SIZE};

/// A pluggable JSON decoder.
///
/// The default is [`serde_json::from_slice`]; applications can install
/// a stricter or more lenient decoder per handler.
pub type JsonDecoder = fn(&[u8]) -> Result<Value, serde_json::Error>;

/// Extracts and decodes a JSON request body.
///
/// An empty body decodes to `null` so that optional body parameters
/// can fall back to their defaults instead of failing on a decode
/// error.
///
/// # Example
///
/// ```rust
/// use talaria_extract::JsonBodyExtractor;
///
/// let extractor = JsonBodyExtractor::new().max_size(64 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct JsonBodyExtractor {
    max_size: usize,
    decoder: Option<JsonDecoder>,
}

impl Default for JsonBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonBodyExtractor {
    /// Creates an extractor with the default size limit and decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_BODY_SIZE,
            decoder: None,
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Installs a custom JSON decoder.
    #[must_use]
    pub fn decoder(mut self, decoder: JsonDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }
}

#[async_trait]
impl PayloadExtractor for JsonBodyExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Body(BodyKind::Json)
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        check_media_type(parts, &mime::APPLICATION_JSON)?;
        check_body_size(parts, self.max_size)?;

        let body = parts.body();
        if body.is_empty() {
            return Ok(RawPayload::Json(Value::Null));
        }
        let decode = self.decoder.unwrap_or(|bytes| serde_json::from_slice(bytes));
        let value = decode(body).map_err(|e| ExtractError::Malformed {
            slot: KindSlot::Body,
            detail: e.to_string(),
        })?;
        Ok(RawPayload::Json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestPartsBuilder;
    use http::{Method, Uri};
    use serde_json::json;

    fn post(body: &str) -> RequestParts {
        RequestPartsBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/"))
            .header("content-type", "application/json")
            .body(body.to_string())
            .build()
    }

    #[tokio::test]
    async fn test_decodes_object() {
        let payload = JsonBodyExtractor::new()
            .extract(&post(r#"{"name": "alice", "age": 30}"#))
            .await
            .unwrap();
        assert_eq!(payload.field("name"), Some(json!("alice")));
        assert_eq!(payload.field("age"), Some(json!(30)));
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let payload = JsonBodyExtractor::new().extract(&post("")).await.unwrap();
        assert!(matches!(payload, RawPayload::Json(Value::Null)));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let err = JsonBodyExtractor::new()
            .extract(&post("{not json"))
            .await
            .unwrap_err();
        assert_eq!(err.slot(), KindSlot::Body);
    }

    #[tokio::test]
    async fn test_size_limit() {
        let big = format!(r#"{{"data": "{}"}}"#, "x".repeat(100));
        let err = JsonBodyExtractor::new()
            .max_size(50)
            .extract(&post(&big))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::PayloadTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_wrong_content_type() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/"))
            .header("content-type", "text/plain")
            .body(r#"{"a": 1}"#)
            .build();
        let err = JsonBodyExtractor::new().extract(&parts).await.unwrap_err();
        assert_eq!(err.slot(), KindSlot::Body);
    }

    #[tokio::test]
    async fn test_custom_decoder() {
        fn arrays_only(bytes: &[u8]) -> Result<Value, serde_json::Error> {
            let value: Value = serde_json::from_slice(bytes)?;
            if value.is_array() {
                Ok(value)
            } else {
                serde_json::from_str("not an array")
            }
        }

        let extractor = JsonBodyExtractor::new().decoder(arrays_only);
        assert!(extractor.extract(&post("[1, 2]")).await.is_ok());
        assert!(extractor.extract(&post(r#"{"a": 1}"#)).await.is_err());
    }
}
