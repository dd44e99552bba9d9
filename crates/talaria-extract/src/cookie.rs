//! Cookie extraction.

use crate::extractor::PayloadExtractor;
use crate::{ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use talaria_core::ParamKind;

/// Extracts cookies from the `Cookie` header as named string fields.
///
/// A missing header yields an empty field map. Values wrapped in
/// double quotes are unwrapped; pairs without an `=` are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieExtractor;

impl CookieExtractor {
    /// Creates a new cookie extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadExtractor for CookieExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Cookie
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        let mut fields = IndexMap::new();
        if let Some(header) = parts.header("cookie") {
            for pair in header.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                fields.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
        Ok(RawPayload::Fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestPartsBuilder;
    use http::{Method, Uri};
    use serde_json::json;

    async fn extract(header: &str) -> RawPayload {
        let parts = RequestPartsBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/"))
            .header("cookie", header)
            .build();
        CookieExtractor::new().extract(&parts).await.unwrap()
    }

    #[tokio::test]
    async fn test_multiple_cookies() {
        let payload = extract("session=abc123; theme=dark").await;
        assert_eq!(payload.field("session"), Some(json!("abc123")));
        assert_eq!(payload.field("theme"), Some(json!("dark")));
    }

    #[tokio::test]
    async fn test_quoted_value_unwrapped() {
        let payload = extract(r#"pref="a=b; c""#).await;
        // First pair splits on the inner semicolon, leaving an unclosed
        // quote; only well-formed pairs survive.
        assert_eq!(payload.field("pref"), Some(json!("\"a=b")));
    }

    #[tokio::test]
    async fn test_quotes_stripped() {
        let payload = extract(r#"token="xyz""#).await;
        assert_eq!(payload.field("token"), Some(json!("xyz")));
    }

    #[tokio::test]
    async fn test_malformed_pairs_skipped() {
        let payload = extract("valid=yes; garbage; =novalue").await;
        assert_eq!(payload.field("valid"), Some(json!("yes")));
        match payload {
            RawPayload::Fields(ref map) => assert_eq!(map.len(), 1),
            _ => panic!("expected fields"),
        }
    }

    #[tokio::test]
    async fn test_no_cookie_header() {
        let parts = RequestPartsBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/"))
            .build();
        let payload = CookieExtractor::new().extract(&parts).await.unwrap();
        assert!(payload.is_empty());
    }
}
