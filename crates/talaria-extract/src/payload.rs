//! Raw extracted payloads.
//!
//! A [`RawPayload`] is the intermediate result of running a payload
//! extractor: structured but unvalidated data pulled out of one request
//! location. Validation units consume these to produce typed values.

use bytes::Bytes;
use futures_core::Stream;
use indexmap::IndexMap;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Chunk size used when replaying a buffered body as a stream.
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Raw data extracted from one request location, before validation.
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// A flat map of named fields (path, query, headers, cookies, forms).
    ///
    /// Insertion order follows the source order of the request.
    Fields(IndexMap<String, Value>),
    /// A decoded JSON document.
    Json(Value),
    /// The request body verbatim.
    Bytes(Bytes),
    /// The request body decoded as UTF-8 text.
    Text(String),
    /// The request body as a chunked stream.
    Stream(BodyStream),
}

impl RawPayload {
    /// Looks up a single named field.
    ///
    /// Works for both the `Fields` map and top-level keys of a `Json`
    /// object. Other payload shapes have no addressable fields.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Self::Fields(map) => map.get(name).cloned(),
            Self::Json(Value::Object(obj)) => obj.get(name).cloned(),
            _ => None,
        }
    }

    /// Converts the payload into a single JSON value, when it has one.
    ///
    /// `Bytes` and `Stream` payloads carry no JSON representation.
    #[must_use]
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Fields(map) => Some(Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )),
            Self::Json(value) => Some(value.clone()),
            Self::Text(text) => Some(Value::String(text.clone())),
            Self::Bytes(_) | Self::Stream(_) => None,
        }
    }

    /// Returns `true` if the payload carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Fields(map) => map.is_empty(),
            Self::Json(value) => value.is_null(),
            Self::Bytes(bytes) => bytes.is_empty(),
            Self::Text(text) => text.is_empty(),
            Self::Stream(stream) => stream.is_empty(),
        }
    }
}

/// A buffered body replayed as a stream of [`Bytes`] chunks.
///
/// The embedding server buffers bodies up front, so the stream is a
/// cheap cursor over shared memory. Cloning yields an independent
/// cursor positioned at the start.
#[derive(Debug)]
pub struct BodyStream {
    data: Bytes,
    offset: usize,
}

impl BodyStream {
    /// Wraps a buffered body.
    #[must_use]
    pub fn new(data: Bytes) -> Self {
        Self { data, offset: 0 }
    }

    /// Returns `true` if the underlying body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the total body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl Clone for BodyStream {
    fn clone(&self) -> Self {
        // A clone restarts from the beginning.
        Self::new(self.data.clone())
    }
}

impl Stream for BodyStream {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.offset >= self.data.len() {
            return Poll::Ready(None);
        }
        let end = (self.offset + STREAM_CHUNK_SIZE).min(self.data.len());
        let chunk = self.data.slice(self.offset..end);
        self.offset = end;
        Poll::Ready(Some(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;

    #[test]
    fn test_field_lookup_on_fields() {
        let mut map = IndexMap::new();
        map.insert("name".to_string(), json!("alice"));
        let payload = RawPayload::Fields(map);

        assert_eq!(payload.field("name"), Some(json!("alice")));
        assert_eq!(payload.field("missing"), None);
    }

    #[test]
    fn test_field_lookup_on_json_object() {
        let payload = RawPayload::Json(json!({"age": 30}));
        assert_eq!(payload.field("age"), Some(json!(30)));
        assert_eq!(payload.field("name"), None);
    }

    #[test]
    fn test_field_lookup_on_scalar_json() {
        let payload = RawPayload::Json(json!("just a string"));
        assert_eq!(payload.field("anything"), None);
    }

    #[test]
    fn test_as_value() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), json!(1));
        assert_eq!(RawPayload::Fields(map).as_value(), Some(json!({"a": 1})));
        assert_eq!(
            RawPayload::Json(json!([1, 2])).as_value(),
            Some(json!([1, 2]))
        );
        assert_eq!(
            RawPayload::Text("hi".to_string()).as_value(),
            Some(json!("hi"))
        );
        assert_eq!(RawPayload::Bytes(Bytes::from_static(b"x")).as_value(), None);
    }

    #[test]
    fn test_is_empty() {
        assert!(RawPayload::Fields(IndexMap::new()).is_empty());
        assert!(RawPayload::Json(Value::Null).is_empty());
        assert!(RawPayload::Bytes(Bytes::new()).is_empty());
        assert!(RawPayload::Text(String::new()).is_empty());
        assert!(!RawPayload::Json(json!({})).is_empty());
        assert!(!RawPayload::Text("x".to_string()).is_empty());
    }

    #[tokio::test]
    async fn test_stream_yields_body_in_chunks() {
        let data = Bytes::from(vec![7u8; STREAM_CHUNK_SIZE + 10]);
        let mut stream = BodyStream::new(data);

        let first = stream.next().await.unwrap();
        assert_eq!(first.len(), STREAM_CHUNK_SIZE);
        let second = stream.next().await.unwrap();
        assert_eq!(second.len(), 10);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_clone_restarts() {
        let mut stream = BodyStream::new(Bytes::from_static(b"hello"));
        assert_eq!(stream.next().await.unwrap(), Bytes::from_static(b"hello"));

        let mut fresh = stream.clone();
        assert_eq!(fresh.next().await.unwrap(), Bytes::from_static(b"hello"));
    }
}
