//! Raw body extraction: bytes, text, and stream.

use crate::extractor::{check_body_size, PayloadExtractor};
use crate::{BodyStream, ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use talaria_core::{BodyKind, KindSlot, ParamKind, DEFAULT_MAX_BODY_SIZE};

/// Extracts the request body verbatim as bytes.
#[derive(Debug, Clone)]
pub struct BytesBodyExtractor {
    max_size: usize,
}

impl Default for BytesBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BytesBodyExtractor {
    /// Creates an extractor with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
}

#[async_trait]
impl PayloadExtractor for BytesBodyExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Body(BodyKind::Bytes)
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        check_body_size(parts, self.max_size)?;
        Ok(RawPayload::Bytes(parts.body().clone()))
    }
}

/// Extracts the request body as UTF-8 text.
#[derive(Debug, Clone)]
pub struct TextBodyExtractor {
    max_size: usize,
}

impl Default for TextBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBodyExtractor {
    /// Creates an extractor with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
}

#[async_trait]
impl PayloadExtractor for TextBodyExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Body(BodyKind::Text)
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        check_body_size(parts, self.max_size)?;
        let text =
            std::str::from_utf8(parts.body()).map_err(|e| ExtractError::Malformed {
                slot: KindSlot::Body,
                detail: format!("body is not valid UTF-8: {e}"),
            })?;
        Ok(RawPayload::Text(text.to_string()))
    }
}

/// Exposes the request body as a chunked stream.
///
/// Streams carry no size limit: the handler decides how much to
/// consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamBodyExtractor;

impl StreamBodyExtractor {
    /// Creates a new stream extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadExtractor for StreamBodyExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Body(BodyKind::Stream)
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        Ok(RawPayload::Stream(BodyStream::new(parts.body().clone())))
    }
}
