//! The payload extractor trait.

use crate::{ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use talaria_core::{KindSlot, ParamKind};

/// Pulls raw, unvalidated data out of one request location.
///
/// Implementations are stateless apart from configuration and may be
/// shared across requests. Extraction is async because body-reading
/// extractors may parse multipart streams.
#[async_trait]
pub trait PayloadExtractor: Send + Sync {
    /// The parameter kind this extractor serves.
    fn kind(&self) -> ParamKind;

    /// Extracts the raw payload from the request.
    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload>;
}

/// Checks a buffered body against a size limit.
pub(crate) fn check_body_size(parts: &RequestParts, max_size: usize) -> ExtractResult<()> {
    let actual = parts.body().len();
    if actual > max_size {
        return Err(ExtractError::PayloadTooLarge {
            max: max_size,
            actual,
        });
    }
    Ok(())
}

/// Verifies the request Content-Type against an expected media type.
///
/// A missing Content-Type header is tolerated; a present but different
/// one is a malformed-payload error.
pub(crate) fn check_media_type(parts: &RequestParts, expected: &mime::Mime) -> ExtractResult<()> {
    let Some(raw) = parts.content_type() else {
        return Ok(());
    };
    let parsed: mime::Mime = raw.parse().map_err(|_| ExtractError::Malformed {
        slot: KindSlot::Body,
        detail: format!("invalid content-type header: {raw}"),
    })?;
    if parsed.type_() == expected.type_() && parsed.subtype() == expected.subtype() {
        Ok(())
    } else {
        Err(ExtractError::Malformed {
            slot: KindSlot::Body,
            detail: format!("unexpected content-type: expected {expected}, got {parsed}"),
        })
    }
}
