//! Multipart form body extraction.

use crate::extractor::{check_body_size, check_media_type, PayloadExtractor};
use crate::form::FormBodyExtractor;
use crate::{ExtractError, ExtractResult, RawPayload, RequestParts};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::convert::Infallible;
use talaria_core::{BodyKind, KindSlot, ParamKind, DEFAULT_MAX_BODY_SIZE};

/// Extracts a `multipart/form-data` body as named fields.
///
/// Each part is read to completion and exposed as a text field; parts
/// without a name are skipped. Case folding and duplicate handling
/// match [`FormBodyExtractor`].
#[derive(Debug, Clone)]
pub struct MultipartBodyExtractor {
    max_size: usize,
    // Name folding and duplicate handling are shared with the
    // urlencoded extractor.
    attrs: FormBodyExtractor,
}

impl Default for MultipartBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBodyExtractor {
    /// Creates an extractor with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_BODY_SIZE,
            attrs: FormBodyExtractor::new(),
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Controls whether part names keep their case.
    #[must_use]
    pub fn attrs_case_sensitive(mut self, sensitive: bool) -> Self {
        self.attrs = self.attrs.attrs_case_sensitive(sensitive);
        self
    }

    /// Controls whether repeated part names become a JSON array.
    #[must_use]
    pub fn duplicated_attrs_as_array(mut self, as_array: bool) -> Self {
        self.attrs = self.attrs.duplicated_attrs_as_array(as_array);
        self
    }
}

#[async_trait]
impl PayloadExtractor for MultipartBodyExtractor {
    fn kind(&self) -> ParamKind {
        ParamKind::Body(BodyKind::Multipart)
    }

    async fn extract(&self, parts: &RequestParts) -> ExtractResult<RawPayload> {
        check_media_type(parts, &mime::MULTIPART_FORM_DATA)?;
        check_body_size(parts, self.max_size)?;

        let content_type = parts.content_type().ok_or_else(|| ExtractError::Malformed {
            slot: KindSlot::Body,
            detail: "multipart body requires a content-type header".to_string(),
        })?;
        let boundary =
            multer::parse_boundary(content_type).map_err(|e| ExtractError::Malformed {
                slot: KindSlot::Body,
                detail: e.to_string(),
            })?;

        let body = parts.body().clone();
        let stream = futures_util::stream::once(async move { Ok::<_, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut fields = IndexMap::new();
        loop {
            let field = multipart
                .next_field()
                .await
                .map_err(|e| ExtractError::Malformed {
                    slot: KindSlot::Body,
                    detail: e.to_string(),
                })?;
            let Some(field) = field else { break };
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            let text = field.text().await.map_err(|e| ExtractError::Malformed {
                slot: KindSlot::Body,
                detail: format!("failed to read part {name}: {e}"),
            })?;
            self.attrs
                .insert_attr(&mut fields, self.attrs.fold_name(&name), text);
        }
        Ok(RawPayload::Fields(fields))
    }
}
