//! Parameter kinds and their static capability table.
//!
//! A [`ParamKind`] names the request channel a value is read from. Body
//! sub-formats are a nested enum so that capability checks and
//! mutual-exclusion rules stay exhaustive: adding a kind forces every
//! `match` in the workspace to be revisited.

use std::fmt;

/// Default maximum body size accepted by body extractors (1 MiB).
///
/// Overridable per field through the body markers' `body_max_size` option.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Sub-format of a body parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// `application/json` body, decoded into a JSON value.
    Json,
    /// `application/x-www-form-urlencoded` body.
    Form,
    /// `multipart/form-data` body.
    Multipart,
    /// Raw bytes, no structural decoding.
    Bytes,
    /// UTF-8 text, no structural decoding.
    Text,
    /// The body reader itself, handed to the handler unread.
    Stream,
}

impl BodyKind {
    /// Returns the declared media type for this body format.
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
            Self::Multipart => "multipart/form-data",
            Self::Bytes | Self::Stream => "application/octet-stream",
            Self::Text => "text/plain",
        }
    }
}

/// The request channel a parameter is extracted from.
///
/// This is the closed set of extraction kinds. Capabilities are const
/// functions rather than per-marker attributes so that the rules in the
/// binding layer are statically checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// A path segment captured by the router.
    Path,
    /// A query string parameter.
    Query,
    /// An HTTP header.
    Header,
    /// A cookie from the `Cookie` header.
    Cookie,
    /// The request body, in one of the [`BodyKind`] formats.
    Body(BodyKind),
}

impl ParamKind {
    /// Projects this kind onto its extraction slot.
    ///
    /// All body sub-formats share the single [`KindSlot::Body`] slot, which
    /// is what makes them mutually exclusive within one handler.
    #[must_use]
    pub const fn slot(&self) -> KindSlot {
        match self {
            Self::Path => KindSlot::Path,
            Self::Query => KindSlot::Query,
            Self::Header => KindSlot::Header,
            Self::Cookie => KindSlot::Cookie,
            Self::Body(_) => KindSlot::Body,
        }
    }

    /// Whether a parameter of this kind may carry a default value.
    ///
    /// Path segments always exist once a route matches, and a stream body
    /// has no meaningful substitute, so neither can default.
    #[must_use]
    pub const fn can_default(&self) -> bool {
        !matches!(self, Self::Path | Self::Body(BodyKind::Stream))
    }

    /// Whether this kind only supports raw, unvalidated whole-payload
    /// extraction (no addressable named sub-fields).
    #[must_use]
    pub const fn only_raw(&self) -> bool {
        matches!(
            self,
            Self::Body(BodyKind::Bytes | BodyKind::Text | BodyKind::Stream)
        )
    }

    /// The marker type name used in definition error messages.
    #[must_use]
    pub const fn marker_name(&self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::Query => "Query",
            Self::Header => "Header",
            Self::Cookie => "Cookie",
            Self::Body(BodyKind::Json) => "JsonBody",
            Self::Body(BodyKind::Form) => "FormDataBody",
            Self::Body(BodyKind::Multipart) => "MultipartBody",
            Self::Body(BodyKind::Bytes) => "BytesBody",
            Self::Body(BodyKind::Text) => "TextBody",
            Self::Body(BodyKind::Stream) => "StreamBody",
        }
    }
}

/// Five-way extraction slot: the key for validation units and the
/// per-request extraction cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindSlot {
    /// Path parameters.
    Path,
    /// Query string.
    Query,
    /// Headers.
    Header,
    /// Cookies.
    Cookie,
    /// Request body, whatever its sub-format.
    Body,
}

impl KindSlot {
    /// The wire location string used in error `loc` paths.
    #[must_use]
    pub const fn location(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for KindSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.location())
    }
}
