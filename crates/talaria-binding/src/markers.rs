//! Parameter location markers.
//!
//! Markers declare where a handler parameter comes from and carry the
//! per-parameter knobs: alias, default, default factory, validation
//! and whole-payload overrides, plus body-specific settings such as
//! size limits. A marker converts into a [`ParamMarker`], the erased
//! form the binding builder consumes.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use talaria_core::{BodyKind, ParamKind};
use talaria_extract::{
    BytesBodyExtractor, CookieExtractor, FormBodyExtractor, HeaderExtractor, JsonBodyExtractor,
    JsonDecoder, MultipartBodyExtractor, PathExtractor, PayloadExtractor, QueryExtractor,
    StreamBodyExtractor, TextBodyExtractor,
};

/// A lazily evaluated default value.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Settings shared by every marker.
#[derive(Clone, Default)]
pub(crate) struct MarkerOpts {
    pub(crate) alias: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) default_factory: Option<DefaultFactory>,
    pub(crate) validate: Option<bool>,
    pub(crate) extract_all: Option<bool>,
}

impl fmt::Debug for MarkerOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerOpts")
            .field("alias", &self.alias)
            .field("default", &self.default)
            .field("has_default_factory", &self.default_factory.is_some())
            .field("validate", &self.validate)
            .field("extract_all", &self.extract_all)
            .finish()
    }
}

macro_rules! marker_common_methods {
    () => {
        /// Binds the parameter to a differently named request attribute.
        #[must_use]
        pub fn alias(mut self, alias: impl Into<String>) -> Self {
            self.opts.alias = Some(alias.into());
            self
        }

        /// Supplies a default used when the attribute is absent.
        #[must_use]
        pub fn default(mut self, value: impl Into<Value>) -> Self {
            self.opts.default = Some(value.into());
            self
        }

        /// Supplies a factory that produces the default lazily.
        #[must_use]
        pub fn default_factory(
            mut self,
            factory: impl Fn() -> Value + Send + Sync + 'static,
        ) -> Self {
            self.opts.default_factory = Some(std::sync::Arc::new(factory));
            self
        }

        /// Overrides whether the extracted value is validated.
        #[must_use]
        pub fn validate(mut self, validate: bool) -> Self {
            self.opts.validate = Some(validate);
            self
        }

        /// Overrides whole-payload versus single-attribute extraction.
        #[must_use]
        pub fn extract_all(mut self, all: bool) -> Self {
            self.opts.extract_all = Some(all);
            self
        }
    };
}

macro_rules! marker_max_size_method {
    () => {
        /// Sets the maximum accepted body size in bytes.
        #[must_use]
        pub fn body_max_size(mut self, max_size: usize) -> Self {
            self.max_size = Some(max_size);
            self
        }
    };
}

/// Marks a parameter as a route path capture.
#[derive(Debug, Clone, Default)]
pub struct Path {
    opts: MarkerOpts,
}

impl Path {
    /// Creates a path marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
}

/// Marks a parameter as a URL query attribute.
#[derive(Debug, Clone, Default)]
pub struct Query {
    opts: MarkerOpts,
}

impl Query {
    /// Creates a query marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
}

/// Marks a parameter as an HTTP header.
#[derive(Debug, Clone, Default)]
pub struct Header {
    opts: MarkerOpts,
}

impl Header {
    /// Creates a header marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
}

/// Marks a parameter as a cookie.
#[derive(Debug, Clone, Default)]
pub struct Cookie {
    opts: MarkerOpts,
}

impl Cookie {
    /// Creates a cookie marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
}

/// Marks a parameter as a JSON request body.
#[derive(Debug, Clone, Default)]
pub struct JsonBody {
    opts: MarkerOpts,
    max_size: Option<usize>,
    decoder: Option<JsonDecoder>,
}

impl JsonBody {
    /// Creates a JSON body marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
    marker_max_size_method!();

    /// Installs a custom JSON decoder for this handler.
    #[must_use]
    pub fn decoder(mut self, decoder: JsonDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }
}

/// Marks a parameter as an urlencoded form body.
#[derive(Debug, Clone, Default)]
pub struct FormDataBody {
    opts: MarkerOpts,
    max_size: Option<usize>,
    attrs_case_sensitive: Option<bool>,
    duplicated_attrs_as_array: Option<bool>,
}

impl FormDataBody {
    /// Creates a form body marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
    marker_max_size_method!();

    /// Controls whether form attribute names keep their case.
    #[must_use]
    pub fn attrs_case_sensitive(mut self, sensitive: bool) -> Self {
        self.attrs_case_sensitive = Some(sensitive);
        self
    }

    /// Controls whether repeated attributes become a JSON array.
    #[must_use]
    pub fn duplicated_attrs_as_array(mut self, as_array: bool) -> Self {
        self.duplicated_attrs_as_array = Some(as_array);
        self
    }
}

/// Marks a parameter as a multipart form body.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    opts: MarkerOpts,
    max_size: Option<usize>,
    attrs_case_sensitive: Option<bool>,
    duplicated_attrs_as_array: Option<bool>,
}

impl MultipartBody {
    /// Creates a multipart body marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
    marker_max_size_method!();

    /// Controls whether part names keep their case.
    #[must_use]
    pub fn attrs_case_sensitive(mut self, sensitive: bool) -> Self {
        self.attrs_case_sensitive = Some(sensitive);
        self
    }

    /// Controls whether repeated part names become a JSON array.
    #[must_use]
    pub fn duplicated_attrs_as_array(mut self, as_array: bool) -> Self {
        self.duplicated_attrs_as_array = Some(as_array);
        self
    }
}

/// Marks a parameter as the raw body bytes.
#[derive(Debug, Clone, Default)]
pub struct BytesBody {
    opts: MarkerOpts,
    max_size: Option<usize>,
}

impl BytesBody {
    /// Creates a bytes body marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
    marker_max_size_method!();
}

/// Marks a parameter as the body decoded as UTF-8 text.
#[derive(Debug, Clone, Default)]
pub struct TextBody {
    opts: MarkerOpts,
    max_size: Option<usize>,
}

impl TextBody {
    /// Creates a text body marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
    marker_max_size_method!();
}

/// Marks a parameter as a chunked body stream.
#[derive(Debug, Clone, Default)]
pub struct StreamBody {
    opts: MarkerOpts,
}

impl StreamBody {
    /// Creates a stream body marker.
    #[must_use]
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    marker_common_methods!();
}

/// Body-kind specific extractor settings.
#[derive(Debug, Clone, Default)]
struct BodyConfig {
    max_size: Option<usize>,
    decoder: Option<JsonDecoder>,
    attrs_case_sensitive: Option<bool>,
    duplicated_attrs_as_array: Option<bool>,
}

/// The erased form of a location marker.
///
/// Constructed via `From` on any concrete marker; carries everything
/// the binding builder needs to produce a field descriptor and its
/// extractor.
#[derive(Debug, Clone)]
pub struct ParamMarker {
    kind: ParamKind,
    opts: MarkerOpts,
    body: BodyConfig,
}

impl ParamMarker {
    /// Returns the request location this marker binds to.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub(crate) fn opts(&self) -> &MarkerOpts {
        &self.opts
    }

    /// Builds the payload extractor configured by this marker.
    #[must_use]
    pub fn build_extractor(&self) -> Arc<dyn PayloadExtractor> {
        match self.kind {
            ParamKind::Path => Arc::new(PathExtractor::new()),
            ParamKind::Query => Arc::new(QueryExtractor::new()),
            ParamKind::Header => Arc::new(HeaderExtractor::new()),
            ParamKind::Cookie => Arc::new(CookieExtractor::new()),
            ParamKind::Body(BodyKind::Json) => {
                let mut extractor = JsonBodyExtractor::new();
                if let Some(max) = self.body.max_size {
                    extractor = extractor.max_size(max);
                }
                if let Some(decoder) = self.body.decoder {
                    extractor = extractor.decoder(decoder);
                }
                Arc::new(extractor)
            }
            ParamKind::Body(BodyKind::Form) => {
                let mut extractor = FormBodyExtractor::new();
                if let Some(max) = self.body.max_size {
                    extractor = extractor.max_size(max);
                }
                if let Some(sensitive) = self.body.attrs_case_sensitive {
                    extractor = extractor.attrs_case_sensitive(sensitive);
                }
                if let Some(as_array) = self.body.duplicated_attrs_as_array {
                    extractor = extractor.duplicated_attrs_as_array(as_array);
                }
                Arc::new(extractor)
            }
            ParamKind::Body(BodyKind::Multipart) => {
                let mut extractor = MultipartBodyExtractor::new();
                if let Some(max) = self.body.max_size {
                    extractor = extractor.max_size(max);
                }
                if let Some(sensitive) = self.body.attrs_case_sensitive {
                    extractor = extractor.attrs_case_sensitive(sensitive);
                }
                if let Some(as_array) = self.body.duplicated_attrs_as_array {
                    extractor = extractor.duplicated_attrs_as_array(as_array);
                }
                Arc::new(extractor)
            }
            ParamKind::Body(BodyKind::Bytes) => {
                let mut extractor = BytesBodyExtractor::new();
                if let Some(max) = self.body.max_size {
                    extractor = extractor.max_size(max);
                }
                Arc::new(extractor)
            }
            ParamKind::Body(BodyKind::Text) => {
                let mut extractor = TextBodyExtractor::new();
                if let Some(max) = self.body.max_size {
                    extractor = extractor.max_size(max);
                }
                Arc::new(extractor)
            }
            ParamKind::Body(BodyKind::Stream) => Arc::new(StreamBodyExtractor::new()),
        }
    }
}

impl From<Path> for ParamMarker {
    fn from(marker: Path) -> Self {
        Self {
            kind: ParamKind::Path,
            opts: marker.opts,
            body: BodyConfig::default(),
        }
    }
}

impl From<Query> for ParamMarker {
    fn from(marker: Query) -> Self {
        Self {
            kind: ParamKind::Query,
            opts: marker.opts,
            body: BodyConfig::default(),
        }
    }
}

impl From<Header> for ParamMarker {
    fn from(marker: Header) -> Self {
        Self {
            kind: ParamKind::Header,
            opts: marker.opts,
            body: BodyConfig::default(),
        }
    }
}

impl From<Cookie> for ParamMarker {
    fn from(marker: Cookie) -> Self {
        Self {
            kind: ParamKind::Cookie,
            opts: marker.opts,
            body: BodyConfig::default(),
        }
    }
}

impl From<JsonBody> for ParamMarker {
    fn from(marker: JsonBody) -> Self {
        Self {
            kind: ParamKind::Body(BodyKind::Json),
            opts: marker.opts,
            body: BodyConfig {
                max_size: marker.max_size,
                decoder: marker.decoder,
                ..BodyConfig::default()
            },
        }
    }
}

impl From<FormDataBody> for ParamMarker {
    fn from(marker: FormDataBody) -> Self {
        Self {
            kind: ParamKind::Body(BodyKind::Form),
            opts: marker.opts,
            body: BodyConfig {
                max_size: marker.max_size,
                attrs_case_sensitive: marker.attrs_case_sensitive,
                duplicated_attrs_as_array: marker.duplicated_attrs_as_array,
                ..BodyConfig::default()
            },
        }
    }
}

impl From<MultipartBody> for ParamMarker {
    fn from(marker: MultipartBody) -> Self {
        Self {
            kind: ParamKind::Body(BodyKind::Multipart),
            opts: marker.opts,
            body: BodyConfig {
                max_size: marker.max_size,
                attrs_case_sensitive: marker.attrs_case_sensitive,
                duplicated_attrs_as_array: marker.duplicated_attrs_as_array,
                ..BodyConfig::default()
            },
        }
    }
}

impl From<BytesBody> for ParamMarker {
    fn from(marker: BytesBody) -> Self {
        Self {
            kind: ParamKind::Body(BodyKind::Bytes),
            opts: marker.opts,
            body: BodyConfig {
                max_size: marker.max_size,
                ..BodyConfig::default()
            },
        }
    }
}

impl From<TextBody> for ParamMarker {
    fn from(marker: TextBody) -> Self {
        Self {
            kind: ParamKind::Body(BodyKind::Text),
            opts: marker.opts,
            body: BodyConfig {
                max_size: marker.max_size,
                ..BodyConfig::default()
            },
        }
    }
}

impl From<StreamBody> for ParamMarker {
    fn from(marker: StreamBody) -> Self {
        Self {
            kind: ParamKind::Body(BodyKind::Stream),
            opts: marker.opts,
            body: BodyConfig::default(),
        }
    }
}
