//! # Talaria
//!
//! Declarative request parameter binding and validation for HTTP
//! handlers. Parameters are declared once with a type annotation and a
//! location marker; per request, talaria extracts each location at
//! most once, validates every declared parameter, and either hands the
//! handler its typed values or answers 422 with a structured list of
//! everything that went wrong.
//!
//! The workspace is split in three layers, re-exported here:
//!
//! - [`core`]: parameter kinds, definition errors, validation issues.
//! - [`extract`]: one payload extractor per request location, plus the
//!   per-request extraction cache.
//! - [`binding`]: annotations, markers, field descriptors, and the
//!   validator driving it all.
//!
//! # Example
//!
//! ```rust
//! use talaria::{Annotation, HandlerBindingBuilder, JsonBody, Path, RequestValidator};
//! use talaria::extract::RequestPartsBuilder;
//! use http::{Method, Uri};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct NewPost {
//!     title: String,
//!     draft: bool,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let binding = HandlerBindingBuilder::new("create_post")
//!     .param("blog_id", Annotation::of::<u64>(), Path::new())?
//!     .param("post", Annotation::model::<NewPost>(), JsonBody::new())?
//!     .build();
//!
//! let parts = RequestPartsBuilder::new()
//!     .method(Method::POST)
//!     .uri(Uri::from_static("/blogs/9/posts"))
//!     .path_param("blog_id", "9")
//!     .header("content-type", "application/json")
//!     .body(r#"{"title": "Hello", "draft": true}"#)
//!     .build();
//!
//! let values = RequestValidator::new().run(&binding, &parts).await.unwrap();
//! let post: NewPost = values.get("post")?;
//! assert_eq!(post.title, "Hello");
//! assert_eq!(values.get::<u64>("blog_id")?, 9);
//! # Ok(())
//! # }
//! ```

pub use talaria_binding::{
    Annotation, BindError, BoundValue, BoundValues, BytesBody, Cookie, FormDataBody,
    HandlerBinding, HandlerBindingBuilder, Header, JsonBody, MultipartBody, ParamMarker, Path,
    Query, RequestValidator, Shape, StreamBody, TextBody, ValidationFailure,
    DEFAULT_ERRORS_FIELD,
};
pub use talaria_core::{
    BodyKind, DefinitionError, DefinitionResult, KindSlot, ParamKind, ValidationIssue,
};

/// Shared vocabulary: kinds, definition errors, validation issues.
pub mod core {
    pub use talaria_core::*;
}

/// Payload extraction: request view, extractors, per-request cache.
pub mod extract {
    pub use talaria_extract::*;
}

/// Binding internals: annotations, markers, fields, units, validator.
pub mod binding {
    pub use talaria_binding::*;
}
