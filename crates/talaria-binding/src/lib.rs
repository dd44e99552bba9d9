//! Handler parameter binding and validation for talaria.
//!
//! This crate compiles a handler's parameter declarations into a
//! [`HandlerBinding`] and runs it per request:
//!
//! 1. Each parameter is declared with an [`Annotation`] (its type) and
//!    a location marker ([`Path`], [`Query`], [`Header`], [`Cookie`],
//!    or one of the body markers). Ill-formed declarations are
//!    rejected at registration time with a
//!    [`DefinitionError`](talaria_core::DefinitionError).
//! 2. Parameters sharing an extraction slot are grouped into a
//!    [`ValidationUnit`], so each request location is extracted once.
//! 3. Per request, [`RequestValidator`] produces either the typed
//!    [`BoundValues`] or a 422 failure listing every issue.
//!
//! # Example
//!
//! ```rust
//! use talaria_binding::{
//!     Annotation, HandlerBindingBuilder, Path, Query, RequestValidator,
//! };
//! use talaria_extract::RequestPartsBuilder;
//! use http::{Method, Uri};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let binding = HandlerBindingBuilder::new("get_user")
//!     .param("user_id", Annotation::of::<u64>(), Path::new())?
//!     .param("verbose", Annotation::of::<bool>().optional(), Query::new())?
//!     .build();
//!
//! let parts = RequestPartsBuilder::new()
//!     .method(Method::GET)
//!     .uri(Uri::from_static("/users/42"))
//!     .path_param("user_id", "42")
//!     .build();
//!
//! let values = RequestValidator::new().run(&binding, &parts).await.unwrap();
//! assert_eq!(values.get::<u64>("user_id")?, 42);
//! assert_eq!(values.get::<Option<bool>>("verbose")?, None);
//! # Ok(())
//! # }
//! ```

mod annotation;
mod binding;
mod field;
mod markers;
mod unit;
mod validator;
mod values;

pub use annotation::{Annotation, Shape};
pub use binding::{HandlerBinding, HandlerBindingBuilder};
pub use field::FieldSpec;
pub use markers::{
    BytesBody, Cookie, DefaultFactory, FormDataBody, Header, JsonBody, MultipartBody, ParamMarker,
    Path, Query, StreamBody, TextBody,
};
pub use unit::{UnitConflict, ValidationUnit};
pub use validator::{RequestValidator, ValidationFailure, DEFAULT_ERRORS_FIELD};
pub use values::{BindError, BoundValue, BoundValues};
