//! Raw payload extraction for talaria.
//!
//! This crate turns one HTTP request into the raw, unvalidated data
//! each parameter location carries: path captures, query pairs,
//! headers, cookies, and the five body flavors (JSON, urlencoded
//! form, multipart, raw bytes, UTF-8 text, chunked stream).
//!
//! Extraction is separated from validation on purpose: a
//! [`PayloadExtractor`] runs at most once per request location thanks
//! to the per-request [`ExtractCache`], and the binding layer then
//! validates individual fields against the shared raw payload.
//!
//! # Example
//!
//! ```rust
//! use talaria_extract::{PayloadExtractor, QueryExtractor, RequestPartsBuilder};
//! use http::{Method, Uri};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let parts = RequestPartsBuilder::new()
//!     .method(Method::GET)
//!     .uri(Uri::from_static("/search?q=rust"))
//!     .build();
//!
//! let payload = QueryExtractor::new().extract(&parts).await.unwrap();
//! assert_eq!(payload.field("q"), Some("rust".into()));
//! # }
//! ```

mod body;
mod cache;
mod cookie;
mod error;
mod extractor;
mod form;
mod header;
mod json;
mod multipart;
mod parts;
mod path;
mod path_params;
mod payload;
mod query;

pub use body::{BytesBodyExtractor, StreamBodyExtractor, TextBodyExtractor};
pub use cache::ExtractCache;
pub use cookie::CookieExtractor;
pub use error::{ExtractError, ExtractResult};
pub use extractor::PayloadExtractor;
pub use form::FormBodyExtractor;
pub use header::HeaderExtractor;
pub use json::{JsonBodyExtractor, JsonDecoder};
pub use multipart::MultipartBodyExtractor;
pub use parts::{RequestParts, RequestPartsBuilder};
pub use path::PathExtractor;
pub use path_params::PathParams;
pub use payload::{BodyStream, RawPayload};
pub use query::QueryExtractor;
