//! Bound handler values.
//!
//! After a request passes validation, every declared parameter has a
//! value keyed by its handler name in a [`BoundValues`] map. Validated
//! parameters hold normalized JSON; raw body parameters hold bytes,
//! text, or a stream.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use talaria_extract::{BodyStream, RequestParts};
use thiserror::Error;

/// One bound parameter value.
#[derive(Debug, Clone)]
pub enum BoundValue {
    /// A validated (or passthrough) JSON value.
    Json(Value),
    /// A raw bytes body.
    Bytes(Bytes),
    /// A raw text body.
    Text(String),
    /// A chunked body stream.
    Stream(BodyStream),
    /// The raw request object, injected for a request-claiming
    /// parameter.
    Request(RequestParts),
}

/// An error accessing a bound value.
#[derive(Debug, Error)]
pub enum BindError {
    /// No parameter with this name was declared.
    #[error("no bound parameter named `{0}`")]
    Unknown(String),
    /// The parameter exists but holds a different value shape.
    #[error("bound parameter `{name}` is not {expected}")]
    WrongShape {
        /// The parameter name.
        name: String,
        /// What the caller asked for.
        expected: &'static str,
    },
    /// The stored JSON does not deserialize into the requested type.
    #[error("bound parameter `{name}`: {source}")]
    Deserialize {
        /// The parameter name.
        name: String,
        /// Underlying deserialization failure.
        source: serde_json::Error,
    },
}

/// The validated values for one request, keyed by parameter name.
///
/// Insertion order follows declaration order on the handler.
#[derive(Debug, Clone, Default)]
pub struct BoundValues {
    values: IndexMap<String, BoundValue>,
}

impl BoundValues {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: BoundValue) {
        self.values.insert(name, value);
    }

    pub(crate) fn extend(&mut self, other: IndexMap<String, BoundValue>) {
        self.values.extend(other);
    }

    /// Returns the number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameters were bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw bound value for a parameter.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&BoundValue> {
        self.values.get(name)
    }

    /// Deserializes a validated parameter into `T`.
    ///
    /// # Errors
    ///
    /// Fails when the parameter is unknown, holds a raw body instead
    /// of JSON, or does not deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, BindError> {
        match self.values.get(name) {
            None => Err(BindError::Unknown(name.to_string())),
            Some(BoundValue::Json(value)) => {
                serde_json::from_value(value.clone()).map_err(|source| BindError::Deserialize {
                    name: name.to_string(),
                    source,
                })
            }
            Some(_) => Err(BindError::WrongShape {
                name: name.to_string(),
                expected: "a JSON value",
            }),
        }
    }

    /// Returns a raw bytes body parameter.
    ///
    /// # Errors
    ///
    /// Fails when the parameter is unknown or does not hold bytes.
    pub fn bytes(&self, name: &str) -> Result<Bytes, BindError> {
        match self.values.get(name) {
            None => Err(BindError::Unknown(name.to_string())),
            Some(BoundValue::Bytes(bytes)) => Ok(bytes.clone()),
            Some(_) => Err(BindError::WrongShape {
                name: name.to_string(),
                expected: "raw bytes",
            }),
        }
    }

    /// Returns a raw text body parameter.
    ///
    /// # Errors
    ///
    /// Fails when the parameter is unknown or does not hold text.
    pub fn text(&self, name: &str) -> Result<&str, BindError> {
        match self.values.get(name) {
            None => Err(BindError::Unknown(name.to_string())),
            Some(BoundValue::Text(text)) => Ok(text),
            Some(_) => Err(BindError::WrongShape {
                name: name.to_string(),
                expected: "text",
            }),
        }
    }

    /// Returns a body stream parameter.
    ///
    /// The returned stream starts from the beginning of the body.
    ///
    /// # Errors
    ///
    /// Fails when the parameter is unknown or does not hold a stream.
    pub fn stream(&self, name: &str) -> Result<BodyStream, BindError> {
        match self.values.get(name) {
            None => Err(BindError::Unknown(name.to_string())),
            Some(BoundValue::Stream(stream)) => Ok(stream.clone()),
            Some(_) => Err(BindError::WrongShape {
                name: name.to_string(),
                expected: "a body stream",
            }),
        }
    }

    /// Returns an injected request-object parameter.
    ///
    /// # Errors
    ///
    /// Fails when the parameter is unknown or does not hold the
    /// request object.
    pub fn request(&self, name: &str) -> Result<&RequestParts, BindError> {
        match self.values.get(name) {
            None => Err(BindError::Unknown(name.to_string())),
            Some(BoundValue::Request(parts)) => Ok(parts),
            Some(_) => Err(BindError::WrongShape {
                name: name.to_string(),
                expected: "the request object",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_access() {
        let mut values = BoundValues::new();
        values.insert("age".into(), BoundValue::Json(json!(30)));
        values.insert("name".into(), BoundValue::Json(json!("alice")));

        assert_eq!(values.get::<u32>("age").unwrap(), 30);
        assert_eq!(values.get::<String>("name").unwrap(), "alice");
        assert!(values.get::<u32>("name").is_err());
        assert!(matches!(
            values.get::<u32>("missing"),
            Err(BindError::Unknown(_))
        ));
    }

    #[test]
    fn test_optional_parameter_binds_none() {
        let mut values = BoundValues::new();
        values.insert("limit".into(), BoundValue::Json(Value::Null));
        assert_eq!(values.get::<Option<u32>>("limit").unwrap(), None);
    }

    #[test]
    fn test_raw_access() {
        let mut values = BoundValues::new();
        values.insert("data".into(), BoundValue::Bytes(Bytes::from_static(b"ab")));
        values.insert("note".into(), BoundValue::Text("hello".into()));

        assert_eq!(values.bytes("data").unwrap(), Bytes::from_static(b"ab"));
        assert_eq!(values.text("note").unwrap(), "hello");
        assert!(matches!(
            values.bytes("note"),
            Err(BindError::WrongShape { .. })
        ));
    }

    #[test]
    fn test_preserves_declaration_order() {
        let mut values = BoundValues::new();
        values.insert("b".into(), BoundValue::Json(json!(1)));
        values.insert("a".into(), BoundValue::Json(json!(2)));
        let names: Vec<&str> = values.values.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
