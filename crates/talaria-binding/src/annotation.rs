//! Handler parameter type annotations.
//!
//! An [`Annotation`] captures what a handler declares about one
//! parameter: the target type, whether the whole payload or a single
//! attribute is expected, and whether the parameter accepts `None`.
//! The target type is fixed at construction, so the checker closure is
//! monomorphized once per declared type rather than resolved through
//! reflection at request time.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// How an annotated type maps onto raw payload data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single value: number, string, bool, or a list thereof.
    Scalar,
    /// A structured model deserialized from a whole object.
    Model,
    /// No deserialization target: bytes, text, or a stream.
    Raw,
}

type Checker = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// A handler parameter's declared type.
///
/// # Example
///
/// ```rust
/// use talaria_binding::Annotation;
/// use serde_json::json;
///
/// let ann = Annotation::of::<u32>();
/// assert_eq!(ann.check(&json!(42)).unwrap(), json!(42));
/// // Raw string values coerce when the target type accepts them.
/// assert_eq!(ann.check(&json!("42")).unwrap(), json!(42));
/// assert!(ann.check(&json!("not a number")).is_err());
/// ```
#[derive(Clone)]
pub struct Annotation {
    type_name: &'static str,
    shape: Shape,
    optional: bool,
    checker: Checker,
}

impl Annotation {
    /// Declares a scalar parameter of type `T`.
    #[must_use]
    pub fn of<T: DeserializeOwned + 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            shape: Shape::Scalar,
            optional: false,
            checker: Arc::new(check_as::<T>),
        }
    }

    /// Declares a structured model parameter of type `T`.
    #[must_use]
    pub fn model<T: DeserializeOwned + 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            shape: Shape::Model,
            optional: false,
            checker: Arc::new(check_as::<T>),
        }
    }

    /// Declares a raw parameter with no deserialization target.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            type_name: "raw",
            shape: Shape::Raw,
            optional: false,
            checker: Arc::new(|value| Ok(value.clone())),
        }
    }

    /// Marks the parameter as accepting `None`.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns the declared type's name, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns how the type maps onto raw payload data.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns `true` if the parameter accepts `None`.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Checks a raw value against the declared type.
    ///
    /// On success returns the normalized value, which may differ from
    /// the input when a raw string was coerced (query and path values
    /// arrive as strings even for numeric targets). An optional
    /// parameter accepts `null` unconditionally.
    pub fn check(&self, value: &Value) -> Result<Value, String> {
        if self.optional && value.is_null() {
            return Ok(Value::Null);
        }
        (self.checker)(value)
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotation")
            .field("type_name", &self.type_name)
            .field("shape", &self.shape)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

fn check_as<T: DeserializeOwned>(value: &Value) -> Result<Value, String> {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(_) => Ok(value.clone()),
        Err(primary) => {
            // Values from string locations (path, query, headers,
            // cookies, forms) arrive as strings; retry after parsing
            // the string content as JSON so "42" satisfies u32.
            if let Value::String(text) = value {
                if let Ok(parsed) = serde_json::from_str::<Value>(text) {
                    if serde_json::from_value::<T>(parsed.clone()).is_ok() {
                        return Ok(parsed);
                    }
                }
            }
            Err(primary.to_string())
        }
    }
}
