//! Field transforms between loosely-typed JSON and typed fields.
//!
//! Servers are not consistent about scalar types: numbers arrive as strings,
//! booleans as integers, dates as epoch seconds or milliseconds or formatted
//! strings, and single values are sometimes wrapped in a one-element array.
//! Each [`Transform`] absorbs one of these families.
//!
//! Transforms never fail loudly: `decode` returns `None` when the field is
//! absent or unusable, and JSON `null` counts as absent.
//!
//! # Type-directed selection
//!
//! [`Coerce`] picks the default transform for a Rust type, so most fields can
//! be read with [`field`]:
//!
//! ```
//! use coax_core::transform::field;
//! use serde_json::json;
//!
//! let json = json!({"id": "42", "active": 1, "price": "12.5"});
//! assert_eq!(field::<i64>(&json, "id"), Some(42));
//! assert_eq!(field::<bool>(&json, "active"), Some(true));
//! assert_eq!(field::<f64>(&json, "price"), Some(12.5));
//! ```
//!
//! Transforms that need configuration (picture prefixes) implement
//! [`FromConfig`] and are used explicitly.

mod date;
mod image;
mod scalar;
mod url;

use serde_json::Value;

use crate::UrlConfig;

pub use self::date::DateTransform;
pub use self::image::{Base64Image, Image};
pub use self::scalar::{BoolTransform, Double, Float, Int, StringTransform};
pub use self::url::{PictureList, PictureUrl, UrlTransform};

/// A bidirectional converter between a raw JSON value and a typed field.
pub trait Transform {
    /// The typed field value.
    type Value;

    /// Decode a raw JSON value. `None` means absent or unusable.
    fn decode(&self, raw: Option<&Value>) -> Option<Self::Value>;

    /// Encode a typed value back to JSON.
    fn encode(&self, value: Option<&Self::Value>) -> Option<Value>;
}

/// Transforms that can be built from the process configuration.
pub trait FromConfig {
    /// Build the transform.
    fn from_config(config: &UrlConfig) -> Self;
}

/// Associates a Rust type with its default transform.
pub trait Coerce: Sized {
    /// The transform used for this type.
    type Transform: Transform<Value = Self> + Default;
}

/// Decode a raw value with the default transform for `T`.
#[must_use]
pub fn coerce<T: Coerce>(raw: Option<&Value>) -> Option<T> {
    T::Transform::default().decode(raw)
}

/// Encode a value with the default transform for `T`.
#[must_use]
pub fn uncoerce<T: Coerce>(value: &T) -> Option<Value> {
    T::Transform::default().encode(Some(value))
}

/// Read and decode `json[key]` with the default transform for `T`.
#[must_use]
pub fn field<T: Coerce>(json: &Value, key: &str) -> Option<T> {
    coerce(json.get(key))
}

/// Treat JSON `null` as absent.
pub(crate) fn present(raw: Option<&Value>) -> Option<&Value> {
    raw.filter(|value| !value.is_null())
}

/// A string, or the first element of an array when it is a string.
pub(crate) fn first_string(raw: Option<&Value>) -> Option<&str> {
    match present(raw)? {
        Value::String(s) => Some(s),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    }
}

macro_rules! coerce_with {
    ($($ty:ty => $transform:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                type Transform = $transform;
            }
        )*
    };
}

coerce_with! {
    i64 => Int<i64>,
    i32 => Int<i32>,
    u32 => Int<u32>,
    u64 => Int<u64>,
    f32 => Float,
    f64 => Double,
    bool => BoolTransform,
    String => StringTransform,
    ::url::Url => UrlTransform,
    ::time::OffsetDateTime => DateTransform,
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    #[test]
    fn null_is_absent() {
        check!(present(Some(&Value::Null)) == None);
        check!(coerce::<i64>(Some(&Value::Null)) == None);
        check!(coerce::<String>(Some(&Value::Null)) == None);
        check!(coerce::<bool>(None) == None);
    }

    #[test]
    fn first_string_unwraps_singleton() {
        check!(first_string(Some(&json!("a"))) == Some("a"));
        check!(first_string(Some(&json!(["a", "b"]))) == Some("a"));
        check!(first_string(Some(&json!([]))) == None);
        check!(first_string(Some(&json!([1]))) == None);
        check!(first_string(Some(&json!(1))) == None);
    }

    #[test]
    fn field_reads_by_key() {
        let json = json!({"count": "3", "name": 12});
        check!(field::<u32>(&json, "count") == Some(3));
        check!(field::<String>(&json, "name") == Some("12".to_string()));
        check!(field::<i64>(&json, "missing") == None);
    }

    #[test]
    fn uncoerce_uses_default_transform() {
        check!(uncoerce(&true) == Some(json!(1)));
        check!(uncoerce(&42_i64) == Some(json!(42)));
        check!(uncoerce(&"x".to_string()) == Some(json!("x")));
    }
}
