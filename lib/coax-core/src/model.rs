//! Typed models built from payload JSON.
//!
//! A [`Model`] is usually derived with `#[derive(Model)]`; the helpers in this
//! module are what the generated code calls into.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::UrlConfig;
use crate::transform::{Coerce, coerce, present, uncoerce};

/// A type that can be built from, and written back to, payload JSON.
///
/// `from_json` is total: it returns `None` rather than failing when the JSON
/// does not fit.
///
/// # Example
///
/// ```
/// use coax_core::transform::field;
/// use coax_core::{Model, UrlConfig};
/// use serde_json::{Value, json};
///
/// struct User {
///     id: i64,
/// }
///
/// impl Model for User {
///     fn from_json(json: &Value, _config: &UrlConfig) -> Option<Self> {
///         Some(Self { id: field(json, "id")? })
///     }
///
///     fn to_json(&self, _config: &UrlConfig) -> Value {
///         json!({"id": self.id})
///     }
/// }
/// ```
pub trait Model: Sized {
    /// Build the model, or `None` if the JSON does not fit.
    fn from_json(json: &Value, config: &UrlConfig) -> Option<Self>;

    /// Write the model back to JSON.
    fn to_json(&self, config: &UrlConfig) -> Value;
}

impl Model for Value {
    fn from_json(json: &Value, _config: &UrlConfig) -> Option<Self> {
        Some(json.clone())
    }

    fn to_json(&self, _config: &UrlConfig) -> Value {
        self.clone()
    }
}

/// Model constructor for any `serde` deserializable type.
///
/// Mismatches are logged with the JSON path of the offending field.
///
/// ```
/// use coax_core::serde_model;
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let user: Option<User> = serde_model(&json!({"name": "Alice"}));
/// assert_eq!(user, Some(User { name: "Alice".to_string() }));
/// assert_eq!(serde_model::<User>(&json!({"name": 3})), None);
/// ```
#[must_use]
pub fn serde_model<T: DeserializeOwned>(json: &Value) -> Option<T> {
    serde_path_to_error::deserialize(json)
        .map_err(|err| {
            debug!(path = %err.path(), error = %err.inner(), "payload does not match model");
        })
        .ok()
}

/// Decode a nested model; absent and `null` values yield `None`.
#[must_use]
pub fn nested<T: Model>(raw: Option<&Value>, config: &UrlConfig) -> Option<T> {
    present(raw).and_then(|json| T::from_json(json, config))
}

/// Decode a list of nested models, dropping elements that do not fit.
///
/// Anything but an array yields an empty list.
#[must_use]
pub fn nested_list<T: Model>(raw: Option<&Value>, config: &UrlConfig) -> Vec<T> {
    match present(raw) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| T::from_json(item, config))
            .collect(),
        _ => Vec::new(),
    }
}

/// Encode a list of nested models.
#[must_use]
pub fn nested_list_to_json<T: Model>(values: &[T], config: &UrlConfig) -> Value {
    values.iter().map(|value| value.to_json(config)).collect()
}

/// Decode a list of scalars with their default transform.
///
/// A lone scalar reads as a one-element list; elements that do not coerce are
/// dropped.
#[must_use]
pub fn coerce_list<T: Coerce>(raw: Option<&Value>) -> Vec<T> {
    match present(raw) {
        Some(Value::Array(items)) => items.iter().filter_map(|item| coerce(Some(item))).collect(),
        Some(scalar) => coerce(Some(scalar)).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Encode a list of scalars with their default transform.
#[must_use]
pub fn uncoerce_list<T: Coerce>(values: &[T]) -> Value {
    values.iter().filter_map(uncoerce).collect()
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde::Deserialize;
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::transform::field;

    #[derive(Debug, PartialEq)]
    struct Tag {
        name: String,
    }

    impl Model for Tag {
        fn from_json(json: &Value, _config: &UrlConfig) -> Option<Self> {
            Some(Self {
                name: field(json, "name")?,
            })
        }

        fn to_json(&self, _config: &UrlConfig) -> Value {
            json!({"name": self.name})
        }
    }

    fn config() -> UrlConfig {
        UrlConfig::builder(Url::parse("https://api.test/").expect("valid url")).build()
    }

    #[test]
    fn value_is_identity_model() {
        let json = json!({"a": [1, 2]});
        check!(Value::from_json(&json, &config()) == Some(json.clone()));
        check!(json.to_json(&config()) == json);
    }

    #[test]
    fn serde_model_reports_mismatch_as_none() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        check!(serde_model(&json!({"x": 1, "y": 2})) == Some(Point { x: 1, y: 2 }));
        check!(serde_model::<Point>(&json!({"x": 1})) == None);
        check!(serde_model::<Point>(&json!([1, 2, 3])) == None);
    }

    #[test]
    fn nested_models() {
        let config = config();
        let tag = Tag { name: "a".into() };
        check!(nested::<Tag>(Some(&json!({"name": "a"})), &config) == Some(tag));
        check!(nested::<Tag>(Some(&Value::Null), &config) == None);
        check!(nested::<Tag>(None, &config) == None);
    }

    #[test]
    fn nested_list_drops_misfits() {
        let config = config();
        let raw = json!([{"name": "a"}, {"other": 1}, {"name": "b"}]);
        let tags: Vec<Tag> = nested_list(Some(&raw), &config);
        check!(tags == vec![Tag { name: "a".into() }, Tag { name: "b".into() }]);
        check!(nested_list_to_json(&tags, &config) == json!([{"name": "a"}, {"name": "b"}]));
        check!(nested_list::<Tag>(Some(&json!({"name": "a"})), &config).is_empty());
    }

    #[test]
    fn scalar_lists() {
        check!(coerce_list::<i64>(Some(&json!(["1", 2, "x"]))) == vec![1, 2]);
        check!(coerce_list::<String>(Some(&json!("solo"))) == vec!["solo".to_string()]);
        check!(coerce_list::<bool>(None).is_empty());
        check!(uncoerce_list(&[true, false]) == json!([1, 0]));
    }
}
