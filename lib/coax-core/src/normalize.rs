//! Payload normalization into the requested model shape.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{Envelope, Error, Result};

/// The shape a caller expects the payload to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelShape {
    /// One model.
    Single,
    /// An ordered list of models.
    List,
    /// Models grouped by key.
    KeyedMap,
}

/// A normalized payload, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped<T> {
    /// One model.
    Single(T),
    /// An ordered list of models.
    List(Vec<T>),
    /// Models grouped by key.
    KeyedMap(BTreeMap<String, Vec<T>>),
}

impl<T> Shaped<T> {
    /// The shape of this value.
    #[must_use]
    pub const fn shape(&self) -> ModelShape {
        match self {
            Self::Single(_) => ModelShape::Single,
            Self::List(_) => ModelShape::List,
            Self::KeyedMap(_) => ModelShape::KeyedMap,
        }
    }

    /// The single model, if this is [`Shaped::Single`].
    #[must_use]
    pub fn into_single(self) -> Option<T> {
        match self {
            Self::Single(value) => Some(value),
            _ => None,
        }
    }

    /// The list, if this is [`Shaped::List`].
    #[must_use]
    pub fn into_list(self) -> Option<Vec<T>> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// The map, if this is [`Shaped::KeyedMap`].
    #[must_use]
    pub fn into_keyed_map(self) -> Option<BTreeMap<String, Vec<T>>> {
        match self {
            Self::KeyedMap(map) => Some(map),
            _ => None,
        }
    }
}

/// Reshape an envelope's payload.
///
/// A non-zero code fails with [`Error::Business`] whatever the shape.
///
/// # Errors
///
/// See [`single`], [`list`] and [`keyed_map`] for the per-shape failures.
pub fn normalize<T, F>(envelope: Envelope, shape: ModelShape, construct: F) -> Result<Shaped<T>>
where
    F: Fn(&Value) -> Option<T>,
{
    let payload = envelope.into_payload()?;
    match shape {
        ModelShape::Single => single(payload, construct).map(Shaped::Single),
        ModelShape::List => Ok(Shaped::List(list(payload, construct))),
        ModelShape::KeyedMap => keyed_map(payload, construct).map(Shaped::KeyedMap),
    }
}

/// One model from the payload.
///
/// A non-empty array yields its first element, an object is used directly and
/// an absent payload reads as `{}`.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] for any other payload, or when the
/// constructor rejects it.
pub fn single<T, F>(payload: Option<Value>, construct: F) -> Result<T>
where
    F: Fn(&Value) -> Option<T>,
{
    let constructed = match &payload {
        None => construct(&Value::Object(Map::new())),
        Some(Value::Array(items)) => items.first().and_then(&construct),
        Some(object @ Value::Object(_)) => construct(object),
        Some(_) => None,
    };
    constructed.ok_or(Error::InvalidPayload(payload))
}

/// Models from the payload, dropping elements the constructor rejects.
///
/// An object with more than one key is tried as a single element.
pub fn list<T, F>(payload: Option<Value>, construct: F) -> Vec<T>
where
    F: Fn(&Value) -> Option<T>,
{
    match &payload {
        Some(Value::Array(items)) => items.iter().filter_map(construct).collect(),
        Some(object @ Value::Object(map)) if map.len() > 1 => {
            construct(object).into_iter().collect()
        }
        _ => Vec::new(),
    }
}

/// Models grouped by key.
///
/// Array entries are constructed element-wise, object entries as a single
/// element, and any other entry yields an empty list. An absent payload is an
/// empty map.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the payload is present but not an object.
pub fn keyed_map<T, F>(payload: Option<Value>, construct: F) -> Result<BTreeMap<String, Vec<T>>>
where
    F: Fn(&Value) -> Option<T>,
{
    let object = match payload {
        None => return Ok(BTreeMap::new()),
        Some(Value::Object(object)) => object,
        Some(_) => return Err(Error::Serialization),
    };

    let map = object
        .into_iter()
        .map(|(key, value)| {
            let values = match &value {
                Value::Array(items) => items.iter().filter_map(&construct).collect(),
                Value::Object(_) => construct(&value).into_iter().collect(),
                _ => Vec::new(),
            };
            (key, values)
        })
        .collect();
    Ok(map)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::ResponseKeys;

    fn id(value: &Value) -> Option<i64> {
        value.get("id").and_then(Value::as_i64)
    }

    fn anything(value: &Value) -> Option<Value> {
        Some(value.clone())
    }

    fn envelope(json: Value) -> Envelope {
        let_assert!(Ok(envelope) = Envelope::from_json(json, &ResponseKeys::default()));
        envelope
    }

    #[test]
    fn single_from_object_and_array() {
        check!(single(Some(json!({"id": 1})), id) == Ok(1));
        check!(single(Some(json!([{"id": 2}, {"id": 3}])), id) == Ok(2));
    }

    #[test]
    fn single_absent_reads_empty_object() {
        check!(single(None, anything) == Ok(json!({})));
        let_assert!(Err(Error::InvalidPayload(None)) = single(None, id));
    }

    #[test]
    fn single_rejects_scalars_and_empty_arrays() {
        let_assert!(Err(err) = single(Some(json!(3)), anything));
        check!(err == Error::invalid_payload(Some(json!(3))));

        let_assert!(Err(err) = single(Some(json!([])), anything));
        check!(err.payload() == Some(&json!([])));

        let_assert!(Err(Error::InvalidPayload(_)) = single(Some(json!({"bad": true})), id));
    }

    #[test]
    fn list_drops_rejected_elements() {
        let payload = json!([{"id": 1}, {"bad": true}, {"id": 3}]);
        check!(list(Some(payload), id) == vec![1, 3]);
    }

    #[test]
    fn list_multi_key_object_is_singleton() {
        check!(list(Some(json!({"id": 1, "name": "a"})), id) == vec![1]);
        check!(list(Some(json!({"id": 1})), id) == Vec::<i64>::new());
        check!(list(Some(json!({"name": "a", "x": 2})), id) == Vec::<i64>::new());
    }

    #[test]
    fn list_absent_or_scalar_is_empty() {
        check!(list(None, anything).is_empty());
        check!(list(Some(json!("x")), anything).is_empty());
    }

    #[test]
    fn keyed_map_groups() {
        let payload = json!({
            "a": [{"id": 1}, {"bad": 0}, {"id": 2}],
            "b": {"id": 3},
            "c": {"bad": 0},
            "d": 7,
        });
        let_assert!(Ok(map) = keyed_map(Some(payload), id));
        check!(map.get("a") == Some(&vec![1, 2]));
        check!(map.get("b") == Some(&vec![3]));
        check!(map.get("c") == Some(&vec![]));
        check!(map.get("d") == Some(&vec![]));
        check!(map.len() == 4);
    }

    #[test]
    fn keyed_map_absent_and_invalid() {
        check!(keyed_map(None, id) == Ok(BTreeMap::new()));
        let_assert!(Err(Error::Serialization) = keyed_map(Some(json!([1])), id));
    }

    #[test]
    fn business_error_for_every_shape() {
        let failed = json!({"code": 4, "message": "not found", "data": [{"id": 1}]});
        for shape in [ModelShape::Single, ModelShape::List, ModelShape::KeyedMap] {
            let_assert!(Err(err) = normalize(envelope(failed.clone()), shape, id));
            check!(err == Error::business(4, "not found"));
        }
    }

    #[test]
    fn normalize_tags_shape() {
        let ok = json!({"code": 0, "data": {"id": 1, "name": "a"}});
        let_assert!(Ok(shaped) = normalize(envelope(ok.clone()), ModelShape::Single, id));
        check!(shaped.shape() == ModelShape::Single);
        check!(shaped.into_single() == Some(1));

        let_assert!(Ok(shaped) = normalize(envelope(ok), ModelShape::List, id));
        check!(shaped.into_list() == Some(vec![1]));
    }
}
