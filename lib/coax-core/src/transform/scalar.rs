//! String, numeric and boolean transforms.

use std::marker::PhantomData;

use serde_json::{Number, Value};

use super::{FromConfig, Transform, present};
use crate::UrlConfig;

/// Any scalar as its string representation.
///
/// Numbers use their JSON form, booleans become `"true"`/`"false"`, arrays and
/// objects become compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTransform;

impl StringTransform {
    pub(crate) fn describe(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Transform for StringTransform {
    type Value = String;

    fn decode(&self, raw: Option<&Value>) -> Option<String> {
        present(raw).map(Self::describe)
    }

    fn encode(&self, value: Option<&String>) -> Option<Value> {
        value.map(|s| Value::String(s.clone()))
    }
}

/// Integers, from JSON numbers or numeral strings.
///
/// The target type defaults to `i64`; values out of range for the target decode to `None`.
#[derive(Debug, Clone, Copy)]
pub struct Int<T = i64>(PhantomData<T>);

impl<T> Default for Int<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> Int<T> {
    fn parse(value: &Value) -> Option<i128> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
                .or_else(|| n.as_f64().and_then(whole_number)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i128::from(*b)),
            _ => None,
        }
    }
}

/// A float with no fractional part, within the `i64`/`u64` range.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn whole_number(n: f64) -> Option<i128> {
    let range = -(2_f64.powi(63))..2_f64.powi(64);
    (n.fract() == 0.0 && range.contains(&n)).then_some(n as i128)
}

impl<T> Transform for Int<T>
where
    T: TryFrom<i128> + Copy,
    Value: From<T>,
{
    type Value = T;

    fn decode(&self, raw: Option<&Value>) -> Option<T> {
        present(raw)
            .and_then(Self::parse)
            .and_then(|n| T::try_from(n).ok())
    }

    fn encode(&self, value: Option<&T>) -> Option<Value> {
        value.map(|n| Value::from(*n))
    }
}

/// Parse an en-US numeral, tolerating `,` grouping separators.
fn parse_numeral(s: &str) -> Option<f64> {
    let s = s.trim();
    let parsed = s
        .parse::<f64>()
        .ok()
        .or_else(|| s.replace(',', "").parse::<f64>().ok())?;
    parsed.is_finite().then_some(parsed)
}

fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeral(s),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

fn float_value(n: f64) -> Option<Value> {
    Number::from_f64(n).map(Value::Number)
}

/// Single-precision floats, from JSON numbers or numeral strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl Transform for Float {
    type Value = f32;

    #[allow(clippy::cast_possible_truncation)]
    fn decode(&self, raw: Option<&Value>) -> Option<f32> {
        present(raw).and_then(parse_float).map(|n| n as f32)
    }

    fn encode(&self, value: Option<&f32>) -> Option<Value> {
        value.and_then(|n| float_value(f64::from(*n)))
    }
}

/// Double-precision floats, from JSON numbers or numeral strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Double;

impl Transform for Double {
    type Value = f64;

    fn decode(&self, raw: Option<&Value>) -> Option<f64> {
        present(raw).and_then(parse_float)
    }

    fn encode(&self, value: Option<&f64>) -> Option<Value> {
        value.and_then(|n| float_value(*n))
    }
}

/// Permissive booleans.
///
/// Native booleans pass through, integers are `true` when positive, strings
/// are `true` unless exactly `"0"`, and any other present value (fractional
/// numbers included) is `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolTransform;

impl Transform for BoolTransform {
    type Value = bool;

    fn decode(&self, raw: Option<&Value>) -> Option<bool> {
        present(raw).map(|value| match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64().is_none_or(|n| n > 0),
            Value::String(s) => s != "0",
            _ => true,
        })
    }

    fn encode(&self, value: Option<&bool>) -> Option<Value> {
        value.map(|b| Value::from(u8::from(*b)))
    }
}

macro_rules! from_default_config {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConfig for $ty {
                fn from_config(_config: &UrlConfig) -> Self {
                    Self::default()
                }
            }
        )*
    };
}

from_default_config!(StringTransform, Float, Double, BoolTransform);

impl<T> FromConfig for Int<T> {
    fn from_config(_config: &UrlConfig) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    #[test]
    fn string_from_scalars() {
        let t = StringTransform;
        check!(t.decode(Some(&json!("abc"))) == Some("abc".to_string()));
        check!(t.decode(Some(&json!(12))) == Some("12".to_string()));
        check!(t.decode(Some(&json!(1.5))) == Some("1.5".to_string()));
        check!(t.decode(Some(&json!(true))) == Some("true".to_string()));
        check!(t.decode(Some(&json!([1, 2]))) == Some("[1,2]".to_string()));
        check!(t.decode(None) == None);
    }

    #[test]
    fn int_from_numbers_and_strings() {
        let t = Int::<i64>::default();
        check!(t.decode(Some(&json!(7))) == Some(7));
        check!(t.decode(Some(&json!("7"))) == Some(7));
        check!(t.decode(Some(&json!(" -3 "))) == Some(-3));
        check!(t.decode(Some(&json!("7.5"))) == None);
        check!(t.decode(Some(&json!(7.5))) == None);
        check!(t.decode(Some(&json!(7.0))) == Some(7));
        check!(t.decode(Some(&json!(-2.0))) == Some(-2));
        check!(t.decode(Some(&json!(1e30))) == None);
        check!(t.decode(Some(&json!("seven"))) == None);
        check!(t.decode(Some(&json!({}))) == None);
    }

    #[test]
    fn int_out_of_range_for_target() {
        check!(Int::<u32>::default().decode(Some(&json!(-1))) == None);
        check!(Int::<i32>::default().decode(Some(&json!("4294967296"))) == None);
        check!(Int::<u64>::default().decode(Some(&json!("12"))) == Some(12));
        check!(Int::<u64>::default().decode(Some(&json!(u64::MAX))) == Some(u64::MAX));
        check!(Int::<i64>::default().decode(Some(&json!(u64::MAX))) == None);
        check!(Int::<u32>::default().decode(Some(&json!(3.0))) == Some(3));
    }

    #[test]
    fn int_round_trip() {
        let t = Int::<i64>::default();
        let raw = json!(1234);
        check!(t.encode(t.decode(Some(&raw)).as_ref()) == Some(raw));
    }

    #[test]
    fn float_and_double() {
        check!(Double.decode(Some(&json!("12.5"))) == Some(12.5));
        check!(Double.decode(Some(&json!("1,234.5"))) == Some(1234.5));
        check!(Double.decode(Some(&json!(3))) == Some(3.0));
        check!(Double.decode(Some(&json!("NaN"))) == None);
        check!(Double.decode(Some(&json!("inf"))) == None);
        check!(Double.decode(Some(&json!("abc"))) == None);
        check!(Float.decode(Some(&json!("0.25"))) == Some(0.25_f32));
        check!(Float.encode(Some(&0.5)) == Some(json!(0.5)));
    }

    #[test]
    fn bool_permissive_rules() {
        let t = BoolTransform;
        check!(t.decode(Some(&json!(0))) == Some(false));
        check!(t.decode(Some(&json!(1))) == Some(true));
        check!(t.decode(Some(&json!(-2))) == Some(false));
        check!(t.decode(Some(&json!(u64::MAX))) == Some(true));
        check!(t.decode(Some(&json!(-0.5))) == Some(true));
        check!(t.decode(Some(&json!(0.5))) == Some(true));
        check!(t.decode(Some(&json!("0"))) == Some(false));
        check!(t.decode(Some(&json!("anything-else"))) == Some(true));
        check!(t.decode(Some(&json!("false"))) == Some(true));
        check!(t.decode(Some(&json!(false))) == Some(false));
        check!(t.decode(Some(&json!([]))) == Some(true));
        check!(t.decode(None) == None);
    }

    #[test]
    fn bool_encodes_as_int() {
        check!(BoolTransform.encode(Some(&true)) == Some(json!(1)));
        check!(BoolTransform.encode(Some(&false)) == Some(json!(0)));
        check!(BoolTransform.encode(None) == None);
    }
}
