//! The reserved keys of the document and the glue between scalars and JSON.
//!
//! The document itself is a [`serde_json::Value`]; object keys keep their
//! insertion order.

use serde_json::{Map, Number, Value};
use vc_reflect::ops::Scalar;

// -----------------------------------------------------------------------------
// Reserved keys

/// The path of an enveloped node.
pub const INFO_KEY: &str = "@@info@@";
/// The type identifier of a node whose type cannot be inferred.
pub const TYPE_KEY: &str = "@@type@@";
/// The payload of an envelope.
pub const VALUE_KEY: &str = "@@value@@";
/// The path of an object written earlier.
pub const REFERENCE_KEY: &str = "@@reference@@";
/// The lower bounds of an array.
pub const LOWER_BOUNDS_KEY: &str = "@@lower_bounds@@";
/// The hash state of a map with a custom comparison policy.
pub const COMPARER_KEY: &str = "comparer";

/// The key of a map entry's key in a pair record.
pub const PAIR_KEY: &str = "Key";
/// The key of a map entry's value in a pair record.
pub const PAIR_VALUE: &str = "Value";

/// Keys that never hold a member or a bag entry.
pub const ENVELOPE_KEYS: [&str; 5] = [INFO_KEY, TYPE_KEY, VALUE_KEY, REFERENCE_KEY, LOWER_BOUNDS_KEY];

/// Returns `true` if `key` is reserved for the envelope.
#[inline]
pub fn is_envelope_key(key: &str) -> bool {
    ENVELOPE_KEYS.contains(&key)
}

// -----------------------------------------------------------------------------
// Scalars

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

/// Converts a scalar to JSON.
///
/// JSON has no representation for non-finite numbers; they are written as
/// the strings `"NaN"`, `"Infinity"` and `"-Infinity"`, which the float types
/// parse back.
pub fn scalar_to_json(scalar: Scalar) -> Value {
    match scalar {
        Scalar::Bool(v) => Value::Bool(v),
        Scalar::Char(c) => Value::String(c.to_string()),
        Scalar::Int(v) => Value::Number(Number::from(v)),
        Scalar::UInt(v) => Value::Number(Number::from(v)),
        Scalar::Float(v) => match Number::from_f64(v) {
            Some(number) => Value::Number(number),
            None if v.is_nan() => Value::String(NAN.to_owned()),
            None if v > 0.0 => Value::String(INFINITY.to_owned()),
            None => Value::String(NEG_INFINITY.to_owned()),
        },
        Scalar::Str(s) => Value::String(s),
    }
}

/// Converts a JSON leaf to a scalar, `None` for null, arrays and objects.
pub fn json_to_scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::Bool(v) => Some(Scalar::Bool(*v)),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(Scalar::UInt(v))
            } else if let Some(v) = n.as_i64() {
                Some(Scalar::Int(v))
            } else {
                n.as_f64().map(Scalar::Float)
            }
        }
        Value::String(s) => Some(Scalar::Str(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The name of the JSON kind of a value, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// -----------------------------------------------------------------------------
// Envelope

/// Starts an enveloped object: `@@info@@` first, then `@@type@@` if given.
pub fn envelope(path: String, type_identifier: Option<String>) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(INFO_KEY.to_owned(), Value::String(path));
    if let Some(identifier) = type_identifier {
        object.insert(TYPE_KEY.to_owned(), Value::String(identifier));
    }
    object
}

/// Returns the string stored under `key` of an object node.
#[inline]
pub fn get_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.as_object()?.get(key)?.as_str()
}

// -----------------------------------------------------------------------------
// Tests
