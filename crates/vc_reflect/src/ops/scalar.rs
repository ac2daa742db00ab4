use std::fmt;

use crate::Reflect;
use crate::info::Typed;
use crate::ops::ReflectError;

// -----------------------------------------------------------------------------
// Scalar

/// A scalar or text value, detached from its concrete Rust type.
///
/// Elementary types expose their value as a `Scalar` and are built back
/// from one through [`Elementary::from_scalar`], which coerces between
/// representations where the conversion is lossless or textual.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

/// The concrete elementary type a [`Scalar`] is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
}

impl Scalar {
    /// Coerces to `bool`: numbers are `true` when non-zero, text is parsed
    /// case-insensitively.
    pub fn to_bool(&self) -> Result<bool, ReflectError> {
        match self {
            Self::Bool(v) => Ok(*v),
            Self::Int(v) => Ok(*v != 0),
            Self::UInt(v) => Ok(*v != 0),
            Self::Float(v) => Ok(*v != 0.0),
            Self::Str(s) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") => Ok(true),
                t if t.eq_ignore_ascii_case("false") => Ok(false),
                _ => Err(ReflectError::conversion("bool", self)),
            },
            Self::Char(_) => Err(ReflectError::conversion("bool", self)),
        }
    }

    /// Coerces to a signed integer; floats must be integral and in range.
    pub fn to_i64(&self) -> Result<i64, ReflectError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::UInt(v) => i64::try_from(*v).map_err(|_| ReflectError::conversion("i64", self)),
            Self::Float(v) => float_to_integer(*v)
                .and_then(|v| i64::try_from(v).ok())
                .ok_or_else(|| ReflectError::conversion("i64", self)),
            Self::Bool(v) => Ok(i64::from(*v)),
            Self::Char(c) => Ok(i64::from(u32::from(*c))),
            Self::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| ReflectError::conversion("i64", self)),
        }
    }

    /// Coerces to an unsigned integer; negative values are rejected.
    pub fn to_u64(&self) -> Result<u64, ReflectError> {
        match self {
            Self::Int(v) => u64::try_from(*v).map_err(|_| ReflectError::conversion("u64", self)),
            Self::UInt(v) => Ok(*v),
            Self::Float(v) => float_to_integer(*v)
                .and_then(|v| u64::try_from(v).ok())
                .ok_or_else(|| ReflectError::conversion("u64", self)),
            Self::Bool(v) => Ok(u64::from(*v)),
            Self::Char(c) => Ok(u64::from(u32::from(*c))),
            Self::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| ReflectError::conversion("u64", self)),
        }
    }

    /// Coerces to `f64`; text accepts `NaN`, `inf` and `Infinity`.
    pub fn to_f64(&self) -> Result<f64, ReflectError> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            Self::UInt(v) => Ok(*v as f64),
            Self::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
            Self::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| ReflectError::conversion("f64", self)),
            Self::Char(_) => Err(ReflectError::conversion("f64", self)),
        }
    }

    /// Coerces to `char`: text must hold exactly one character, numbers
    /// must be a valid code point.
    pub fn to_char(&self) -> Result<char, ReflectError> {
        match self {
            Self::Char(c) => Ok(*c),
            Self::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(ReflectError::conversion("char", self)),
                }
            }
            Self::Int(_) | Self::UInt(_) => u32::try_from(self.to_u64()?)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| ReflectError::conversion("char", self)),
            Self::Bool(_) | Self::Float(_) => Err(ReflectError::conversion("char", self)),
        }
    }

    /// Converts to text; never fails.
    pub fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Bool(v) => v.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
        }
    }
}

fn float_to_integer(value: f64) -> Option<i128> {
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i128)
    } else {
        None
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Elementary

/// A reflected scalar or text type.
///
/// Implemented for `bool`, `char`, the integer and float primitives and
/// `String`.
pub trait Elementary: Reflect + Typed + Sized {
    const KIND: ScalarKind;

    fn to_scalar(&self) -> Scalar;

    fn from_scalar(scalar: Scalar) -> Result<Self, ReflectError>;
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Elementary, Scalar};

    #[test]
    fn integer_coercion() {
        assert_eq!(i32::from_scalar(Scalar::UInt(7)), Ok(7));
        assert_eq!(u8::from_scalar(Scalar::Float(3.0)), Ok(3));
        assert_eq!(i16::from_scalar(Scalar::Str(" -12 ".into())), Ok(-12));
        assert_eq!(u32::from_scalar(Scalar::Bool(true)), Ok(1));
        assert!(u8::from_scalar(Scalar::Int(300)).is_err());
        assert!(u64::from_scalar(Scalar::Int(-1)).is_err());
        assert!(i32::from_scalar(Scalar::Float(1.5)).is_err());
    }

    #[test]
    fn float_and_text_coercion() {
        assert_eq!(f64::from_scalar(Scalar::Int(2)), Ok(2.0));
        assert!(f64::from_scalar(Scalar::Str("NaN".into())).is_ok_and(f64::is_nan));
        assert_eq!(
            f64::from_scalar(Scalar::Str("-Infinity".into())),
            Ok(f64::NEG_INFINITY)
        );
        assert_eq!(String::from_scalar(Scalar::Int(5)), Ok("5".to_owned()));
        assert_eq!(bool::from_scalar(Scalar::Str("True".into())), Ok(true));
    }

    #[test]
    fn char_coercion() {
        assert_eq!(char::from_scalar(Scalar::Str("x".into())), Ok('x'));
        assert_eq!(char::from_scalar(Scalar::UInt(65)), Ok('A'));
        assert!(char::from_scalar(Scalar::Str("xy".into())).is_err());
    }
}
