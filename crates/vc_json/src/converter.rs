use std::any::TypeId;
use std::fmt::Display;
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;
use vc_reflect::Reflect;
use vc_reflect::info::Typed;
use vc_reflect::registry::FromType;

// -----------------------------------------------------------------------------
// ConvertError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("expected a value of type `{expected}`, found `{found}`")]
    Mismatched {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot parse {text:?} as `{type_path}`: {message}")]
    Parse {
        type_path: &'static str,
        text: String,
        message: String,
    },
}

// -----------------------------------------------------------------------------
// StringConverter

/// Writes values of one type as JSON strings and parses them back.
///
/// A converter is looked up for the runtime type of a value: first among the
/// formatter's own converters, then as a [`TypeTraitStringConvert`] in the
/// registry, then among the built-in converters of the `std::net` address
/// types.
pub trait StringConverter {
    fn convert_to_string(&self, value: &dyn Reflect) -> Result<String, ConvertError>;

    fn convert_from_string(&self, text: &str) -> Result<Box<dyn Reflect>, ConvertError>;
}

fn to_string_as<T: Display + Reflect + Typed>(value: &dyn Reflect) -> Result<String, ConvertError> {
    match value.downcast_ref::<T>() {
        Some(value) => Ok(value.to_string()),
        None => Err(ConvertError::Mismatched {
            expected: T::type_path(),
            found: value.reflect_type_path(),
        }),
    }
}

fn from_string_as<T>(text: &str) -> Result<Box<dyn Reflect>, ConvertError>
where
    T: FromStr + Reflect + Typed,
    T::Err: Display,
{
    match text.parse::<T>() {
        Ok(value) => Ok(Box::new(value)),
        Err(err) => Err(ConvertError::Parse {
            type_path: T::type_path(),
            text: text.to_owned(),
            message: err.to_string(),
        }),
    }
}

// -----------------------------------------------------------------------------
// FromStrConverter

/// A [`StringConverter`] through [`Display`] and [`FromStr`].
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use vc_json::{FromStrConverter, StringConverter};
///
/// let converter = FromStrConverter::<Ipv4Addr>::new();
/// let text = converter.convert_to_string(&Ipv4Addr::LOCALHOST).unwrap();
/// assert_eq!(text, "127.0.0.1");
///
/// let back = converter.convert_from_string(&text).unwrap();
/// assert_eq!(back.take::<Ipv4Addr>().ok(), Some(Ipv4Addr::LOCALHOST));
/// assert!(converter.convert_from_string("localhost").is_err());
/// ```
pub struct FromStrConverter<T>(PhantomData<fn() -> T>);

impl<T> FromStrConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromStrConverter<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StringConverter for FromStrConverter<T>
where
    T: FromStr + Display + Reflect + Typed,
    T::Err: Display,
{
    #[inline]
    fn convert_to_string(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        to_string_as::<T>(value)
    }

    #[inline]
    fn convert_from_string(&self, text: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        from_string_as::<T>(text)
    }
}

// -----------------------------------------------------------------------------
// TypeTraitStringConvert

/// The registry form of a string converter, for `FromStr + Display` types.
///
/// # Examples
///
/// ```
/// use vc_json::TypeTraitStringConvert;
/// use vc_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// assert!(registry.register_type_trait::<u64, TypeTraitStringConvert>());
/// ```
#[derive(Clone)]
pub struct TypeTraitStringConvert {
    to_string: fn(&dyn Reflect) -> Result<String, ConvertError>,
    from_string: fn(&str) -> Result<Box<dyn Reflect>, ConvertError>,
}

impl StringConverter for TypeTraitStringConvert {
    #[inline]
    fn convert_to_string(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        (self.to_string)(value)
    }

    #[inline]
    fn convert_from_string(&self, text: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        (self.from_string)(text)
    }
}

impl<T> FromType<T> for TypeTraitStringConvert
where
    T: FromStr + Display + Reflect + Typed,
    T::Err: Display,
{
    fn from_type() -> Self {
        Self {
            to_string: to_string_as::<T>,
            from_string: from_string_as::<T>,
        }
    }
}

// -----------------------------------------------------------------------------
// Built-in converters

static IP_ADDR: FromStrConverter<IpAddr> = FromStrConverter::new();
static IPV4_ADDR: FromStrConverter<Ipv4Addr> = FromStrConverter::new();
static IPV6_ADDR: FromStrConverter<Ipv6Addr> = FromStrConverter::new();
static SOCKET_ADDR: FromStrConverter<SocketAddr> = FromStrConverter::new();

/// The built-in converter of a type, if it has one.
pub(crate) fn builtin_converter(type_id: TypeId) -> Option<&'static dyn StringConverter> {
    if type_id == TypeId::of::<IpAddr>() {
        Some(&IP_ADDR)
    } else if type_id == TypeId::of::<Ipv4Addr>() {
        Some(&IPV4_ADDR)
    } else if type_id == TypeId::of::<Ipv6Addr>() {
        Some(&IPV6_ADDR)
    } else if type_id == TypeId::of::<SocketAddr>() {
        Some(&SOCKET_ADDR)
    } else {
        None
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::any::TypeId;
    use std::net::{IpAddr, SocketAddr};

    use vc_reflect::registry::FromType;

    use super::{ConvertError, StringConverter, TypeTraitStringConvert, builtin_converter};

    #[test]
    fn builtin_address_converters() {
        let converter = builtin_converter(TypeId::of::<SocketAddr>()).unwrap();
        let addr: SocketAddr = "[::1]:8080".parse().unwrap();
        assert_eq!(converter.convert_to_string(&addr).unwrap(), "[::1]:8080");
        assert!(builtin_converter(TypeId::of::<IpAddr>()).is_some());
        assert!(builtin_converter(TypeId::of::<String>()).is_none());
    }

    #[test]
    fn type_trait_converter() {
        let converter = <TypeTraitStringConvert as FromType<i16>>::from_type();
        assert_eq!(converter.convert_to_string(&-4_i16).unwrap(), "-4");
        assert_eq!(
            converter.convert_to_string(&4_u8),
            Err(ConvertError::Mismatched {
                expected: "i16",
                found: "u8"
            })
        );
        let value = converter.convert_from_string("12").unwrap();
        assert_eq!(value.take::<i16>().ok(), Some(12));
        assert!(matches!(
            converter.convert_from_string("x"),
            Err(ConvertError::Parse { type_path: "i16", .. })
        ));
    }
}
