use serde::de::{DeserializeSeed, Deserializer, Error};
use serde::Deserialize;
use serde_json::Value;
use vc_reflect::Instance;
use vc_reflect::info::TypeInfo;

use crate::JsonFormatter;

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Reads a graph from any serde data format.
///
/// The input is first read as a JSON value, then decoded by the formatter.
/// `None` is a null root.
///
/// # Examples
///
/// ```
/// use serde::de::DeserializeSeed;
/// use vc_json::{DeserializeDriver, JsonFormatter};
/// use vc_reflect::info::Typed;
/// use vc_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<u8>>();
/// let formatter = JsonFormatter::new(&registry);
///
/// let driver = DeserializeDriver::new(&formatter, Some(<Vec<u8>>::type_info()));
/// let mut input = serde_json::Deserializer::from_str("[1, 2]");
/// let value = driver.deserialize(&mut input).unwrap().unwrap();
/// assert_eq!(value.take::<Vec<u8>>().ok(), Some(vec![1, 2]));
/// ```
pub struct DeserializeDriver<'a, 'r> {
    formatter: &'a JsonFormatter<'r>,
    expected: Option<&'static TypeInfo>,
}

impl<'a, 'r> DeserializeDriver<'a, 'r> {
    #[inline]
    pub const fn new(formatter: &'a JsonFormatter<'r>, expected: Option<&'static TypeInfo>) -> Self {
        Self {
            formatter,
            expected,
        }
    }
}

impl<'de> DeserializeSeed<'de> for DeserializeDriver<'_, '_> {
    type Value = Instance;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let json = Value::deserialize(deserializer)?;
        self.formatter
            .from_value(&json, self.expected)
            .map_err(D::Error::custom)
    }
}
