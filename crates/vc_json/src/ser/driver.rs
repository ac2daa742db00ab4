use serde::ser::Error;
use serde::{Serialize, Serializer};
use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;

use crate::JsonFormatter;

// -----------------------------------------------------------------------------
// SerializeDriver

/// Writes a graph to any serde data format.
///
/// The graph is first converted to a JSON value by the formatter, so the
/// target format must be able to carry JSON objects, arrays and scalars.
///
/// # Examples
///
/// ```
/// use vc_json::{JsonFormatter, SerializeDriver};
/// use vc_reflect::info::Typed;
/// use vc_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let formatter = JsonFormatter::new(&registry);
///
/// let list = vec![1_u8, 2];
/// let driver = SerializeDriver::new(&formatter, &list, Some(<Vec<u8>>::type_info()));
/// assert_eq!(serde_json::to_string(&driver).unwrap(), "[1,2]");
/// ```
pub struct SerializeDriver<'a, 'r> {
    formatter: &'a JsonFormatter<'r>,
    value: &'a dyn Reflect,
    expected: Option<&'static TypeInfo>,
}

impl<'a, 'r> SerializeDriver<'a, 'r> {
    #[inline]
    pub const fn new(
        formatter: &'a JsonFormatter<'r>,
        value: &'a dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Self {
        Self {
            formatter,
            value,
            expected,
        }
    }
}

impl Serialize for SerializeDriver<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.formatter
            .to_value(self.value, self.expected)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
