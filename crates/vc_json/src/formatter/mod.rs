use std::any::TypeId;
use std::io;

use serde_json::Value;
use vc_reflect::hash::HashMap;
use vc_reflect::info::{TypeInfo, Typed};
use vc_reflect::registry::TypeRegistry;
use vc_reflect::{FromReflect, Instance, Reflect};

use crate::converter::builtin_converter;
use crate::de::Decoder;
use crate::ser::Encoder;
use crate::{AssemblyStyle, Binder, DefaultBinder, FormatError, FormatterConfig};
use crate::{StreamingContext, StringConverter, Surrogate, SurrogateSelector, TypeTraitStringConvert};

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// JsonFormatter

/// Converts reflected object graphs to JSON and back.
///
/// A formatter borrows the [`TypeRegistry`] that resolves type identifiers
/// and holds the capabilities of registered types. It keeps no state between
/// calls and may be reused.
///
/// Every call takes the *expected type* of the root: the static type the
/// caller holds the value as. Values whose runtime type matches the type
/// expected at their position are written without a type tag. With no
/// expected type, or an erased one (`Box<dyn Reflect>`), the root is tagged
/// and can be decoded without knowing its type.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vc_json::JsonFormatter;
/// use vc_reflect::info::Typed;
/// use vc_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let formatter = JsonFormatter::new(&registry).with_pretty(false);
///
/// let list = vec![1, 2, 3];
/// assert_eq!(formatter.serialize(&list).unwrap(), "[1,2,3]");
///
/// let tagged = formatter.to_value(&7_u8, None).unwrap();
/// assert_eq!(tagged, json!({ "@@info@@": "root", "@@type@@": "u8, core", "@@value@@": 7 }));
///
/// let back = formatter.from_value(&tagged, None).unwrap().unwrap();
/// assert_eq!(back.take::<u8>().ok(), Some(7));
/// ```
pub struct JsonFormatter<'a> {
    registry: &'a TypeRegistry,
    binder: Box<dyn Binder>,
    surrogates: Option<Box<dyn SurrogateSelector>>,
    converters: HashMap<TypeId, Box<dyn StringConverter>>,
    style: AssemblyStyle,
    context: StreamingContext,
    pretty: bool,
}

impl<'a> JsonFormatter<'a> {
    /// Creates a formatter with the default settings of [`FormatterConfig`].
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self::from_config(registry, FormatterConfig::default())
    }

    pub fn from_config(registry: &'a TypeRegistry, config: FormatterConfig) -> Self {
        Self {
            registry,
            binder: Box::new(DefaultBinder),
            surrogates: None,
            converters: HashMap::default(),
            style: config.assembly_style,
            context: config.context(),
            pretty: config.pretty,
        }
    }

    #[inline]
    pub fn with_binder(mut self, binder: impl Binder + 'static) -> Self {
        self.binder = Box::new(binder);
        self
    }

    #[inline]
    pub fn with_surrogate_selector(mut self, selector: impl SurrogateSelector + 'static) -> Self {
        self.surrogates = Some(Box::new(selector));
        self
    }

    #[inline]
    pub fn with_assembly_style(mut self, style: AssemblyStyle) -> Self {
        self.style = style;
        self
    }

    /// Writes values of type `T` through `converter`.
    ///
    /// Takes precedence over the converters found in the registry.
    #[inline]
    pub fn with_converter<T: Typed>(mut self, converter: impl StringConverter + 'static) -> Self {
        self.converters
            .insert(T::type_info().type_id(), Box::new(converter));
        self
    }

    #[inline]
    pub fn with_context(mut self, context: StreamingContext) -> Self {
        self.context = context;
        self
    }

    /// Indents text output; on by default.
    #[inline]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline]
    pub fn assembly_style(&self) -> AssemblyStyle {
        self.style
    }

    #[inline]
    pub fn context(&self) -> &StreamingContext {
        &self.context
    }
}

// -----------------------------------------------------------------------------
// Encoding

impl JsonFormatter<'_> {
    /// Converts a graph to a JSON value.
    pub fn to_value(
        &self,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Value, FormatError> {
        Encoder::new(self).run(value, expected)
    }

    pub fn to_string(
        &self,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<String, FormatError> {
        let json = self.to_value(value, expected)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(text)
    }

    pub fn to_writer<W: io::Write>(
        &self,
        writer: W,
        value: &dyn Reflect,
        expected: Option<&'static TypeInfo>,
    ) -> Result<(), FormatError> {
        let json = self.to_value(value, expected)?;
        if self.pretty {
            serde_json::to_writer_pretty(writer, &json)?;
        } else {
            serde_json::to_writer(writer, &json)?;
        }
        Ok(())
    }

    /// Converts a value held as a `T` to text.
    #[inline]
    pub fn serialize<T: Reflect + Typed>(&self, value: &T) -> Result<String, FormatError> {
        self.to_string(value, Some(T::type_info()))
    }
}

// -----------------------------------------------------------------------------
// Decoding

impl JsonFormatter<'_> {
    /// Rebuilds a graph from a JSON value; `None` is a null root.
    pub fn from_value(
        &self,
        json: &Value,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Instance, FormatError> {
        Decoder::new(self).run(json, expected)
    }

    pub fn from_str(
        &self,
        text: &str,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Instance, FormatError> {
        let json: Value = serde_json::from_str(text)?;
        self.from_value(&json, expected)
    }

    pub fn from_reader<R: io::Read>(
        &self,
        reader: R,
        expected: Option<&'static TypeInfo>,
    ) -> Result<Instance, FormatError> {
        let json: Value = serde_json::from_reader(reader)?;
        self.from_value(&json, expected)
    }

    /// Reads a `T` from text.
    pub fn deserialize<T: FromReflect + Typed>(&self, text: &str) -> Result<T, FormatError> {
        let instance = self.from_str(text, Some(T::type_info()))?;
        T::from_reflect(instance).map_err(|source| FormatError::Reflect {
            path: crate::ser::ROOT.to_owned(),
            source,
        })
    }
}

// -----------------------------------------------------------------------------
// Lookups

impl JsonFormatter<'_> {
    #[inline]
    pub(crate) fn type_name(&self, info: &'static TypeInfo) -> String {
        self.binder.bind_to_name(info, self.style)
    }

    #[inline]
    pub(crate) fn bind(&self, identifier: &str) -> Option<&'static TypeInfo> {
        self.binder.bind_to_type(identifier, self.registry)
    }

    #[inline]
    pub(crate) fn surrogate(&self, info: &'static TypeInfo) -> Option<&dyn Surrogate> {
        self.surrogates.as_deref()?.get_surrogate(info, &self.context)
    }

    /// The converter of a type: own overrides, then the registry, then built-ins.
    pub(crate) fn converter(&self, type_id: TypeId) -> Option<&dyn StringConverter> {
        if let Some(converter) = self.converters.get(&type_id) {
            return Some(&**converter);
        }
        if let Some(converter) = self.registry.get_type_trait::<TypeTraitStringConvert>(type_id) {
            return Some(converter);
        }
        builtin_converter(type_id)
    }
}
