use std::borrow::Cow;

use thiserror::Error;
use vc_reflect::info::{TypeInfo, Typed};
use vc_reflect::ops::ReflectError;
use vc_reflect::registry::FromType;
use vc_reflect::{FromReflect, Instance, Reflect};

use crate::protocol::StreamingContext;

// -----------------------------------------------------------------------------
// ProtocolError

/// An error raised by a custom protocol participant.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("the bag has no entry named `{name}`")]
    MissingEntry { name: String },

    #[error("bag entry `{name}`: {source}")]
    Reflect { name: String, source: ReflectError },

    #[error("expected a value of type `{expected}`, found `{found}`")]
    Mismatched {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },

    #[error("{0}")]
    Custom(String),
}

impl ProtocolError {
    #[inline]
    pub fn custom(message: impl ToString) -> Self {
        Self::Custom(message.to_string())
    }

    fn mismatched<T: Typed>(found: &dyn Reflect) -> Self {
        Self::Mismatched {
            expected: Cow::Borrowed(T::type_path()),
            found: Cow::Borrowed(found.reflect_type_path()),
        }
    }
}

// -----------------------------------------------------------------------------
// SerializationBag

/// The name-value representation of an object using a custom protocol.
///
/// Entries keep the order they were added in. A bag may also substitute the
/// type recorded for the object, so a value can be written as a proxy of
/// another type and decoded as that type.
///
/// # Examples
///
/// ```
/// use vc_json::SerializationBag;
///
/// let mut bag = SerializationBag::new();
/// bag.add("width", 3_u32);
/// bag.add("label", String::from("box"));
///
/// assert_eq!(bag.len(), 2);
/// assert_eq!(bag.take::<u32>("width").unwrap(), 3);
/// assert!(bag.take::<u32>("width").is_err());
/// ```
#[derive(Debug, Default)]
pub struct SerializationBag {
    entries: Vec<(String, Instance)>,
    type_info: Option<&'static TypeInfo>,
}

impl SerializationBag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            type_info: None,
        }
    }

    #[inline]
    pub fn add(&mut self, name: impl Into<String>, value: impl Reflect) {
        self.add_instance(name, Some(Box::new(value)));
    }

    /// Adds an owned value or, with `None`, a null.
    #[inline]
    pub fn add_instance(&mut self, name: impl Into<String>, value: Instance) {
        self.entries.push((name.into(), value));
    }

    /// The first entry named `name`; `None` if absent or null.
    pub fn get(&self, name: &str) -> Option<&dyn Reflect> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .and_then(|(_, value)| value.as_deref())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == name)
    }

    /// Removes the first entry named `name` and converts it to `T`.
    ///
    /// A null entry converts to `Option<T>` only.
    pub fn take<T: FromReflect>(&mut self, name: &str) -> Result<T, ProtocolError> {
        let index = self
            .entries
            .iter()
            .position(|(entry, _)| entry == name)
            .ok_or_else(|| ProtocolError::MissingEntry {
                name: name.to_owned(),
            })?;
        let (name, value) = self.entries.remove(index);
        T::from_reflect(value).map_err(|source| ProtocolError::Reflect { name, source })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, Option<&dyn Reflect>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Records the object as a value of another type.
    #[inline]
    pub fn set_type(&mut self, info: &'static TypeInfo) {
        self.type_info = Some(info);
    }

    #[inline]
    pub fn set_type_of<T: Typed>(&mut self) {
        self.set_type(T::type_info());
    }

    /// The substituted type, if any.
    #[inline]
    pub fn type_info(&self) -> Option<&'static TypeInfo> {
        self.type_info
    }

    #[inline]
    pub(crate) fn into_entries(self) -> Vec<(String, Instance)> {
        self.entries
    }
}

// -----------------------------------------------------------------------------
// Protocol traits

/// A type writing itself as a [`SerializationBag`] instead of its members.
///
/// Register [`TypeTraitSerializeBag`] for the type to enable it.
pub trait SerializeBag {
    fn produce_bag(
        &self,
        bag: &mut SerializationBag,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError>;
}

/// A type reading itself back from a [`SerializationBag`].
///
/// `absorb_bag` runs on a default-constructed value. Register
/// [`TypeTraitDeserializeBag`] for the type to enable it.
pub trait DeserializeBag {
    fn absorb_bag(
        &mut self,
        bag: &mut SerializationBag,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError>;
}

/// The registry form of [`SerializeBag`].
///
/// # Examples
///
/// ```
/// use vc_json::{ProtocolError, SerializationBag, SerializeBag, StreamingContext};
/// use vc_json::TypeTraitSerializeBag;
/// use vc_reflect::registry::TypeRegistry;
///
/// #[derive(Default)]
/// pub struct Celsius(f64);
/// vc_reflect::reflect_opaque!(Celsius, default);
///
/// impl SerializeBag for Celsius {
///     fn produce_bag(
///         &self,
///         bag: &mut SerializationBag,
///         _: &StreamingContext,
///     ) -> Result<(), ProtocolError> {
///         bag.add("degrees", self.0);
///         Ok(())
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Celsius>();
/// assert!(registry.register_type_trait::<Celsius, TypeTraitSerializeBag>());
/// ```
#[derive(Clone)]
pub struct TypeTraitSerializeBag {
    func: fn(&dyn Reflect, &mut SerializationBag, &StreamingContext) -> Result<(), ProtocolError>,
}

impl TypeTraitSerializeBag {
    #[inline]
    pub fn produce_bag(
        &self,
        value: &dyn Reflect,
        bag: &mut SerializationBag,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError> {
        (self.func)(value, bag, ctx)
    }
}

impl<T: SerializeBag + Reflect + Typed> FromType<T> for TypeTraitSerializeBag {
    fn from_type() -> Self {
        Self {
            func: |value, bag, ctx| match value.downcast_ref::<T>() {
                Some(value) => value.produce_bag(bag, ctx),
                None => Err(ProtocolError::mismatched::<T>(value)),
            },
        }
    }
}

/// The registry form of [`DeserializeBag`].
#[derive(Clone)]
pub struct TypeTraitDeserializeBag {
    func: fn(&mut dyn Reflect, &mut SerializationBag, &StreamingContext) -> Result<(), ProtocolError>,
}

impl TypeTraitDeserializeBag {
    #[inline]
    pub fn absorb_bag(
        &self,
        value: &mut dyn Reflect,
        bag: &mut SerializationBag,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError> {
        (self.func)(value, bag, ctx)
    }
}

impl<T: DeserializeBag + Reflect + Typed> FromType<T> for TypeTraitDeserializeBag {
    fn from_type() -> Self {
        Self {
            func: |value, bag, ctx| {
                let found = value.reflect_type_path();
                match value.downcast_mut::<T>() {
                    Some(value) => value.absorb_bag(bag, ctx),
                    None => Err(ProtocolError::Mismatched {
                        expected: Cow::Borrowed(T::type_path()),
                        found: Cow::Borrowed(found),
                    }),
                }
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ProtocolError, SerializationBag};
    use vc_reflect::info::Typed;

    #[test]
    fn entries_keep_order() {
        let mut bag = SerializationBag::new();
        bag.add("b", 1_u8);
        bag.add_instance("a", None);
        bag.add("c", String::from("x"));

        let names: Vec<_> = bag.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert!(bag.contains("a"));
        assert!(bag.get("a").is_none());
        assert!(bag.get("b").is_some_and(|v| v.is::<u8>()));
    }

    #[test]
    fn take_converts_and_removes() {
        let mut bag = SerializationBag::new();
        bag.add("n", 5_i32);
        bag.add_instance("none", None);

        assert!(matches!(
            bag.take::<Vec<u8>>("n"),
            Err(ProtocolError::Reflect { name, .. }) if name == "n"
        ));
        assert_eq!(bag.take::<Option<i32>>("none").unwrap(), None);
        assert!(matches!(
            bag.take::<i32>("missing"),
            Err(ProtocolError::MissingEntry { .. })
        ));
        assert!(bag.is_empty());
    }

    #[test]
    fn type_substitution() {
        let mut bag = SerializationBag::new();
        assert!(bag.type_info().is_none());
        bag.set_type_of::<u64>();
        assert_eq!(bag.type_info(), Some(u64::type_info()));
    }
}
