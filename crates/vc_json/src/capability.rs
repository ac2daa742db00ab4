//! Decode-time capabilities of reflected types.
//!
//! Both are registered per type in the [`TypeRegistry`] and looked up by the
//! decoder:
//!
//! - [`TypeTraitObjectReference`]: a decoded value stands for another object,
//!   which replaces it before it is stored in its parent.
//! - [`TypeTraitDeserializationCallback`]: a shared object is notified once
//!   the whole graph has been decoded. Callbacks run in the order the objects
//!   were first met.
//!
//! [`TypeTraitStringConvert`](crate::TypeTraitStringConvert) and the bag
//! traits of [`protocol`](crate::protocol) are registered the same way.
//!
//! [`TypeRegistry`]: vc_reflect::registry::TypeRegistry

use std::borrow::Cow;

use vc_reflect::Reflect;
use vc_reflect::info::Typed;
use vc_reflect::registry::FromType;

use crate::protocol::{ProtocolError, StreamingContext};

// -----------------------------------------------------------------------------
// ObjectReference

/// A value that resolves to the object it stands for.
pub trait ObjectReference {
    fn resolve_real_object(&self, ctx: &StreamingContext) -> Result<Box<dyn Reflect>, ProtocolError>;
}

/// The registry form of [`ObjectReference`].
#[derive(Clone)]
pub struct TypeTraitObjectReference {
    func: fn(&dyn Reflect, &StreamingContext) -> Result<Box<dyn Reflect>, ProtocolError>,
}

impl TypeTraitObjectReference {
    #[inline]
    pub fn resolve_real_object(
        &self,
        value: &dyn Reflect,
        ctx: &StreamingContext,
    ) -> Result<Box<dyn Reflect>, ProtocolError> {
        (self.func)(value, ctx)
    }
}

impl<T: ObjectReference + Reflect + Typed> FromType<T> for TypeTraitObjectReference {
    fn from_type() -> Self {
        Self {
            func: |value, ctx| match value.downcast_ref::<T>() {
                Some(value) => value.resolve_real_object(ctx),
                None => Err(mismatched::<T>(value.reflect_type_path())),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// DeserializationCallback

/// A shared object notified after the graph holding it is fully decoded.
///
/// Register the capability on the content type `T` of a `Shared<T>`.
/// Only shared objects are notified: a value type that registers it is
/// decoded as usual, its callback is skipped and a warning is logged.
pub trait DeserializationCallback {
    fn on_deserialization(&mut self, ctx: &StreamingContext) -> Result<(), ProtocolError>;
}

/// The registry form of [`DeserializationCallback`].
#[derive(Clone)]
pub struct TypeTraitDeserializationCallback {
    func: fn(&mut dyn Reflect, &StreamingContext) -> Result<(), ProtocolError>,
}

impl TypeTraitDeserializationCallback {
    #[inline]
    pub fn on_deserialization(
        &self,
        value: &mut dyn Reflect,
        ctx: &StreamingContext,
    ) -> Result<(), ProtocolError> {
        (self.func)(value, ctx)
    }
}

impl<T: DeserializationCallback + Reflect + Typed> FromType<T> for TypeTraitDeserializationCallback {
    fn from_type() -> Self {
        Self {
            func: |value, ctx| {
                let found = value.reflect_type_path();
                match value.downcast_mut::<T>() {
                    Some(value) => value.on_deserialization(ctx),
                    None => Err(mismatched::<T>(found)),
                }
            },
        }
    }
}

fn mismatched<T: Typed>(found: &'static str) -> ProtocolError {
    ProtocolError::Mismatched {
        expected: Cow::Borrowed(T::type_path()),
        found: Cow::Borrowed(found),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_reflect::Reflect;
    use vc_reflect::registry::FromType;

    use super::{DeserializationCallback, ObjectReference};
    use super::{TypeTraitDeserializationCallback, TypeTraitObjectReference};
    use crate::protocol::{ProtocolError, StreamingContext};

    #[derive(Default)]
    struct Counter(u32);
    vc_reflect::reflect_opaque!(Counter, default);

    impl DeserializationCallback for Counter {
        fn on_deserialization(&mut self, _: &StreamingContext) -> Result<(), ProtocolError> {
            self.0 += 1;
            Ok(())
        }
    }

    impl ObjectReference for Counter {
        fn resolve_real_object(
            &self,
            _: &StreamingContext,
        ) -> Result<Box<dyn Reflect>, ProtocolError> {
            Ok(Box::new(self.0 * 10))
        }
    }

    #[test]
    fn callback_through_type_trait() {
        let callback = <TypeTraitDeserializationCallback as FromType<Counter>>::from_type();
        let ctx = StreamingContext::default();

        let mut counter = Counter(1);
        callback.on_deserialization(&mut counter, &ctx).unwrap();
        assert_eq!(counter.0, 2);
        assert!(callback.on_deserialization(&mut 5_u8, &ctx).is_err());
    }

    #[test]
    fn object_reference_through_type_trait() {
        let reference = <TypeTraitObjectReference as FromType<Counter>>::from_type();
        let ctx = StreamingContext::default();

        let real = reference.resolve_real_object(&Counter(4), &ctx).unwrap();
        assert_eq!(real.take::<u32>().ok(), Some(40));
        assert!(reference.resolve_real_object(&1_i8, &ctx).is_err());
    }
}
