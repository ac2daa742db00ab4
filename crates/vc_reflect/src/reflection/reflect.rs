use std::any::Any;
use std::fmt;

use crate::info::TypeInfo;
use crate::ops::{Handle, ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// A type-erased value whose structure can be inspected at runtime.
///
/// The static type of a slot and the runtime type of its value may differ
/// (an erased `Box<dyn Reflect>` slot, an empty `Option`), so
/// [`reflect_type_info`](Reflect::reflect_type_info) always reports the
/// type of the value actually held.
pub trait Reflect: Any {
    /// The information of the runtime type of this value.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Replaces `self` with `value`, handing the value back if its type does not fit.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns the handle of a shared object, `None` for anything else.
    ///
    /// Cheaper than matching [`reflect_ref`](Reflect::reflect_ref) when only
    /// identity matters.
    #[inline]
    fn as_handle(&self) -> Option<Handle> {
        None
    }

    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        self
    }

    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl dyn Reflect {
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Takes the value out of the box if it is a `T`.
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type checked above"),
        }
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reflect_ref() {
            ReflectRef::Null => f.write_str("null"),
            ReflectRef::Elementary(scalar) => write!(f, "{scalar:?}"),
            ReflectRef::Shared(handle) => write!(f, "{handle:?}"),
            _ => write!(f, "Reflect({})", self.reflect_type_path()),
        }
    }
}
