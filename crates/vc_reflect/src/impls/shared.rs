use std::borrow::Cow;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{SharedInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Handle, ReflectError, ReflectMut, ReflectRef, Shared};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};
use crate::{FromReflect, Instance, Reflect};

impl<T: TypePath> TypePath for Shared<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["vc_reflect::ops::Shared<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Shared<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Shared"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("vc_reflect::ops")
    }

    #[inline]
    fn crate_version() -> Option<&'static str> {
        Some(env!("CARGO_PKG_VERSION"))
    }
}

impl<T: Typed> Typed for Shared<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Shared(SharedInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Shared<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Shared(Handle::new(self))
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Shared(Handle::new(self))
    }

    /// Points this slot at another object; the previous object is untouched.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        match value.take::<Self>() {
            Ok(shared) => {
                *self = shared;
                Ok(())
            }
            Err(value) => match value.as_handle().and_then(|handle| handle.downcast::<T>()) {
                Some(shared) => {
                    *self = shared;
                    Ok(())
                }
                None => Err(value),
            },
        }
    }

    #[inline]
    fn as_handle(&self) -> Option<Handle> {
        Some(Handle::new(self))
    }
}

impl<T: Reflect + Typed> FromReflect for Shared<T> {
    /// Accepts a `Shared<T>` or any erased handle to one.
    fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
        let Some(value) = value else {
            return Err(ReflectError::UnexpectedNull {
                expected: Cow::Borrowed(Self::type_path()),
            });
        };
        match value.take::<Self>() {
            Ok(shared) => Ok(shared),
            Err(value) => value
                .as_handle()
                .and_then(|handle| handle.downcast::<T>())
                .ok_or_else(|| ReflectError::MismatchedTypes {
                    expected: Cow::Borrowed(Self::type_path()),
                    found: Cow::Borrowed(value.reflect_type_path()),
                }),
        }
    }
}

impl<T: Reflect + GetTypeMeta + Default> GetTypeMeta for Shared<T> {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::ops::{Handle, ReflectRef, Shared};
    use crate::{FromReflect, Reflect};

    #[test]
    fn shared_info() {
        let info = <Shared<String>>::type_info().as_shared().unwrap();
        assert_eq!(info.inner_info().type_path(), "alloc::string::String");
    }

    #[test]
    fn reflect_ref_gives_handle() {
        let shared = Shared::new(2_i32);
        let ReflectRef::Shared(handle) = shared.reflect_ref() else {
            panic!("Shared must give a handle");
        };
        assert_eq!(handle.address(), shared.address());
        assert_eq!(handle.inner_info().type_path(), "i32");
    }

    #[test]
    fn from_reflect_accepts_handles() {
        let shared = Shared::new(2_i32);
        let handle: Box<dyn Reflect> = Box::new(Handle::new(&shared));
        let back = <Shared<i32>>::from_reflect(Some(handle)).unwrap();
        assert_eq!(back, shared);

        let other: Box<dyn Reflect> = Box::new(Handle::new(&Shared::new(1_u8)));
        assert!(<Shared<i32>>::from_reflect(Some(other)).is_err());
    }

    #[test]
    fn set_through_handle() {
        let shared = Shared::new(2_i32);
        let handle = Handle::new(&shared);
        handle.try_borrow_mut().unwrap().set(Box::new(5_i32)).unwrap();
        assert_eq!(*shared.borrow(), 5);
    }
}
