use crate::impls::{GenericTypePathCell, concat};
use crate::info::{TypeInfo, TypePath, Typed};
use crate::ops::{Handle, ReflectError, ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::{FromReflect, Instance, Reflect};

// `Option<T>` is transparent: `Some(v)` behaves as `v`, `None` is null.

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Typed> Typed for Option<T> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        T::type_info()
    }
}

impl<T: FromReflect + Typed> Reflect for Option<T> {
    fn reflect_type_info(&self) -> &'static TypeInfo {
        match self {
            Some(value) => value.reflect_type_info(),
            None => T::type_info(),
        }
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Some(value) => value.reflect_ref(),
            None => ReflectRef::Null,
        }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        match self {
            Some(value) => value.reflect_mut(),
            None => ReflectMut::Null,
        }
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        let value = match value.take::<Self>() {
            Ok(value) => {
                *self = value;
                return Ok(());
            }
            Err(value) => value,
        };
        match self {
            Some(inner) => inner.set(value),
            None => {
                *self = Some(value.take::<T>()?);
                Ok(())
            }
        }
    }

    #[inline]
    fn as_handle(&self) -> Option<Handle> {
        self.as_ref().and_then(Reflect::as_handle)
    }
}

impl<T: FromReflect + Typed> FromReflect for Option<T> {
    fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
        match value {
            None => Ok(None),
            Some(value) => match value.take::<Self>() {
                Ok(value) => Ok(value),
                Err(value) => T::from_reflect(Some(value)).map(Some),
            },
        }
    }
}

impl<T: GetTypeMeta> GetTypeMeta for Option<T> {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        T::get_type_meta()
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_dependencies(registry);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::TypePath;
    use crate::ops::{ReflectRef, Shared};
    use crate::{FromReflect, Reflect};

    #[test]
    fn none_is_null() {
        let value: Option<i32> = None;
        assert!(matches!(value.reflect_ref(), ReflectRef::Null));
        assert_eq!(value.reflect_type_path(), "i32");
        assert_eq!(<Option<i32>>::type_path(), "core::option::Option<i32>");
    }

    #[test]
    fn from_reflect_wraps() {
        assert_eq!(<Option<u8>>::from_reflect(None), Ok(None));
        assert_eq!(<Option<u8>>::from_reflect(Some(Box::new(4_u8))), Ok(Some(4)));
        assert_eq!(<Option<u8>>::from_reflect(Some(Box::new(Some(4_u8)))), Ok(Some(4)));
    }

    #[test]
    fn shared_option_has_handle() {
        let value = Some(Shared::new(1_u8));
        assert!(value.as_handle().is_some());
        assert!(None::<Shared<u8>>.as_handle().is_none());
    }
}
