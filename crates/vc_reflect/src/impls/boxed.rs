use std::borrow::Cow;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Handle, ReflectError, ReflectMut, ReflectRef};
use crate::registry::{GetTypeMeta, TypeMeta};
use crate::{FromReflect, Instance, Reflect};

// -----------------------------------------------------------------------------
// Box<dyn Reflect>

// An erased slot: it reports, and accepts, whatever value it holds.

impl TypePath for Box<dyn Reflect> {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::boxed::Box<dyn vc_reflect::Reflect>"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Box<dyn Reflect>"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Box"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::boxed")
    }
}

impl Typed for Box<dyn Reflect> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>()))
    }
}

impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        (**self).reflect_type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        (**self).reflect_mut()
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value;
        Ok(())
    }

    #[inline]
    fn as_handle(&self) -> Option<Handle> {
        (**self).as_handle()
    }
}

impl FromReflect for Box<dyn Reflect> {
    fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
        match value {
            // Do not nest erased boxes.
            Some(value) => Ok(value.take::<Box<dyn Reflect>>().unwrap_or_else(|value| value)),
            None => Err(ReflectError::UnexpectedNull {
                expected: Cow::Borrowed(Self::type_path()),
            }),
        }
    }
}

impl GetTypeMeta for Box<dyn Reflect> {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}

// -----------------------------------------------------------------------------
// Handle

// An erased shared object: the static type is dynamic, the runtime type
// is the `Shared<T>` it points to.

impl TypePath for Handle {
    #[inline]
    fn type_path() -> &'static str {
        "vc_reflect::ops::Handle"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Handle"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Handle"
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

impl Typed for Handle {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>()))
    }
}

impl Reflect for Handle {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        self.type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Shared(self.clone())
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Shared(self.clone())
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        match value.as_handle() {
            Some(handle) => {
                *self = handle;
                Ok(())
            }
            None => Err(value),
        }
    }

    #[inline]
    fn as_handle(&self) -> Option<Handle> {
        Some(self.clone())
    }
}

impl FromReflect for Handle {
    fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
        match value {
            Some(value) => value.as_handle().ok_or_else(|| ReflectError::MismatchedTypes {
                expected: Cow::Borrowed(Self::type_path()),
                found: Cow::Borrowed(value.reflect_type_path()),
            }),
            None => Err(ReflectError::UnexpectedNull {
                expected: Cow::Borrowed(Self::type_path()),
            }),
        }
    }
}

impl GetTypeMeta for Handle {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::ops::{Handle, Shared};
    use crate::{FromReflect, Reflect};

    #[test]
    fn boxed_reports_its_content() {
        let boxed: Box<dyn Reflect> = Box::new(3_u8);
        assert_eq!(Reflect::reflect_type_path(&boxed), "u8");
        assert!(<Box<dyn Reflect>>::type_info().is_dynamic());
    }

    #[test]
    fn boxed_from_reflect_does_not_nest() {
        let inner: Box<dyn Reflect> = Box::new(3_u8);
        let nested: Box<dyn Reflect> = Box::new(inner);
        let value = <Box<dyn Reflect>>::from_reflect(Some(nested)).unwrap();
        assert!(value.is::<u8>());
    }

    #[test]
    fn handle_from_shared_instance() {
        let shared = Shared::new(1_i32);
        let handle = Handle::from_reflect(Some(Box::new(shared.clone()))).unwrap();
        assert_eq!(handle.address(), shared.address());
        assert_eq!(handle.reflect_type_path(), "vc_reflect::ops::Shared<i32>");
        assert!(Handle::from_reflect(Some(Box::new(1_i32))).is_err());
    }
}
