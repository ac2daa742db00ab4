use std::borrow::Cow;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ElementaryInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Elementary, ReflectError, ReflectMut, ReflectRef, Scalar, ScalarKind};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault};
use crate::{FromReflect, Instance, Reflect};

macro_rules! impl_elementary {
    (
        $ty:ty, $kind:ident,
        path: $path:expr, name: $name:expr, module: $module:expr,
        to: |$this:ident| $to:expr,
        from: |$scalar:ident| $from:expr $(,)?
    ) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $name
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Elementary(ElementaryInfo::new::<Self>()))
            }
        }

        impl Elementary for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            #[inline]
            fn to_scalar(&self) -> Scalar {
                let $this = self;
                $to
            }

            #[inline]
            fn from_scalar($scalar: Scalar) -> Result<Self, ReflectError> {
                $from
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Elementary(self.to_scalar())
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Opaque(self)
            }

            #[inline]
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }
        }

        impl FromReflect for $ty {
            fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
                from_elementary::<Self>(value)
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }
        }
    };
}

/// Takes an elementary value, converting from another elementary type if needed.
fn from_elementary<T: Elementary>(value: Instance) -> Result<T, ReflectError> {
    let Some(value) = value else {
        return Err(ReflectError::UnexpectedNull {
            expected: Cow::Borrowed(T::type_path()),
        });
    };
    match value.take::<T>() {
        Ok(value) => Ok(value),
        Err(value) => match value.reflect_ref() {
            ReflectRef::Elementary(scalar) => T::from_scalar(scalar),
            _ => Err(ReflectError::MismatchedTypes {
                expected: Cow::Borrowed(T::type_path()),
                found: Cow::Borrowed(value.reflect_type_path()),
            }),
        },
    }
}

macro_rules! impl_signed {
    ($($ty:ident => $kind:ident),* $(,)?) => {$(
        impl_elementary!(
            $ty, $kind,
            path: stringify!($ty), name: stringify!($ty), module: None,
            to: |this| Scalar::Int(*this as i64),
            from: |scalar| <$ty>::try_from(scalar.to_i64()?)
                .map_err(|_| ReflectError::conversion(stringify!($ty), &scalar)),
        );
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ident => $kind:ident),* $(,)?) => {$(
        impl_elementary!(
            $ty, $kind,
            path: stringify!($ty), name: stringify!($ty), module: None,
            to: |this| Scalar::UInt(*this as u64),
            from: |scalar| <$ty>::try_from(scalar.to_u64()?)
                .map_err(|_| ReflectError::conversion(stringify!($ty), &scalar)),
        );
    )*};
}

impl_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
impl_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl_elementary!(
    bool, Bool,
    path: "bool", name: "bool", module: None,
    to: |this| Scalar::Bool(*this),
    from: |scalar| scalar.to_bool(),
);

impl_elementary!(
    char, Char,
    path: "char", name: "char", module: None,
    to: |this| Scalar::Char(*this),
    from: |scalar| scalar.to_char(),
);

impl_elementary!(
    f32, F32,
    path: "f32", name: "f32", module: None,
    to: |this| Scalar::Float(f64::from(*this)),
    from: |scalar| scalar.to_f64().map(|v| v as f32),
);

impl_elementary!(
    f64, F64,
    path: "f64", name: "f64", module: None,
    to: |this| Scalar::Float(*this),
    from: |scalar| scalar.to_f64(),
);

impl_elementary!(
    String, String,
    path: "alloc::string::String", name: "String", module: Some("alloc::string"),
    to: |this| Scalar::Str(this.clone()),
    from: |scalar| Ok(scalar.into_string()),
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::FromReflect;
    use crate::info::{TypeInfo, Typed};
    use crate::ops::{ReflectRef, Scalar, ScalarKind};

    #[test]
    fn elementary_info() {
        let TypeInfo::Elementary(info) = u16::type_info() else {
            panic!("u16 must be elementary");
        };
        assert_eq!(info.kind(), ScalarKind::U16);
        let value = info.from_scalar(Scalar::Int(9)).unwrap();
        assert_eq!(value.take::<u16>().unwrap(), 9);
    }

    #[test]
    fn from_reflect_converts_between_elementary_types() {
        assert_eq!(i32::from_reflect(Some(Box::new(7_i32))), Ok(7));
        assert_eq!(i32::from_reflect(Some(Box::new(7_u64))), Ok(7));
        assert!(i32::from_reflect(None).is_err());
        assert!(u8::from_reflect(Some(Box::new(-1_i8))).is_err());
    }

    #[test]
    fn reflect_ref_is_a_scalar() {
        let value = String::from("x");
        let ReflectRef::Elementary(scalar) = crate::Reflect::reflect_ref(&value) else {
            panic!("String must be elementary");
        };
        assert_eq!(scalar, Scalar::Str("x".into()));
    }
}
