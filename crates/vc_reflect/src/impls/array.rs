use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ArrayInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Array, NdArray, ReflectError, ReflectMut, ReflectRef};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};
use crate::{FromReflect, Instance, Reflect, take_instance};

/// `[]` for rank 1, `[,]` for rank 2 and so on.
fn rank_suffix(rank: usize) -> String {
    let mut suffix = String::with_capacity(rank + 1);
    suffix.push('[');
    for _ in 1..rank {
        suffix.push(',');
    }
    suffix.push(']');
    suffix
}

// Arrays are named after their element, e.g. `i32[,]`.
impl<T: TypePath, const R: usize> TypePath for NdArray<T, R> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&[T::type_path(), &rank_suffix(R)]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&[T::type_name(), &rank_suffix(R)]))
    }

    fn type_ident() -> &'static str {
        Self::type_name()
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        T::module_path()
    }

    #[inline]
    fn crate_version() -> Option<&'static str> {
        T::crate_version()
    }
}

impl<T: Typed, const R: usize> Typed for NdArray<T, R> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(R)))
    }
}

impl<T: FromReflect + Typed + Default, const R: usize> Reflect for NdArray<T, R> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Array(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Array(self)
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }
}

impl<T: FromReflect + Typed + Default, const R: usize> Array for NdArray<T, R> {
    #[inline]
    fn rank(&self) -> usize {
        R
    }

    #[inline]
    fn length(&self, dimension: usize) -> usize {
        self.lengths().get(dimension).copied().unwrap_or(0)
    }

    #[inline]
    fn lower_bound(&self, dimension: usize) -> isize {
        self.lower_bounds().get(dimension).copied().unwrap_or(0)
    }

    fn get(&self, index: &[isize]) -> Option<&dyn Reflect> {
        let index = <[isize; R]>::try_from(index).ok()?;
        self.cell(index).map(|item| item as &dyn Reflect)
    }

    fn reshape(&mut self, lengths: &[usize], lower_bounds: &[isize]) -> Result<(), ReflectError> {
        self.reshape_with(lengths, lower_bounds, T::default)
    }

    fn set_at(&mut self, index: &[isize], value: Instance) -> Result<(), ReflectError> {
        let Some(offset) = self.offset(index) else {
            return Err(ReflectError::IndexOutOfBounds {
                index: index.to_vec(),
            });
        };
        self.items_mut()[offset] = T::from_reflect(value)?;
        Ok(())
    }
}

impl<T: FromReflect + Typed + Default, const R: usize> FromReflect for NdArray<T, R> {
    #[inline]
    fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
        take_instance(value)
    }
}

impl<T: FromReflect + GetTypeMeta + Default, const R: usize> GetTypeMeta for NdArray<T, R> {
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
    use crate::info::{TypeInfo, TypePath, Typed};
    use crate::ops::{Array, NdArray};

    #[test]
    fn array_paths() {
        assert_eq!(<NdArray<i32, 1>>::type_path(), "i32[]");
        assert_eq!(<NdArray<String, 3>>::type_path(), "alloc::string::String[,,]");
        assert_eq!(<NdArray<String, 3>>::type_name(), "String[,,]");
        let TypeInfo::Array(info) = <NdArray<u8, 2>>::type_info() else {
            panic!("NdArray must be an array");
        };
        assert_eq!(info.rank(), 2);
    }

    #[test]
    fn reshape_and_set() {
        let mut array = NdArray::<i32, 2>::new();
        Array::reshape(&mut array, &[2, 2], &[1, -1]).unwrap();
        Array::set_at(&mut array, &[2, 0], Some(Box::new(5_i32))).unwrap();
        assert_eq!(array.cell([2, 0]), Some(&5));
        assert!(Array::set_at(&mut array, &[0, 0], Some(Box::new(5_i32))).is_err());
        assert_eq!(Array::lower_bound(&array, 1), -1);
        assert!(Array::get(&array, &[1, -1]).is_some());
    }
}
