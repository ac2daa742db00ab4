use std::any::TypeId;
use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hash, RandomState};

use crate::hash::FixedHashState;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{Generics, MapInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Map, ReflectError, ReflectMut, ReflectRef};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};
use crate::{FromReflect, Instance, Reflect, take_instance};

crate::reflect_opaque!(#[module_path = "std::hash"] RandomState, default);

/// Returns `true` if maps hashed by `S` compare keys the default way.
///
/// `RandomState` is seeded per process, so there is nothing to carry along.
#[inline]
fn is_default_state<S: 'static>() -> bool {
    let id = TypeId::of::<S>();
    id == TypeId::of::<FixedHashState>() || id == TypeId::of::<RandomState>()
}

// -----------------------------------------------------------------------------
// Hash maps

macro_rules! impl_reflect_for_hashmap {
    ($ty:ident, $path:literal, $module:literal) => {
        impl<K: TypePath, V: TypePath, S: TypePath> TypePath for $ty<K, V, S> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[
                        $path,
                        "<",
                        K::type_path(),
                        ", ",
                        V::type_path(),
                        ", ",
                        S::type_path(),
                        ">",
                    ])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[
                        "HashMap<",
                        K::type_name(),
                        ", ",
                        V::type_name(),
                        ", ",
                        S::type_name(),
                        ">",
                    ])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                "HashMap"
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl<K: Typed, V: Typed, S: Typed> Typed for $ty<K, V, S> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>().with_generics(Generics::from_args(
                        vec![K::type_info, V::type_info, S::type_info],
                    )))
                })
            }
        }

        impl<K, V, S> Reflect for $ty<K, V, S>
        where
            K: FromReflect + Typed + Eq + Hash,
            V: FromReflect + Typed,
            S: FromReflect + Typed + BuildHasher + Default,
        {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }

            #[inline]
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }
        }

        impl<K, V, S> Map for $ty<K, V, S>
        where
            K: FromReflect + Typed + Eq + Hash,
            V: FromReflect + Typed,
            S: FromReflect + Typed + BuildHasher + Default,
        {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(Self::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
            }

            fn insert(&mut self, key: Instance, value: Instance) -> Result<(), ReflectError> {
                let key = K::from_reflect(key)?;
                let value = V::from_reflect(value)?;
                Self::insert(self, key, value);
                Ok(())
            }

            fn comparer(&self) -> Option<&dyn Reflect> {
                if is_default_state::<S>() {
                    None
                } else {
                    Some(self.hasher())
                }
            }

            fn set_comparer(&mut self, comparer: Instance) -> Result<(), ReflectError> {
                if comparer.is_none() {
                    return Ok(());
                }
                if !Self::is_empty(self) {
                    return Err(ReflectError::NotEmpty {
                        type_path: Self::type_path(),
                    });
                }
                *self = Self::with_hasher(S::from_reflect(comparer)?);
                Ok(())
            }
        }

        impl<K, V, S> FromReflect for $ty<K, V, S>
        where
            K: FromReflect + Typed + Eq + Hash,
            V: FromReflect + Typed,
            S: FromReflect + Typed + BuildHasher + Default,
        {
            #[inline]
            fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
                take_instance(value)
            }
        }

        impl<K, V, S> GetTypeMeta for $ty<K, V, S>
        where
            K: FromReflect + GetTypeMeta + Eq + Hash,
            V: FromReflect + GetTypeMeta,
            S: FromReflect + GetTypeMeta + BuildHasher + Default,
        {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
                registry.register::<S>();
            }
        }
    };
}

use hashbrown::HashMap as HashbrownMap;
use std::collections::HashMap as StdHashMap;

impl_reflect_for_hashmap!(StdHashMap, "std::collections::HashMap", "std::collections");
impl_reflect_for_hashmap!(HashbrownMap, "hashbrown::HashMap", "hashbrown");

// -----------------------------------------------------------------------------
// BTreeMap

impl<K: TypePath, V: TypePath> TypePath for BTreeMap<K, V> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&[
                "alloc::collections::BTreeMap<",
                K::type_path(),
                ", ",
                V::type_path(),
                ">",
            ])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["BTreeMap<", K::type_name(), ", ", V::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "BTreeMap"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::collections")
    }
}

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
    }
}

impl<K: FromReflect + Typed + Ord, V: FromReflect + Typed> Reflect for BTreeMap<K, V> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Map(self)
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }
}

impl<K: FromReflect + Typed + Ord, V: FromReflect + Typed> Map for BTreeMap<K, V> {
    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(Self::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
    }

    fn insert(&mut self, key: Instance, value: Instance) -> Result<(), ReflectError> {
        let key = K::from_reflect(key)?;
        let value = V::from_reflect(value)?;
        Self::insert(self, key, value);
        Ok(())
    }

    /// Ordered maps always compare keys through `Ord`.
    #[inline]
    fn comparer(&self) -> Option<&dyn Reflect> {
        None
    }

    fn set_comparer(&mut self, comparer: Instance) -> Result<(), ReflectError> {
        match comparer {
            None => Ok(()),
            Some(_) => Err(ReflectError::Unsupported {
                type_path: Self::type_path(),
                operation: "a custom comparer",
            }),
        }
    }
}

impl<K: FromReflect + Typed + Ord, V: FromReflect + Typed> FromReflect for BTreeMap<K, V> {
    #[inline]
    fn from_reflect(value: Instance) -> Result<Self, ReflectError> {
        take_instance(value)
    }
}

impl<K, V> GetTypeMeta for BTreeMap<K, V>
where
    K: FromReflect + GetTypeMeta + Ord,
    V: FromReflect + GetTypeMeta,
{
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<K>();
        registry.register::<V>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::hash::{FixedHashState, HashMap, SeededHashState};
    use crate::info::TypePath;
    use crate::ops::Map;

    #[test]
    fn default_state_has_no_comparer() {
        let map: HashMap<String, i32> = HashMap::default();
        assert!(Map::comparer(&map).is_none());

        let map: std::collections::HashMap<String, i32> = Default::default();
        assert!(Map::comparer(&map).is_none());
    }

    #[test]
    fn seeded_state_is_a_comparer() {
        let map: HashMap<u8, u8, SeededHashState> =
            HashMap::with_hasher(SeededHashState::new(7));
        let comparer = Map::comparer(&map).unwrap();
        assert_eq!(comparer.downcast_ref::<SeededHashState>(), Some(&SeededHashState::new(7)));
    }

    #[test]
    fn set_comparer_needs_empty_map() {
        let mut map: HashMap<u8, u8, SeededHashState> = HashMap::default();
        Map::set_comparer(&mut map, Some(Box::new(SeededHashState::new(3)))).unwrap();
        assert_eq!(map.hasher().seed, 3);

        Map::insert(&mut map, Some(Box::new(1_u8)), Some(Box::new(2_u8))).unwrap();
        assert!(Map::set_comparer(&mut map, Some(Box::new(SeededHashState::new(4)))).is_err());
    }

    #[test]
    fn map_paths() {
        assert_eq!(
            <HashMap<String, u8>>::type_path(),
            "hashbrown::HashMap<alloc::string::String, u8, vc_reflect::hash::FixedHashState>"
        );
        assert_eq!(FixedHashState::type_path(), "vc_reflect::hash::FixedHashState");
        assert!(Map::comparer(&BTreeMap::<u8, u8>::new()).is_none());
    }
}
