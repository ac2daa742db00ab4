use crate::info::{Generics, Type, TypeInfo, TypePath, Typed};

/// Information of a map-like type, e.g. `BTreeMap<String, i32>`.
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    generics: Generics,
    key_info: fn() -> &'static TypeInfo,
    value_info: fn() -> &'static TypeInfo,
}

impl MapInfo {
    /// Creates the information of a map whose only type arguments are `K` and `V`.
    pub fn new<TMap: TypePath, K: Typed, V: Typed>() -> Self {
        Self {
            ty: Type::of::<TMap>(),
            generics: Generics::from_args(vec![K::type_info, V::type_info]),
            key_info: K::type_info,
            value_info: V::type_info,
        }
    }

    /// Replaces the generic arguments, for maps with extra parameters such as a hasher.
    #[inline]
    pub fn with_generics(mut self, generics: Generics) -> Self {
        self.generics = generics;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn generics(&self) -> &Generics {
        &self.generics
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }
}
