use crate::info::{Generics, Type, TypeInfo, TypePath, Typed};

/// Information of a shared (identity-bearing) object type, `Shared<T>`.
///
/// The inner type describes the object's content.
#[derive(Clone, Debug)]
pub struct SharedInfo {
    ty: Type,
    generics: Generics,
    inner_info: fn() -> &'static TypeInfo,
}

impl SharedInfo {
    pub fn new<TShared: TypePath, TInner: Typed>() -> Self {
        Self {
            ty: Type::of::<TShared>(),
            generics: Generics::from_args(vec![TInner::type_info]),
            inner_info: TInner::type_info,
        }
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
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }
}
