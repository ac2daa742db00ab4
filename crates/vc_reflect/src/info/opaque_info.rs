use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Information of a type without a structural view.
///
/// Opaque types are serialized through a registered capability
/// (custom protocol or string converter). A type can be declared
/// non-serializable, in which case serializers reject it.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    ty: Type,
    serializable: bool,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: TypePath + ?Sized>() -> Self {
        Self {
            ty: Type::of::<T>(),
            serializable: true,
        }
    }

    #[inline]
    pub fn non_serializable(mut self) -> Self {
        self.serializable = false;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn is_serializable(&self) -> bool {
        self.serializable
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// Information of an erased slot, `Box<dyn Reflect>` or `Handle`.
///
/// The static type of such a slot tells nothing about the value it holds.
#[derive(Clone, Debug)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    #[inline]
    pub fn new<T: TypePath + ?Sized>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
