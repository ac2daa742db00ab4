use crate::info::{Type, TypeInfo, TypePath, Typed};

/// Information of a multi-dimensional array type, e.g. `NdArray<i32, 2>`.
///
/// The rank is part of the type; lengths and lower bounds belong to values.
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    ty: Type,
    rank: usize,
    item_info: fn() -> &'static TypeInfo,
}

impl ArrayInfo {
    pub fn new<TArray: TypePath, TItem: Typed>(rank: usize) -> Self {
        Self {
            ty: Type::of::<TArray>(),
            rank,
            item_info: TItem::type_info,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }
}
