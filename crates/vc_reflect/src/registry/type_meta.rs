use std::any::TypeId;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::hash::HashMap;
use crate::info::{Type, TypeInfo, Typed};
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime storage for type metadata, registered into the [`TypeRegistry`].
///
/// This includes a [`TypeInfo`] and a [`TypeTrait`] table.
///
/// # Example
///
/// ```
/// # use vc_reflect::registry::{TypeMeta, TypeTraitDefault, FromType};
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
///
/// let f = meta.get_trait::<TypeTraitDefault>().unwrap();
/// let s = f.default().take::<String>().unwrap();
///
/// assert_eq!(s, "");
/// ```
pub struct TypeMeta {
    type_info: &'static TypeInfo,
    trait_table: HashMap<TypeId, Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates an empty [`TypeMeta`] of `T`.
    ///
    /// `Option<T>` is transparent, so `TypeMeta::of::<Option<T>>()`
    /// describes `T`.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self::from_info(T::type_info())
    }

    /// Creates an empty [`TypeMeta`] from a type's information.
    #[inline]
    pub fn from_info(type_info: &'static TypeInfo) -> Self {
        Self {
            type_info,
            trait_table: HashMap::default(),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub fn ty(&self) -> &'static Type {
        self.type_info.ty()
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_info.type_id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_info.type_path()
    }

    /// Inserts a [`TypeTrait`], replacing the previous one of the same type.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Removes a [`TypeTrait`], returning `true` if it was present.
    pub fn remove_trait<T: TypeTrait>(&mut self) -> bool {
        self.trait_table.remove(&TypeId::of::<T>()).is_some()
    }

    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.get_trait_by_id(TypeId::of::<T>())
            .and_then(<dyn TypeTrait>::downcast_ref)
    }

    pub fn get_trait_by_id(&self, type_id: TypeId) -> Option<&dyn TypeTrait> {
        self.trait_table.get(&type_id).map(Deref::deref)
    }

    #[inline]
    pub fn get_trait_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        self.trait_table
            .get_mut(&TypeId::of::<T>())
            .map(DerefMut::deref_mut)
            .and_then(<dyn TypeTrait>::downcast_mut)
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains_key(&TypeId::of::<T>())
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = HashMap::default();
        trait_table.reserve(self.trait_len());
        for (id, type_trait) in self.trait_table.iter() {
            trait_table.insert(*id, (**type_trait).clone_type_trait());
        }
        Self {
            type_info: self.type_info,
            trait_table,
        }
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_path", &self.type_path())
            .field("trait_len", &self.trait_len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A trait which allows a type to generate its [`TypeMeta`]
/// for registration into the [`TypeRegistry`].
///
/// Implemented by [`reflect_struct!`](crate::reflect_struct) and
/// [`reflect_opaque!`](crate::reflect_opaque), and by the built-in types.
///
/// ```
/// use vc_reflect::registry::{GetTypeMeta, TypeTraitDefault};
///
/// #[derive(Default)]
/// struct Token(u64);
/// vc_reflect::reflect_opaque!(Token, default);
///
/// let meta = Token::get_type_meta();
/// assert!(meta.has_trait::<TypeTraitDefault>());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot provide type registration information",
    note = "consider declaring `{Self}` with `reflect_struct!` or `reflect_opaque!`"
)]
pub trait GetTypeMeta: Typed {
    /// Returns the **default** [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    /// **Allow** not to register oneself.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
