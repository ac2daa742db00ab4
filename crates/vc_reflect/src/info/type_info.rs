use core::any::TypeId;
use core::fmt;

use crate::info::{ArrayInfo, ElementaryInfo, ListInfo, MapInfo, OpaqueInfo};
use crate::info::{DynamicInfo, SharedInfo, StructInfo, Type};

// -----------------------------------------------------------------------------
// ReflectKind

/// The kind of a reflected type, one per [`TypeInfo`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Elementary,
    Struct,
    List,
    Map,
    Array,
    Shared,
    Opaque,
    Dynamic,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Elementary => "elementary",
            Self::Struct => "struct",
            Self::List => "list",
            Self::Map => "map",
            Self::Array => "array",
            Self::Shared => "shared",
            Self::Opaque => "opaque",
            Self::Dynamic => "dynamic",
        })
    }
}

// -----------------------------------------------------------------------------
// Generics

/// The instantiated type arguments of a generic type, in declaration order.
///
/// Each argument is stored as a function pointer so that recursive types
/// (a struct holding a `Shared` of itself) do not recurse while building
/// their information.
#[derive(Clone, Copy, Default)]
pub struct Generics(&'static [fn() -> &'static TypeInfo]);

impl Generics {
    #[inline]
    pub const fn new() -> Self {
        Self(&[])
    }

    /// Builds the argument list of a generic type.
    ///
    /// The list is leaked, like the [`TypeInfo`] that owns it.
    #[inline]
    pub fn from_args(args: Vec<fn() -> &'static TypeInfo>) -> Self {
        Self(Box::leak(args.into_boxed_slice()))
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> {
        self.0.iter().map(|info| info())
    }
}

impl fmt::Debug for Generics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(TypeInfo::type_path))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information of a reflected type.
///
/// The variant decides how a serializer treats a value of the type:
///
/// - [`Elementary`](TypeInfo::Elementary): a scalar or text value.
/// - [`Struct`](TypeInfo::Struct): a plain composite with named fields.
/// - [`List`](TypeInfo::List), [`Map`](TypeInfo::Map): containers.
/// - [`Array`](TypeInfo::Array): a multi-dimensional array with lower bounds.
/// - [`Shared`](TypeInfo::Shared): an identity-bearing object wrapping another type.
/// - [`Opaque`](TypeInfo::Opaque): no structural view, handled through capabilities only.
/// - [`Dynamic`](TypeInfo::Dynamic): an erased slot that can hold any reflected value.
#[derive(Debug)]
pub enum TypeInfo {
    Elementary(ElementaryInfo),
    Struct(StructInfo),
    List(ListInfo),
    Map(MapInfo),
    Array(ArrayInfo),
    Shared(SharedInfo),
    Opaque(OpaqueInfo),
    Dynamic(DynamicInfo),
}

impl TypeInfo {
    pub fn ty(&self) -> &Type {
        match self {
            Self::Elementary(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Shared(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
        }
    }

    /// Generic arguments; empty for non-generic types and for arrays.
    pub fn generics(&self) -> &Generics {
        static EMPTY: Generics = Generics::new();
        match self {
            Self::Struct(info) => info.generics(),
            Self::List(info) => info.generics(),
            Self::Map(info) => info.generics(),
            Self::Shared(info) => info.generics(),
            _ => &EMPTY,
        }
    }

    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Elementary(_) => ReflectKind::Elementary,
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Array(_) => ReflectKind::Array,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Opaque(_) => ReflectKind::Opaque,
            Self::Dynamic(_) => ReflectKind::Dynamic,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// Returns `true` if values of this type are shared objects.
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// Returns `true` if this is an erased slot that says nothing about its content.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    /// Returns `false` only for opaque types declared non-serializable.
    #[inline]
    pub fn is_serializable(&self) -> bool {
        match self {
            Self::Opaque(info) => info.is_serializable(),
            _ => true,
        }
    }

    /// The crate that owns the type; arrays report their element's crate.
    pub fn crate_name(&self) -> &'static str {
        match self {
            Self::Array(info) => info.item_info().crate_name(),
            _ => self.ty().crate_name(),
        }
    }

    /// The crate version of the owning type; arrays report their element's.
    pub fn crate_version(&self) -> Option<&'static str> {
        match self {
            Self::Array(info) => info.item_info().crate_version(),
            _ => self.ty().crate_version(),
        }
    }

    #[inline]
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            Self::Struct(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn as_shared(&self) -> Option<&SharedInfo> {
        match self {
            Self::Shared(info) => Some(info),
            _ => None,
        }
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeInfo {}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::{ReflectKind, TypeInfo, Typed};
    use crate::ops::{NdArray, Shared};

    #[test]
    fn kinds_of_builtin_types() {
        assert_eq!(i32::type_info().kind(), ReflectKind::Elementary);
        assert_eq!(String::type_info().kind(), ReflectKind::Elementary);
        assert_eq!(<Vec<u8>>::type_info().kind(), ReflectKind::List);
        assert_eq!(<NdArray<u8, 2>>::type_info().kind(), ReflectKind::Array);
        assert_eq!(<Shared<u8>>::type_info().kind(), ReflectKind::Shared);
        assert_eq!(<Box<dyn crate::Reflect>>::type_info().kind(), ReflectKind::Dynamic);
    }

    #[test]
    fn option_is_transparent() {
        assert_eq!(<Option<i32>>::type_info(), i32::type_info());
        assert!(<Option<Shared<i32>>>::type_info().is_shared());
    }

    #[test]
    fn array_reports_item_crate() {
        let info = <NdArray<String, 2>>::type_info();
        assert_eq!(info.crate_name(), "alloc");
        assert!(info.generics().is_empty());
        assert!(matches!(info, TypeInfo::Array(_)));
    }
}
