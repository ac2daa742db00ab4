use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// Static names of a type.
///
/// - [`type_path`](TypePath::type_path): full path with generics, unique per type,
///   e.g. `alloc::vec::Vec<i32>`.
/// - [`type_name`](TypePath::type_name): without module path, e.g. `Vec<i32>`.
/// - [`type_ident`](TypePath::type_ident): without module path and generics, e.g. `Vec`.
/// - [`module_path`](TypePath::module_path): e.g. `alloc::vec`, `None` for primitives.
/// - [`crate_version`](TypePath::crate_version): version of the defining crate, if known.
///
/// Paths never carry a leading `::`.
pub trait TypePath: 'static {
    fn type_path() -> &'static str;

    fn type_name() -> &'static str;

    fn type_ident() -> &'static str;

    #[inline]
    fn module_path() -> Option<&'static str> {
        None
    }

    #[inline]
    fn crate_version() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] together with the [`TypePath`] functions of one type.
#[derive(Clone, Copy)]
pub struct Type {
    type_id: TypeId,
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    module_path: fn() -> Option<&'static str>,
    crate_version: fn() -> Option<&'static str>,
}

impl Type {
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path,
            type_name: T::type_name,
            type_ident: T::type_ident,
            module_path: T::module_path,
            crate_version: T::crate_version,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    #[inline(always)]
    pub fn ident(&self) -> &'static str {
        (self.type_ident)()
    }

    #[inline(always)]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module_path)()
    }

    #[inline(always)]
    pub fn crate_version(&self) -> Option<&'static str> {
        (self.crate_version)()
    }

    /// The first segment of the module path.
    ///
    /// Primitives have no module path and report `core`.
    pub fn crate_name(&self) -> &'static str {
        match self.module_path() {
            Some(path) => path.split("::").next().unwrap_or(path),
            None => "core",
        }
    }

    /// The type path without generic arguments, e.g. `alloc::vec::Vec`.
    pub fn base_path(&self) -> &'static str {
        let path = self.path();
        match path.find('<') {
            Some(index) => &path[..index],
            None => path,
        }
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("type_path", &self.path())
            .field("module_path", &self.module_path())
            .field("crate_version", &self.crate_version())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Type;
    use crate::ops::Shared;

    #[test]
    fn primitive_paths() {
        let ty = Type::of::<i32>();
        assert_eq!(ty.path(), "i32");
        assert_eq!(ty.crate_name(), "core");
        assert_eq!(ty.base_path(), "i32");
        assert!(ty.is::<i32>());
    }

    #[test]
    fn generic_paths() {
        let ty = Type::of::<Vec<String>>();
        assert_eq!(ty.path(), "alloc::vec::Vec<alloc::string::String>");
        assert_eq!(ty.base_path(), "alloc::vec::Vec");
        assert_eq!(ty.name(), "Vec<String>");
        assert_eq!(ty.ident(), "Vec");
        assert_eq!(ty.crate_name(), "alloc");

        let shared = Type::of::<Shared<i64>>();
        assert_eq!(shared.path(), "vc_reflect::ops::Shared<i64>");
        assert_eq!(shared.crate_version(), Some(env!("CARGO_PKG_VERSION")));
    }
}
