use std::any::TypeId;
use std::fmt;

use crate::hash::{HashMap, HashSet};
use crate::info::{TypeInfo, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of reflected types.
///
/// [Registering] a type stores a [`TypeMeta`] built by its [`GetTypeMeta`]
/// implementation. Deserializers resolve type identifiers through the
/// registry and look up the capabilities ([`TypeTrait`]s) of each type.
///
/// # Example
///
/// ```
/// use vc_reflect::registry::{TypeRegistry, TypeTraitDefault};
///
/// let registry = TypeRegistry::new();
///
/// let generator = registry
///     .get_with_type_path("alloc::string::String").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// let s = generator.default();
/// assert_eq!(s.reflect_type_path(), "alloc::string::String");
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: HashMap<TypeId, TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: HashMap::default(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Creates a type registry with default registrations:
    ///
    /// - `bool` `char` `f32` `f64`
    /// - `i8 - i64` `isize`, `u8 - u64` `usize`
    /// - `String`
    /// - the erased slots `Box<dyn Reflect>` and `Handle`
    /// - `IpAddr` `Ipv4Addr` `Ipv6Addr` `SocketAddr`
    pub fn new() -> Self {
        use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Box<dyn crate::Reflect>>();
        registry.register::<crate::ops::Handle>();
        registry.register::<IpAddr>();
        registry.register::<Ipv4Addr>();
        registry.register::<Ipv6Addr>();
        registry.register::<SocketAddr>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    // Returns `false` and does nothing if the type is already registered.
    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        if self.type_meta_table.contains_key(&type_id) {
            return false;
        }
        let meta = get_type_meta();
        Self::add_new_type_indices(
            &meta,
            &mut self.type_path_to_id,
            &mut self.type_name_to_id,
            &mut self.ambiguous_names,
        );
        self.type_meta_table.insert(type_id, meta);
        true
    }

    /// Inserts or **overwrites** a [`TypeMeta`].
    ///
    /// This method will _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains_key(&type_meta.type_id()) {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.type_meta_table.insert(type_meta.type_id(), type_meta);
    }

    /// Registers the type `T` if it has not yet been registered.
    ///
    /// This also registers the type dependencies given by
    /// [`GetTypeMeta::register_dependencies`], e.g. the field types of a
    /// struct. If `T` is already registered, neither it nor its
    /// dependencies are registered again.
    ///
    /// The registration is keyed by the type of [`Typed::type_info`],
    /// so registering `Option<T>` registers `T`.
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// use vc_reflect::registry::{TypeRegistry, TypeTraitDefault};
    ///
    /// vc_reflect::reflect_struct! {
    ///     #[derive(Default)]
    ///     struct Foo {
    ///         name: Option<String>,
    ///         value: Vec<i32>,
    ///     }
    /// }
    ///
    /// let mut type_registry = TypeRegistry::empty();
    /// type_registry.register::<Foo>();
    ///
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    /// assert!(type_registry.contains(TypeId::of::<String>()));
    /// assert!(type_registry.contains(TypeId::of::<Vec<i32>>()));
    /// assert!(type_registry.get_type_trait::<TypeTraitDefault>(TypeId::of::<Foo>()).is_some());
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(T::type_info().type_id(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Registers all non-generic types declared through `impl_auto_register!`.
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// Returns `true` if automatic registration works on the current
    /// platform, `false` otherwise or when the `auto_register` feature is
    /// disabled.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            // Reduce the cost of duplicate registrations.
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return true;
            }
            auto_register::__register_types(self);
            self.contains(TypeId::of::<auto_register::__AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Registers the type trait `D` for the registered type `T`.
    ///
    /// Returns `false` if `T` is not registered.
    ///
    /// # Example
    /// ```
    /// use vc_reflect::registry::{TypeRegistry, TypeTraitDefault};
    ///
    /// let mut type_registry = TypeRegistry::new();
    /// type_registry.register::<Vec<u8>>();
    /// assert!(type_registry.register_type_trait::<Vec<u8>, TypeTraitDefault>());
    /// ```
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) -> bool {
        match self.type_meta_table.get_mut(&T::type_info().type_id()) {
            Some(type_meta) => {
                type_meta.insert_trait(D::from_type());
                true
            }
            None => false,
        }
    }

    /// Inserts the type trait `data` for the registered type with `type_id`.
    ///
    /// Returns `false` if the type is not registered.
    pub fn insert_type_trait<D: TypeTrait>(&mut self, type_id: TypeId, data: D) -> bool {
        match self.type_meta_table.get_mut(&type_id) {
            Some(type_meta) => {
                type_meta.insert_trait(data);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains_key(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the [`TypeMeta`] of the type with the given [type path].
    ///
    /// [type path]: crate::info::TypePath::type_path
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the [`TypeMeta`] of the type with the given [type name].
    ///
    /// Returns `None` if the name is ambiguous.
    ///
    /// [type name]: crate::info::TypePath::type_name
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given type name matches multiple registered types.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the [`TypeTrait`] `T` of the type with the given [`TypeId`].
    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<T>(),
            None => None,
        }
    }

    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.get(type_id).map(TypeMeta::type_info)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// Returns every registered type that has the [`TypeTrait`] `T`.
    pub fn iter_with_trait<T: TypeTrait>(&self) -> impl Iterator<Item = (&TypeMeta, &T)> {
        self.type_meta_table.values().filter_map(|item| {
            let type_trait = item.get_trait::<T>();
            type_trait.map(|t| (item, t))
        })
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::ops::Shared;
    use crate::registry::TypeTraitDefault;

    mod a {
        crate::reflect_struct! {
            #[derive(Default)]
            pub struct Item {
                pub id: u32,
            }
        }
    }

    mod b {
        crate::reflect_struct! {
            #[derive(Default)]
            pub struct Item {
                pub name: String,
            }
        }
    }

    #[test]
    fn builtin_registrations() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<i64>()));
        assert!(registry.get_with_type_path("alloc::string::String").is_some());
        assert!(registry.get_with_type_path("core::net::IpAddr").is_some());
        assert!(
            registry
                .get_type_trait::<TypeTraitDefault>(TypeId::of::<u8>())
                .is_some()
        );
    }

    #[test]
    fn ambiguous_names() {
        let mut registry = TypeRegistry::empty();
        registry.register::<a::Item>();
        assert!(registry.get_with_type_name("Item").is_some());

        registry.register::<b::Item>();
        assert!(registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_none());
        assert!(
            registry
                .get_with_type_path(&format!("{}::a::Item", module_path!()))
                .is_some()
        );
    }

    #[test]
    fn option_registers_inner_type() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Option<Shared<a::Item>>>();
        assert!(registry.contains(TypeId::of::<Shared<a::Item>>()));
        assert!(registry.contains(TypeId::of::<a::Item>()));
        assert!(registry.contains(TypeId::of::<u32>()));
        assert!(!registry.contains(TypeId::of::<Option<Shared<a::Item>>>()));
    }
}
