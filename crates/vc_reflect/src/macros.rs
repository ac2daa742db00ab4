/// Declares a struct with named fields and implements reflection for it.
///
/// The generated code implements `TypePath`, `Typed`, `Reflect`,
/// `FromReflect`, `Struct` and `GetTypeMeta`. The registration carries a
/// [`TypeTraitDefault`], so the struct must implement [`Default`]; every
/// field type must be reflected too.
///
/// Fields are visited in declaration order. Unit structs are accepted.
///
/// # Examples
///
/// ```
/// use vc_reflect::ops::{Shared, Struct};
/// use vc_reflect::info::{TypePath, Typed};
///
/// vc_reflect::reflect_struct! {
///     #[derive(Default, Debug)]
///     pub struct Node {
///         pub name: String,
///         pub next: Option<Shared<Node>>,
///     }
/// }
///
/// let node = Node { name: "a".into(), next: None };
/// assert_eq!(node.field_len(), 2);
/// assert_eq!(node.name_at(1), Some("next"));
/// assert!(Node::type_path().ends_with("::Node"));
/// assert!(Node::type_info().as_struct().is_some());
/// ```
///
/// [`TypeTraitDefault`]: crate::registry::TypeTraitDefault
#[macro_export]
macro_rules! reflect_struct {
    (
        @impl $name:ident { $($field:ident : $fty:ty),* }
    ) => {
        impl $crate::info::TypePath for $name {
            #[inline]
            fn type_path() -> &'static str {
                concat!(module_path!(), "::", stringify!($name))
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($name)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($name)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some(module_path!())
            }

            #[inline]
            fn crate_version() -> Option<&'static str> {
                option_env!("CARGO_PKG_VERSION")
            }
        }

        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Struct($crate::info::StructInfo::new::<Self>(&[
                        $($crate::info::NamedField::new::<$fty>(stringify!($field)),)*
                    ]))
                })
            }
        }

        impl $crate::Reflect for $name {
            #[inline]
            fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
                <Self as $crate::info::Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Struct(self)
            }

            #[inline]
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Reflect>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }
        }

        impl $crate::FromReflect for $name {
            #[inline]
            fn from_reflect(
                value: $crate::Instance,
            ) -> ::core::result::Result<Self, $crate::ops::ReflectError> {
                $crate::take_instance::<Self>(value)
            }
        }

        impl $crate::ops::Struct for $name {
            fn field(&self, name: &str) -> Option<&dyn $crate::Reflect> {
                match name {
                    $(stringify!($field) => Some(&self.$field),)*
                    _ => None,
                }
            }

            fn field_at(&self, index: usize) -> Option<&dyn $crate::Reflect> {
                let fields: &[&dyn $crate::Reflect] = &[$(&self.$field),*];
                fields.get(index).copied()
            }

            fn name_at(&self, index: usize) -> Option<&'static str> {
                const NAMES: &[&str] = &[$(stringify!($field)),*];
                NAMES.get(index).copied()
            }

            fn field_len(&self) -> usize {
                const NAMES: &[&str] = &[$(stringify!($field)),*];
                NAMES.len()
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Instance,
            ) -> ::core::result::Result<(), $crate::ops::ReflectError> {
                match name {
                    $(stringify!($field) => {
                        self.$field = <$fty as $crate::FromReflect>::from_reflect(value)?;
                        Ok(())
                    })*
                    _ => Err($crate::ops::ReflectError::NoSuchField {
                        type_path: <Self as $crate::info::TypePath>::type_path(),
                        field: name.to_owned(),
                    }),
                }
            }

            #[inline]
            fn iter_fields(&self) -> $crate::ops::StructFieldIter<'_> {
                $crate::ops::StructFieldIter::new(self)
            }
        }

        impl $crate::registry::GetTypeMeta for $name {
            fn get_type_meta() -> $crate::registry::TypeMeta {
                let mut meta = $crate::registry::TypeMeta::of::<Self>();
                meta.insert_trait::<$crate::registry::TypeTraitDefault>(
                    $crate::registry::FromType::<Self>::from_type(),
                );
                meta
            }

            #[allow(unused_variables)]
            fn register_dependencies(registry: &mut $crate::registry::TypeRegistry) {
                $(registry.register::<$fty>();)*
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $fty,)*
        }

        $crate::reflect_struct!(@impl $name { $($field: $fty),* });
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident;
    ) => {
        $(#[$meta])*
        $vis struct $name;

        $crate::reflect_struct!(@impl $name {});
    };
}

/// Implements reflection for a type without a structural view.
///
/// Opaque types are written and read only through a serializer capability,
/// such as a custom protocol or a string converter.
///
/// Options, after the type name:
///
/// - `default`: registers a [`TypeTraitDefault`]; the type must implement [`Default`].
/// - `non_serializable`: serializers reject values of the type.
///
/// The type path is taken from the invoking module; a type declared
/// elsewhere can give its module explicitly.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::{TypePath, Typed};
///
/// #[derive(Default)]
/// pub struct Color(u32);
/// vc_reflect::reflect_opaque!(Color, default);
///
/// pub struct Secret(String);
/// vc_reflect::reflect_opaque!(#[module_path = "keys"] Secret, non_serializable);
///
/// assert_eq!(Secret::type_path(), "keys::Secret");
/// assert!(Color::type_info().is_serializable());
/// assert!(!Secret::type_info().is_serializable());
/// ```
///
/// [`TypeTraitDefault`]: crate::registry::TypeTraitDefault
#[macro_export]
macro_rules! reflect_opaque {
    (@option $meta:ident default) => {
        $meta.insert_trait::<$crate::registry::TypeTraitDefault>(
            $crate::registry::FromType::<Self>::from_type(),
        );
    };
    (@option $meta:ident non_serializable) => {};
    (@info $info:ident default) => {};
    (@info $info:ident non_serializable) => {
        let $info = $info.non_serializable();
    };
    (
        @impl [$($module:tt)*] [$($version:tt)*] $name:ident $(, $opt:ident)*
    ) => {
        impl $crate::info::TypePath for $name {
            #[inline]
            fn type_path() -> &'static str {
                concat!($($module)*, "::", stringify!($name))
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($name)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($name)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($($module)*)
            }

            #[inline]
            fn crate_version() -> Option<&'static str> {
                $($version)*
            }
        }

        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = $crate::info::OpaqueInfo::new::<Self>();
                    $($crate::reflect_opaque!(@info info $opt);)*
                    $crate::info::TypeInfo::Opaque(info)
                })
            }
        }

        impl $crate::Reflect for $name {
            #[inline]
            fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
                <Self as $crate::info::Typed>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Opaque(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Opaque(self)
            }

            #[inline]
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Reflect>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }
        }

        impl $crate::FromReflect for $name {
            #[inline]
            fn from_reflect(
                value: $crate::Instance,
            ) -> ::core::result::Result<Self, $crate::ops::ReflectError> {
                $crate::take_instance::<Self>(value)
            }
        }

        impl $crate::registry::GetTypeMeta for $name {
            fn get_type_meta() -> $crate::registry::TypeMeta {
                #[allow(unused_mut)]
                let mut meta = $crate::registry::TypeMeta::of::<Self>();
                $($crate::reflect_opaque!(@option meta $opt);)*
                meta
            }
        }
    };
    (
        #[module_path = $module:literal] $name:ident $(, $opt:ident)* $(,)?
    ) => {
        $crate::reflect_opaque!(@impl [$module] [None] $name $(, $opt)*);
    };
    (
        $name:ident $(, $opt:ident)* $(,)?
    ) => {
        $crate::reflect_opaque!(
            @impl [module_path!()] [option_env!("CARGO_PKG_VERSION")] $name $(, $opt)*
        );
    };
}

/// Submits a type for [`TypeRegistry::auto_register`].
///
/// Does nothing when the `auto_register` feature is disabled.
///
/// ```no_run
/// use core::any::TypeId;
/// use vc_reflect::registry::TypeRegistry;
///
/// vc_reflect::reflect_struct! {
///     #[derive(Default)]
///     pub struct Config {
///         pub port: u16,
///     }
/// }
/// vc_reflect::impl_auto_register!(Config);
///
/// let mut registry = TypeRegistry::empty();
/// assert!(registry.auto_register());
/// assert!(registry.contains(TypeId::of::<Config>()));
/// ```
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {
        const _: () = {
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                    <$ty as $crate::__macro_exports::auto_register::__RegisterType>::__register
                )
            }
        };
    };
}

/// Submits a type for [`TypeRegistry::auto_register`].
///
/// Does nothing when the `auto_register` feature is disabled.
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {};
}
