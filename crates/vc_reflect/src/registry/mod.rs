//! Provide the type registry.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: a capability supported by a type.
//! - [`FromType`]: creates a `TypeTrait` from a type.
//! - [`TypeMeta`]: a [`TypeInfo`] and a [`TypeTrait`] table.
//! - [`GetTypeMeta`]: creates the `TypeMeta` of a type.
//! - [`TypeRegistry`]: stores `TypeMeta`s, looked up by `TypeId`, type path or type name.
//! - [`TypeTraitDefault`]: [`Default`] construction through reflection.
//!
//! Serializers keep their own capabilities (custom protocols, string
//! converters and so on) in the same table, as further `TypeTrait`s.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//! If it is not supported, the function returns `false`.
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::TypeTraitDefault;
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
