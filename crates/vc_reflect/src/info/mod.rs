//! Provide compile-time type information.
//!
//! ## Menu
//!
//! - [`TypePath`]: static type names (path, name, ident, module path, crate version).
//! - [`Type`]: a `TypeId` plus the `TypePath` functions of one type.
//! - [`Typed`]: a static accessor to a type's [`TypeInfo`].
//! - [`TypeInfo`]: an enum of the per-kind information below.
//!     - [`ElementaryInfo`]: scalars and text, with a coercing constructor.
//!     - [`StructInfo`]: named fields ([`NamedField`]) in declaration order.
//!     - [`ListInfo`], [`MapInfo`]: containers and their item types.
//!     - [`ArrayInfo`]: multi-dimensional arrays, rank and item type.
//!     - [`SharedInfo`]: identity-bearing objects and their inner type.
//!     - [`OpaqueInfo`]: types handled only through capabilities.
//!     - [`DynamicInfo`]: erased slots.
//! - [`Generics`]: instantiated type arguments.
//! - [`ReflectKind`]: one kind per `TypeInfo` variant.

// -----------------------------------------------------------------------------
// Modules

mod array_info;
mod elementary_info;
mod field_info;
mod list_info;
mod map_info;
mod opaque_info;
mod shared_info;
mod struct_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use array_info::ArrayInfo;
pub use elementary_info::ElementaryInfo;
pub use field_info::NamedField;
pub use list_info::ListInfo;
pub use map_info::MapInfo;
pub use opaque_info::{DynamicInfo, OpaqueInfo};
pub use shared_info::SharedInfo;
pub use struct_info::StructInfo;
pub use type_info::{Generics, ReflectKind, TypeInfo};
pub use type_path::{Type, TypePath};
pub use typed::Typed;
