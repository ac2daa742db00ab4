//! Runtime type descriptors and type-erased access for object graphs.
//!
//! The crate provides what a graph serializer needs from the host language:
//!
//! - [`info`]: static type descriptors ([`TypeInfo`](info::TypeInfo)) and type paths.
//! - [`Reflect`]: the type-erased value trait, viewed through
//!   [`ReflectRef`](ops::ReflectRef) and [`ReflectMut`](ops::ReflectMut).
//! - [`ops`]: struct, list, map and multi-dimensional array views, plus
//!   [`Shared`](ops::Shared) and [`Handle`](ops::Handle) for identity-bearing objects.
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry), holding per-type
//!   capabilities ([`TypeTrait`](registry::TypeTrait)).
//! - [`reflect_struct!`] and [`reflect_opaque!`]: declare reflected user types.
//!
//! ## Shared and value types
//!
//! Values stored inline (scalars, strings, containers, plain structs) are
//! *value types*: they have no identity and are copied by the serializer.
//! Values stored in a [`Shared<T>`](ops::Shared) are *shared objects*: two
//! fields holding clones of the same `Shared` refer to one object, and a graph
//! may contain cycles through them.

// -----------------------------------------------------------------------------
// Extern Self

// Lets the exported macros name `vc_reflect` from inside this crate's tests.
extern crate self as vc_reflect;

// -----------------------------------------------------------------------------
// Modules

mod macros;
mod reflection;

pub mod hash;
pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use reflection::{FromReflect, Instance, Reflect, take_instance};
