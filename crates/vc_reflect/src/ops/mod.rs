//! Provide views for reading and writing reflected values.
//!
//! ## Menu
//!
//! The following are subtraits of [`Reflect`], one per structural kind:
//!
//! - [`Struct`]: named fields, e.g. `A { .. }`.
//! - [`List`]: list-like, e.g. `Vec<i32>`.
//! - [`Map`]: map-like with an optional comparison policy, e.g. `HashMap<K, V, S>`.
//! - [`Array`]: multi-dimensional with lower bounds, e.g. [`NdArray<T, 2>`].
//!
//! Identity-bearing objects:
//!
//! - [`Shared<T>`]: a shared, mutable object; clones refer to the same object.
//! - [`Handle`]: a type-erased `Shared`.
//!
//! Scalars:
//!
//! - [`Scalar`], [`ScalarKind`] and the [`Elementary`] trait.
//!
//! [`ReflectRef`] and [`ReflectMut`] tell which view applies to a value.
//!
//! [`Reflect`]: crate::Reflect

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod error;
mod list_ops;
mod map_ops;
mod scalar;
mod shared;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::{Array, NdArray};
pub use error::ReflectError;
pub use list_ops::{List, ListItemIter};
pub use map_ops::Map;
pub use scalar::{Elementary, Scalar, ScalarKind};
pub use shared::{Handle, Shared};
pub use struct_ops::{Struct, StructFieldIter};

use crate::Reflect;

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of a reflected value, by kind.
///
/// `Null` is the value of an empty `Option`. Elementary values are copied
/// out as a [`Scalar`]; shared objects are given as a [`Handle`] so the
/// caller can observe their identity and borrow their content.
pub enum ReflectRef<'a> {
    Null,
    Elementary(Scalar),
    Shared(Handle),
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Array(&'a dyn Array),
    Opaque(&'a dyn Reflect),
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable view of a reflected value, by kind.
///
/// Elementary values have no mutable view and are reported as `Opaque`;
/// they are replaced as a whole through [`Reflect::set`].
pub enum ReflectMut<'a> {
    Null,
    Shared(Handle),
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Array(&'a mut dyn Array),
    Opaque(&'a mut dyn Reflect),
}
