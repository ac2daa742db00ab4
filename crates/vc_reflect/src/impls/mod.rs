//! Reflection implementations for built-in types, and helpers for writing more.
//!
//! - [`concat`]: an efficient string concatenation function.
//! - [`NonGenericTypeInfoCell`]: used to implement [`Typed`] for non-generic types.
//! - [`GenericTypePathCell`]: used to implement [`TypePath`] for generic types.
//! - [`GenericTypeInfoCell`]: used to implement [`Typed`] for generic types.
//!
//! ## Implemented Menu
//!
//! - elementary: `bool`, `char`, `i8`-`i64`, `isize`, `u8`-`u64`, `usize`, `f32`, `f64`, `String`
//! - lists: `Vec<T>`
//! - maps: `BTreeMap<K, V>`, `std::collections::HashMap<K, V, S>`, `hashbrown::HashMap<K, V, S>`
//! - arrays: [`NdArray<T, R>`](crate::ops::NdArray)
//! - shared objects: [`Shared<T>`](crate::ops::Shared)
//! - transparent: `Option<T>`
//! - erased slots: `Box<dyn Reflect>`, [`Handle`](crate::ops::Handle)
//! - hash states: [`FixedHashState`](crate::hash::FixedHashState),
//!   [`SeededHashState`](crate::hash::SeededHashState), `RandomState`
//! - opaque: `IpAddr`, `Ipv4Addr`, `Ipv6Addr`, `SocketAddr`
//!
//! [`TypePath`]: crate::info::TypePath
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod cell;

mod array;
mod boxed;
mod elementary;
mod hash_map;
mod list;
mod net;
mod option;
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};

/// An efficient string concatenation function.
///
/// This is usually used for the implementation of `TypePath`.
///
/// # Example
///
/// ```
/// use vc_reflect::impls;
///
/// let s = impls::concat(&["module", "::", "name", "<", "T" , ">"]);
///
/// assert_eq!(s.capacity(), 15);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}
