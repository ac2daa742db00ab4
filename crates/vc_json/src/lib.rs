//! A JSON formatter for reflected object graphs.
//!
//! [`JsonFormatter`] converts any value implementing [`Reflect`] to JSON and
//! back. Graphs may share objects and contain cycles: every [`Shared`] object
//! is written once, later occurrences become back-references to the path of
//! the first one.
//!
//! ## Document shape
//!
//! Values whose type is known from context are written bare: a `Vec<i32>`
//! field is a JSON array, an `i32` is a number. Composite values are objects
//! carrying their members, plus a few reserved keys:
//!
//! | Key | Meaning |
//! |---|---|
//! | `@@info@@` | the path of the node, written on every object; ignored when read |
//! | `@@type@@` | a type identifier, written only when the type cannot be inferred |
//! | `@@value@@` | the payload of a value that needed an object only to carry a type |
//! | `@@reference@@` | the path of an object written earlier |
//! | `@@lower_bounds@@` | the lower bounds of an array, written only if one is non-zero |
//! | `comparer` | the hash state of a map, written only if it is not the default one |
//!
//! ```
//! use vc_json::JsonFormatter;
//! use vc_reflect::ops::Shared;
//! use vc_reflect::registry::TypeRegistry;
//!
//! vc_reflect::reflect_struct! {
//!     #[derive(Default)]
//!     pub struct Node {
//!         pub name: String,
//!         pub next: Option<Shared<Node>>,
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Shared<Node>>();
//!
//! let node = Shared::new(Node { name: "a".into(), next: None });
//! node.borrow_mut().next = Some(node.clone());
//!
//! let formatter = JsonFormatter::new(&registry);
//! let text = formatter.serialize(&node).unwrap();
//! let back: Shared<Node> = formatter.deserialize(&text).unwrap();
//!
//! let next = back.borrow().next.clone().unwrap();
//! assert_eq!(next, back);
//! ```
//!
//! ## Extension points
//!
//! - [`Binder`]: maps types to type identifiers and back.
//! - [`SerializeBag`] / [`DeserializeBag`] and [`Surrogate`]: a custom
//!   name-value representation instead of the members of a struct.
//! - [`StringConverter`]: writes a value as a JSON string.
//! - [`ObjectReference`]: replaces a decoded value by another object.
//! - [`DeserializationCallback`]: notifies shared objects once the whole
//!   graph is decoded.
//!
//! [`Reflect`]: vc_reflect::Reflect
//! [`Shared`]: vc_reflect::ops::Shared

// -----------------------------------------------------------------------------
// Modules

mod binder;
mod capability;
mod converter;
mod de;
mod error;
mod formatter;
mod options;
mod ser;

pub mod naming;
pub mod path;
pub mod protocol;
pub mod value;

// -----------------------------------------------------------------------------
// Exports

pub use binder::{AssemblyStyle, Binder, DefaultBinder};
pub use capability::{DeserializationCallback, ObjectReference};
pub use capability::{TypeTraitDeserializationCallback, TypeTraitObjectReference};
pub use converter::{ConvertError, FromStrConverter, StringConverter, TypeTraitStringConvert};
pub use de::DeserializeDriver;
pub use error::FormatError;
pub use formatter::JsonFormatter;
pub use options::FormatterConfig;
pub use protocol::{ContextStates, StreamingContext};
pub use protocol::{DeserializeBag, ProtocolError, SerializationBag, SerializeBag};
pub use protocol::{Surrogate, SurrogateSelector, SurrogateTable};
pub use protocol::{TypeTraitDeserializeBag, TypeTraitSerializeBag};
pub use ser::SerializeDriver;
