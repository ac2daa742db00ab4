//! Custom serialization protocols.
//!
//! ## Menu
//!
//! - [`SerializationBag`]: the ordered name-value form of an object.
//! - [`SerializeBag`] / [`DeserializeBag`]: implemented by a type to write
//!   and read itself as a bag, enabled by registering
//!   [`TypeTraitSerializeBag`] / [`TypeTraitDeserializeBag`].
//! - [`Surrogate`] / [`SurrogateSelector`]: the same for types the caller
//!   does not own; [`SurrogateTable`] is the usual selector.
//! - [`StreamingContext`] and [`ContextStates`]: passed to every participant.
//!
//! A bag is written as an object carrying `@@type@@` and one key per entry.
//! Entries are written and read with an erased expected type, so each one
//! records its own type.

// -----------------------------------------------------------------------------
// Modules

mod bag;
mod context;
mod surrogate;

// -----------------------------------------------------------------------------
// Exports

pub use bag::{DeserializeBag, ProtocolError, SerializationBag, SerializeBag};
pub use bag::{TypeTraitDeserializeBag, TypeTraitSerializeBag};
pub use context::{ContextStates, StreamingContext};
pub use surrogate::{Surrogate, SurrogateSelector, SurrogateTable};
