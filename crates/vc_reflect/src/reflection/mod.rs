// -----------------------------------------------------------------------------
// Modules

mod from_reflect;
mod reflect;

// -----------------------------------------------------------------------------
// Exports

pub use from_reflect::{FromReflect, Instance, take_instance};
pub use reflect::Reflect;
