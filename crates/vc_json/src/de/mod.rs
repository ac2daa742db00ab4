// -----------------------------------------------------------------------------
// Modules

mod containers;
mod decoder;
mod driver;

// -----------------------------------------------------------------------------
// Exports

pub use driver::DeserializeDriver;

pub(crate) use decoder::Decoder;

/// Where a decoded value ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Stored in its parent as is; object-reference replacement applies.
    Value,
    /// Stored into the placeholder of a shared object.
    SharedBody,
}
