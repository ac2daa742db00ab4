// -----------------------------------------------------------------------------
// Modules

mod default;

// -----------------------------------------------------------------------------
// Exports

pub use default::TypeTraitDefault;
